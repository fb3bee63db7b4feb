// animator.rs
// Continuous-position simulator for vehicle markers. Advances every marker
// along its own fixed polyline at a fixed cadence, fully independent of the
// history playback: paths reflect only the final solution, never the
// per-iteration candidate routes.

use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{MotionPolicy, ReplayConfig};
use crate::error::ReplayError;
use crate::geo::{lerp, LatLng, VehiclePath};

/// Where one vehicle's marker currently sits: the interpolated position, the
/// segment it is on, and how far along that segment it is in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehiclePosition {
    pub position: LatLng,
    pub path_index: usize,
    pub segment_progress: f64,
}

pub struct PathAnimator {
    paths: Vec<VehiclePath>,
    /// Index-aligned with `paths`; `None` for vehicles whose path is empty,
    /// which are skipped every tick rather than failing the tick.
    positions: Vec<Option<VehiclePosition>>,
    tick: Duration,
    step: f64,
    policy: MotionPolicy,
    next_due: Option<Instant>,
}

impl PathAnimator {
    pub fn new(config: &ReplayConfig) -> Self {
        Self {
            paths: Vec::new(),
            positions: Vec::new(),
            tick: Duration::from_millis(config.animation_tick_ms.max(1)),
            step: config.segment_step,
            policy: config.motion_policy,
            next_due: None,
        }
    }

    /// Anchor a marker at every path's first point and begin the tick loop.
    /// Starting with no paths at all is a usage error and mutates nothing.
    pub fn start(&mut self, paths: Vec<VehiclePath>, now: Instant) -> Result<(), ReplayError> {
        if paths.is_empty() {
            return Err(ReplayError::NoSolvedPaths);
        }
        self.positions = paths.iter().map(Self::anchor).collect();
        self.paths = paths;
        self.next_due = Some(now + self.tick);
        debug!("animation started for {} vehicles", self.paths.len());
        Ok(())
    }

    fn anchor(path: &VehiclePath) -> Option<VehiclePosition> {
        let first = path.point(0)?;
        // A single-point path is already at its destination.
        let terminal = path.len() == 1;
        Some(VehiclePosition {
            position: first,
            path_index: 0,
            segment_progress: if terminal { 1.0 } else { 0.0 },
        })
    }

    /// Cancel the tick loop and clear all position state. Idempotent: a
    /// second call observes the same empty state as the first.
    pub fn stop(&mut self) {
        self.next_due = None;
        self.paths.clear();
        self.positions.clear();
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn positions(&self) -> &[Option<VehiclePosition>] {
        &self.positions
    }

    /// True while running and every vehicle that has a path has reached its
    /// final point. Vehicles without a path have nowhere to go and do not
    /// hold arrival back.
    pub fn all_arrived(&self) -> bool {
        self.is_running()
            && self
                .positions
                .iter()
                .zip(&self.paths)
                .all(|(pos, path)| match pos {
                    Some(p) => Self::is_terminal(path, p),
                    None => true,
                })
    }

    fn is_terminal(path: &VehiclePath, pos: &VehiclePosition) -> bool {
        match path.last_index() {
            Some(last) => pos.path_index >= last,
            None => true,
        }
    }

    /// Fire every cadence interval that has elapsed by `now`. Each tick runs
    /// to completion over all vehicles before the next fires.
    pub fn poll(&mut self, now: Instant) {
        while let Some(due) = self.next_due {
            if due > now {
                break;
            }
            self.tick_once();
            self.next_due = Some(due + self.tick);
        }
    }

    /// One animation tick: every vehicle advances independently; a vehicle
    /// with no path keeps its previous state.
    fn tick_once(&mut self) {
        for (pos, path) in self.positions.iter_mut().zip(&self.paths) {
            if let Some(pos) = pos.as_mut() {
                Self::advance(path, pos, self.step, self.policy);
            }
        }
    }

    fn advance(path: &VehiclePath, pos: &mut VehiclePosition, base_step: f64, policy: MotionPolicy) {
        let last = match path.last_index() {
            Some(last) => last,
            None => return,
        };
        if pos.path_index >= last {
            // Terminal: progress is pinned at 1 and never advances further.
            return;
        }

        let step = match policy {
            MotionPolicy::TimePerSegment => base_step,
            MotionPolicy::DistanceNormalized => {
                let segment = path.segment_len(pos.path_index);
                let mean = path.mean_segment_len();
                if segment <= f64::EPSILON || mean <= f64::EPSILON {
                    // Degenerate geometry falls back to the fixed step.
                    base_step
                } else {
                    base_step * mean / segment
                }
            }
        };

        pos.segment_progress += step;
        if pos.segment_progress >= 1.0 {
            // Overshoot does not carry into the next segment.
            pos.segment_progress = 0.0;
            pos.path_index += 1;
        }

        if pos.path_index >= last {
            pos.path_index = last;
            pos.segment_progress = 1.0;
            if let Some(end) = path.point(last) {
                pos.position = end;
            }
            return;
        }

        if let (Some(a), Some(b)) = (path.point(pos.path_index), path.point(pos.path_index + 1)) {
            pos.position = lerp(a, b, pos.segment_progress);
        }
    }
}
