// orchestrator.rs
// Wires the history store, playback controller and path animator into one
// replay session with a single external surface. The two tickers are owned
// here but never read each other's state; this type only forwards lifecycle
// calls and assembles read-only projections for a rendering consumer.

use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use parking_lot::Mutex;

use crate::animator::{PathAnimator, VehiclePosition};
use crate::chart::{self, ChartPoint};
use crate::config::ReplayConfig;
use crate::error::ReplayError;
use crate::geo::VehiclePath;
use crate::history::HistoryStore;
use crate::playback::{PlayState, PlaybackController, PlaybackProgress};
use crate::solver::{HistorySnapshot, SolverResult};

/// Snapshot of the session published after every observable change, for a
/// consumer (GUI, CLI printer) that holds the shared handle instead of the
/// session itself.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackStatus {
    pub history_len: usize,
    pub cursor: usize,
    pub state: PlayState,
    pub speed_ms: u64,
    pub visualizing: bool,
    pub vehicles: usize,
    pub all_arrived: bool,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            history_len: 0,
            cursor: 0,
            state: PlayState::Idle,
            speed_ms: 0,
            visualizing: false,
            vehicles: 0,
            all_arrived: false,
        }
    }
}

pub struct ReplaySession {
    config: ReplayConfig,
    history: HistoryStore,
    playback: PlaybackController,
    animator: PathAnimator,
    paths: Vec<VehiclePath>,
    vehicle_types: Vec<String>,
    final_cost: Option<f64>,
    /// The last ingested result, kept verbatim so a session can be persisted.
    result: Option<SolverResult>,
    status: Arc<Mutex<PlaybackStatus>>,
}

impl ReplaySession {
    pub fn new(config: ReplayConfig) -> Self {
        let config = config.sanitized();
        let playback = PlaybackController::new(config.play_speed_ms);
        let animator = PathAnimator::new(&config);
        Self {
            config,
            history: HistoryStore::new(),
            playback,
            animator,
            paths: Vec::new(),
            vehicle_types: Vec::new(),
            final_cost: None,
            result: None,
            status: Arc::new(Mutex::new(PlaybackStatus::default())),
        }
    }

    /// Ingest a completed solve: wholesale history replace, cursor back to 0,
    /// fresh path geometry, and any running animation stopped.
    pub fn load_result(&mut self, result: SolverResult) {
        self.paths = result.paths();
        self.vehicle_types = result.vehicle_types.clone();
        self.final_cost = Some(result.final_cost);
        self.animator.stop();
        self.history.replace(result.history.clone());
        self.playback.load(self.history.len());
        info!(
            "loaded solver result: {} snapshots, {} vehicles, final cost {:.2}",
            self.history.len(),
            self.paths.len(),
            result.final_cost
        );
        self.result = Some(result);
        self.publish_status();
    }

    // ---- playback surface ----

    pub fn play(&mut self, now: Instant) {
        self.playback.start(now);
        self.publish_status();
    }

    pub fn resume(&mut self, now: Instant) {
        self.playback.resume(now);
        self.publish_status();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
        self.publish_status();
    }

    pub fn reset(&mut self) {
        self.playback.reset();
        self.publish_status();
    }

    pub fn seek(&mut self, i: i64) {
        self.playback.seek(i);
        self.publish_status();
    }

    pub fn set_speed(&mut self, now: Instant, ms: u64) {
        self.playback.set_speed(now, ms);
        self.publish_status();
    }

    // ---- visualization surface ----

    /// Start animating vehicles along the solved paths. Without a solved
    /// result this is a user-facing error so a UI can prompt to solve first.
    pub fn start_visualization(&mut self, now: Instant) -> Result<(), ReplayError> {
        if self.paths.is_empty() {
            warn!("visualization requested before any solved paths exist");
            return Err(ReplayError::NoSolvedPaths);
        }
        self.animator.start(self.paths.clone(), now)?;
        self.publish_status();
        Ok(())
    }

    pub fn stop_visualization(&mut self) {
        self.animator.stop();
        self.publish_status();
    }

    /// Drive both tickers with one clock reading. Each owns its own deadline;
    /// polling order is irrelevant because they share no state.
    pub fn poll(&mut self, now: Instant) -> PlaybackProgress {
        let progress = self.playback.poll(now);
        self.animator.poll(now);
        self.publish_status();
        progress
    }

    // ---- read-only projections ----

    pub fn current_snapshot(&self) -> Option<&HistorySnapshot> {
        self.history.at(self.playback.cursor())
    }

    pub fn vehicle_positions(&self) -> &[Option<VehiclePosition>] {
        self.animator.positions()
    }

    pub fn chart_series(&self) -> Vec<ChartPoint> {
        chart::series(self.history.prefix(self.playback.cursor()))
    }

    pub fn vehicle_types(&self) -> &[String] {
        &self.vehicle_types
    }

    pub fn final_cost(&self) -> Option<f64> {
        self.final_cost
    }

    pub fn solver_result(&self) -> Option<&SolverResult> {
        self.result.as_ref()
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn cursor(&self) -> usize {
        self.playback.cursor()
    }

    pub fn play_state(&self) -> PlayState {
        self.playback.state()
    }

    pub fn speed_ms(&self) -> u64 {
        self.playback.speed_ms()
    }

    pub fn is_visualizing(&self) -> bool {
        self.animator.is_running()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status.lock().clone()
    }

    /// Shared handle for consumers that outlive a borrow of the session.
    pub fn status_handle(&self) -> Arc<Mutex<PlaybackStatus>> {
        Arc::clone(&self.status)
    }

    fn publish_status(&self) {
        let mut status = self.status.lock();
        *status = PlaybackStatus {
            history_len: self.history.len(),
            cursor: self.playback.cursor(),
            state: self.playback.state(),
            speed_ms: self.playback.speed_ms(),
            visualizing: self.animator.is_running(),
            vehicles: self.paths.len(),
            all_arrived: self.animator.all_arrived(),
        };
    }
}
