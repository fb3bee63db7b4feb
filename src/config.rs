// config.rs
// Reference constants and the runtime configuration for the replay engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;

// ====================
// Playback
// ====================
/// Default interval between history advances (ms).
pub const DEFAULT_PLAY_SPEED_MS: u64 = 200;
/// Fastest recognized playback interval (ms). Values below are clamped up.
pub const MIN_PLAY_SPEED_MS: u64 = 50;
/// Slowest recognized playback interval (ms). Values above are clamped down.
pub const MAX_PLAY_SPEED_MS: u64 = 1000;

// ====================
// Vehicle Animation
// ====================
/// Fixed cadence of the vehicle animation ticker (ms), i.e. 20 ticks/second.
pub const ANIMATION_TICK_MS: u64 = 50;
/// Fraction of a segment covered per tick under `MotionPolicy::TimePerSegment`.
/// At 0.5 a marker crosses any segment in exactly two ticks.
pub const SEGMENT_STEP: f64 = 0.5;

pub fn clamp_play_speed(ms: u64) -> u64 {
    ms.clamp(MIN_PLAY_SPEED_MS, MAX_PLAY_SPEED_MS)
}

/// How the per-tick step relates to segment geometry.
///
/// `TimePerSegment` is the reference behavior: a fixed fraction of a segment
/// per tick, so short and long segments take the same wall time and markers
/// appear to move at different ground speeds. Whether that is intended is an
/// open question upstream, so the alternative is a policy rather than a fix:
/// `DistanceNormalized` scales the step by mean/current segment length so the
/// marker covers roughly constant ground per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionPolicy {
    TimePerSegment,
    DistanceNormalized,
}

impl Default for MotionPolicy {
    fn default() -> Self {
        MotionPolicy::TimePerSegment
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Interval between history advances (ms), clamped to the recognized range.
    #[serde(default = "default_play_speed")]
    pub play_speed_ms: u64,
    /// Cadence of the vehicle animation ticker (ms).
    #[serde(default = "default_animation_tick")]
    pub animation_tick_ms: u64,
    /// Per-tick segment step under `TimePerSegment`; base step otherwise.
    #[serde(default = "default_segment_step")]
    pub segment_step: f64,
    #[serde(default)]
    pub motion_policy: MotionPolicy,
}

fn default_play_speed() -> u64 {
    DEFAULT_PLAY_SPEED_MS
}

fn default_animation_tick() -> u64 {
    ANIMATION_TICK_MS
}

fn default_segment_step() -> f64 {
    SEGMENT_STEP
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            play_speed_ms: DEFAULT_PLAY_SPEED_MS,
            animation_tick_ms: ANIMATION_TICK_MS,
            segment_step: SEGMENT_STEP,
            motion_policy: MotionPolicy::default(),
        }
    }
}

impl ReplayConfig {
    /// Clamp every field into its usable range. Out-of-range values are
    /// silently corrected, never rejected.
    pub fn sanitized(mut self) -> Self {
        self.play_speed_ms = clamp_play_speed(self.play_speed_ms);
        self.animation_tick_ms = self.animation_tick_ms.max(1);
        if !(self.segment_step > 0.0) {
            self.segment_step = SEGMENT_STEP;
        }
        self.segment_step = self.segment_step.min(1.0);
        self
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path)?;
        let config: ReplayConfig = toml::from_str(&text)?;
        Ok(config.sanitized())
    }

    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ReplayError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
