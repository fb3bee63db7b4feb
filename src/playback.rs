// playback.rs
// State machine that drives the history cursor forward at a user-configurable
// rate. Time is injected: every time-sensitive operation takes `now`, and the
// owner polls with its own clock, so tests run against synthetic instants.

use std::time::{Duration, Instant};

use log::debug;

use crate::config::clamp_play_speed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// What a single `poll` call observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackProgress {
    NoChange,
    Advanced,
    /// The cursor reached the last snapshot during this poll; no further
    /// deadline is scheduled.
    Finished,
}

pub struct PlaybackController {
    state: PlayState,
    cursor: usize,
    track_len: usize,
    speed: Duration,
    next_due: Option<Instant>,
}

impl PlaybackController {
    pub fn new(speed_ms: u64) -> Self {
        Self {
            state: PlayState::Idle,
            cursor: 0,
            track_len: 0,
            speed: Duration::from_millis(clamp_play_speed(speed_ms)),
            next_due: None,
        }
    }

    /// Bind the controller to a freshly replaced history of `len` snapshots.
    /// Cursor returns to 0, any pending deadline is cancelled.
    pub fn load(&mut self, len: usize) {
        self.track_len = len;
        self.cursor = 0;
        self.state = PlayState::Idle;
        self.next_due = None;
    }

    /// Begin playing and schedule the first advance after `speed`. No-op when
    /// already playing, when finished (only `reset` recovers), or when there
    /// are fewer than two snapshots to play through.
    pub fn start(&mut self, now: Instant) {
        match self.state {
            PlayState::Playing | PlayState::Finished => {}
            PlayState::Idle | PlayState::Paused => {
                if self.track_len > 1 {
                    self.state = PlayState::Playing;
                    self.next_due = Some(now + self.speed);
                }
            }
        }
    }

    /// Continue from the current cursor. Same transitions as `start`.
    pub fn resume(&mut self, now: Instant) {
        self.start(now);
    }

    /// Cancel the pending advance. Only meaningful while playing.
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
            self.next_due = None;
        }
    }

    /// Cursor back to 0, pending advance cancelled, state to `Idle`. The
    /// history itself is untouched.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.state = PlayState::Idle;
        self.next_due = None;
    }

    /// Jump the cursor immediately, clamped into range. Valid in any state
    /// and never changes the play state.
    pub fn seek(&mut self, i: i64) {
        match self.track_len.checked_sub(1) {
            Some(last) => self.cursor = i.clamp(0, last as i64) as usize,
            None => self.cursor = 0,
        }
    }

    /// Change the playback interval, clamped to the recognized range. While
    /// playing, the pending deadline is replaced by `now + new_speed`, so the
    /// old interval can never fire alongside the new one.
    pub fn set_speed(&mut self, now: Instant, ms: u64) {
        self.speed = Duration::from_millis(clamp_play_speed(ms));
        if self.state == PlayState::Playing {
            self.next_due = Some(now + self.speed);
        }
    }

    /// Fire every deadline that has elapsed by `now`. Each advance reschedules
    /// itself one interval after the deadline it fired at, using the latest
    /// speed, so intervals neither drift nor double up.
    pub fn poll(&mut self, now: Instant) -> PlaybackProgress {
        let mut advanced = false;
        while self.state == PlayState::Playing {
            let due = match self.next_due {
                Some(due) if due <= now => due,
                _ => break,
            };
            self.cursor += 1;
            advanced = true;
            if self.cursor + 1 >= self.track_len {
                self.cursor = self.track_len - 1;
                self.state = PlayState::Finished;
                self.next_due = None;
                debug!("playback finished at iteration index {}", self.cursor);
                return PlaybackProgress::Finished;
            }
            self.next_due = Some(due + self.speed);
        }
        if advanced {
            PlaybackProgress::Advanced
        } else {
            PlaybackProgress::NoChange
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed.as_millis() as u64
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }
}
