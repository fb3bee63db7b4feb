// session.rs
// Saving and restoring a replay session to disk: the solver result plus the
// playback position, speed and config. JSON or bincode, optionally gzipped;
// the format is sniffed on load so old files keep working.

use std::fs;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::config::{ReplayConfig, DEFAULT_PLAY_SPEED_MS};
use crate::error::ReplayError;
use crate::orchestrator::ReplaySession;
use crate::solver::SolverResult;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedSession {
    pub result: SolverResult,
    #[serde(default)]
    pub cursor: usize,
    #[serde(default = "default_speed")]
    pub play_speed_ms: u64,
    #[serde(default)]
    pub config: ReplayConfig,
}

fn default_speed() -> u64 {
    DEFAULT_PLAY_SPEED_MS
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionFormat {
    Json,
    Binary,
}

impl SessionFormat {
    /// `.json` (optionally `.json.gz`) means JSON; everything else is binary.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".json") || name.ends_with(".json.gz") {
            SessionFormat::Json
        } else {
            SessionFormat::Binary
        }
    }
}

/// Capture the restorable parts of a live session.
pub fn capture(session: &ReplaySession) -> SavedSession {
    SavedSession {
        result: session.solver_result().cloned().unwrap_or_default(),
        cursor: session.cursor(),
        play_speed_ms: session.speed_ms(),
        config: session.config().clone(),
    }
}

/// Rebuild a session from a capture: result loaded, cursor re-seeked, speed
/// restored. Play state and animation are not persisted; both restart Idle.
pub fn restore(saved: SavedSession) -> ReplaySession {
    let mut config = saved.config;
    config.play_speed_ms = saved.play_speed_ms;
    let mut session = ReplaySession::new(config);
    session.load_result(saved.result);
    session.seek(saved.cursor as i64);
    session
}

pub fn save_session<P: AsRef<Path>>(
    path: P,
    session: &SavedSession,
    format: SessionFormat,
    compress: bool,
) -> Result<(), ReplayError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // Write to a temporary file first so a crash mid-write cannot truncate an
    // existing save.
    let tmp_path = path.with_extension({
        let mut os = path.extension().map(|e| e.to_os_string()).unwrap_or_default();
        os.push(".tmp");
        os
    });
    {
        let file = fs::File::create(&tmp_path)?;
        let writer = BufWriter::new(file);
        match (format, compress) {
            (SessionFormat::Json, false) => {
                serde_json::to_writer(writer, session)?;
            }
            (SessionFormat::Json, true) => {
                let mut encoder = GzEncoder::new(writer, Compression::fast());
                serde_json::to_writer(&mut encoder, session)?;
                let mut writer = encoder.finish()?;
                writer.flush()?;
            }
            (SessionFormat::Binary, false) => {
                bincode::serialize_into(writer, session)?;
            }
            (SessionFormat::Binary, true) => {
                let mut encoder = GzEncoder::new(writer, Compression::fast());
                bincode::serialize_into(&mut encoder, session)?;
                let mut writer = encoder.finish()?;
                writer.flush()?;
            }
        }
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn load_session<P: AsRef<Path>>(path: P) -> Result<SavedSession, ReplayError> {
    let path = path.as_ref();
    let raw = fs::read(path)?;
    let bytes = maybe_gunzip(&raw)?;
    if let Ok(session) = serde_json::from_slice::<SavedSession>(&bytes) {
        return Ok(session);
    }
    if let Ok(session) = bincode::deserialize::<SavedSession>(&bytes) {
        return Ok(session);
    }
    Err(ReplayError::UnrecognizedSession(path.to_path_buf()))
}

fn maybe_gunzip(raw: &[u8]) -> Result<Vec<u8>, ReplayError> {
    if raw.len() >= 2 && raw[0] == 0x1f && raw[1] == 0x8b {
        let mut decoder = GzDecoder::new(Cursor::new(raw));
        let mut bytes = Vec::new();
        decoder.read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        Ok(raw.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::playback::PlayState;
    use crate::solver::HistorySnapshot;

    fn sample_result() -> SolverResult {
        SolverResult {
            history: (0..4)
                .map(|i| HistorySnapshot {
                    iteration: i,
                    cost: 50.0 - i as f64,
                    temperature: None,
                    route: Default::default(),
                })
                .collect(),
            vehicle_paths: vec![vec![[112.0, -7.0], [112.1, -7.1]]],
            vehicle_types: vec!["Motor".into()],
            total_vehicles: 1,
            final_cost: 47.0,
            ..Default::default()
        }
    }

    fn sample_session() -> SavedSession {
        let mut session = ReplaySession::new(ReplayConfig::default());
        session.load_result(sample_result());
        session.seek(2);
        session.set_speed(Instant::now(), 100);
        capture(&session)
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let saved = sample_session();
        save_session(&path, &saved, SessionFormat::from_path(&path), false).unwrap();
        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.cursor, 2);
        assert_eq!(loaded.play_speed_ms, 100);
        assert_eq!(loaded.result.history.len(), 4);
    }

    #[test]
    fn compressed_binary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin.gz");
        let saved = sample_session();
        assert_eq!(SessionFormat::from_path(&path), SessionFormat::Binary);
        save_session(&path, &saved, SessionFormat::Binary, true).unwrap();
        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.result.final_cost, 47.0);
        assert_eq!(loaded.cursor, 2);
    }

    #[test]
    fn plain_binary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");
        let saved = sample_session();
        assert_eq!(SessionFormat::from_path(&path), SessionFormat::Binary);
        save_session(&path, &saved, SessionFormat::Binary, false).unwrap();
        let loaded = load_session(&path).unwrap();
        // The sample history has no temperatures; absent optional fields must
        // survive the binary encoding too.
        assert!(loaded.result.history.iter().all(|s| s.temperature.is_none()));
        assert_eq!(loaded.result.history.len(), 4);
        assert_eq!(loaded.cursor, 2);
        assert_eq!(loaded.play_speed_ms, 100);
    }

    #[test]
    fn restore_reseats_cursor_and_speed() {
        let session = restore(sample_session());
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.speed_ms(), 100);
        assert_eq!(session.play_state(), PlayState::Idle, "play state is not persisted");
        assert!(!session.is_visualizing());
        assert_eq!(session.current_snapshot().unwrap().iteration, 2);
    }

    #[test]
    fn garbage_file_is_rejected_with_a_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.bin");
        fs::write(&path, b"not a session at all").unwrap();
        let err = load_session(&path).unwrap_err();
        assert!(matches!(err, ReplayError::UnrecognizedSession(_)));
    }
}
