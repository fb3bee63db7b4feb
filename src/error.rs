// error.rs
// Error taxonomy for the replay engine. Usage errors are surfaced to the
// caller so a UI can prompt the user; range errors are clamped at the call
// site and never reach this type; per-vehicle data gaps are skipped locally.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    /// Visualization was started before any solved vehicle paths exist.
    #[error("no solved vehicle paths yet; run the solver before starting the visualization")]
    NoSolvedPaths,

    /// A session file was neither valid JSON nor valid binary, compressed or not.
    #[error("unrecognized session file format: {0}")]
    UnrecognizedSession(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed solver result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to encode config: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("failed to encode or decode session: {0}")]
    Session(#[from] bincode::Error),
}
