pub mod animator;
pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod geo;
pub mod history;
pub mod orchestrator;
pub mod playback;
pub mod session;
pub mod solver;
