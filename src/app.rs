// app.rs
// CLI entry: load a solver result, replay its iteration history in real time
// while animating vehicle markers, then optionally export the chart series
// and save the session.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{info, warn};

use crate::chart;
use crate::config::{clamp_play_speed, ReplayConfig};
use crate::error::ReplayError;
use crate::orchestrator::ReplaySession;
use crate::playback::PlayState;
use crate::session::{self, SessionFormat};
use crate::solver::SolverResult;

/// How often the run loop samples the clock. Well under the fastest playback
/// interval (50 ms) so deadlines fire close to on time.
const POLL_SLEEP_MS: u64 = 5;

#[derive(Parser, Debug)]
#[command(name = "route-replay", about = "Replay a route-solver result as a timed visualization")]
pub struct Args {
    /// Solver result JSON to replay.
    pub result: PathBuf,

    /// TOML config file; defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Playback interval in ms (50-1000); overrides the config file.
    #[arg(long)]
    pub speed: Option<u64>,

    /// Write the chart series as CSV here when the replay ends.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Save the finished session here (.json for JSON, anything else binary;
    /// append .gz to compress).
    #[arg(long)]
    pub save_session: Option<PathBuf>,

    /// Replay only the history, skipping the vehicle animation.
    #[arg(long)]
    pub no_animation: bool,
}

pub fn run(args: Args) -> Result<(), ReplayError> {
    let mut config = match &args.config {
        Some(path) => ReplayConfig::from_toml_file(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(ms) = args.speed {
        config.play_speed_ms = clamp_play_speed(ms);
    }

    let result = SolverResult::from_json_file(&args.result)?;
    let mut session = ReplaySession::new(config);
    session.load_result(result);

    let status = session.status_handle();
    let now = Instant::now();
    session.play(now);
    if !args.no_animation {
        match session.start_visualization(now) {
            Ok(()) => {}
            Err(ReplayError::NoSolvedPaths) => {
                warn!("result has no vehicle paths; replaying the history only");
            }
            Err(other) => return Err(other),
        }
    }

    let mut last_cursor = usize::MAX;
    loop {
        session.poll(Instant::now());
        let current = { status.lock().clone() };

        if current.cursor != last_cursor {
            last_cursor = current.cursor;
            if let Some(snapshot) = session.current_snapshot() {
                match snapshot.temperature {
                    Some(t) => info!(
                        "iteration {:>6}  cost {:>10.2}  temperature {:>9.2}",
                        snapshot.iteration, snapshot.cost, t
                    ),
                    None => info!(
                        "iteration {:>6}  cost {:>10.2}",
                        snapshot.iteration, snapshot.cost
                    ),
                }
            }
        }

        let playback_done = matches!(current.state, PlayState::Finished | PlayState::Idle);
        let animation_done = !current.visualizing || current.all_arrived;
        if playback_done && animation_done {
            break;
        }
        thread::sleep(Duration::from_millis(POLL_SLEEP_MS));
    }
    session.stop_visualization();

    if let Some(path) = &args.csv {
        chart::write_csv_file(path, &session.chart_series())?;
        info!("chart series written to {}", path.display());
    }
    if let Some(path) = &args.save_session {
        let compress = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        session::save_session(path, &session::capture(&session), SessionFormat::from_path(path), compress)?;
        info!("session saved to {}", path.display());
    }

    for schedule in session
        .solver_result()
        .map(|r| r.schedule())
        .unwrap_or_default()
    {
        info!(
            "{}: {} stops, total demand {:.0}",
            schedule.vehicle_type,
            schedule.stops.len(),
            schedule.total_demand
        );
    }
    if let Some(cost) = session.final_cost() {
        info!("final cost {:.2}", cost);
    }
    Ok(())
}
