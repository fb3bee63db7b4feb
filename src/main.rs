use clap::Parser;

use route_replay::app;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = app::Args::parse();
    if let Err(err) = app::run(args) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
