use anyhow::Result;
use clap::Parser;
use looter::{config::Config, engine::Engine, service, sink::TracingSink};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Follow an EverQuest log and track drops, affiliations and DKP bids
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "looter.toml")]
    config: PathBuf,

    /// Replay the whole log before following it
    #[arg(long)]
    from_start: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let engine = Engine::from_config(&config, TracingSink::new_shared())?;
    info!(
        alliance = %engine.alliance().name,
        guilds = ?engine.alliance().guilds,
        "engine ready"
    );

    let follower = service::LogFollower::open(
        &config.log_file()?,
        engine.into_shared(),
        args.from_start || config.from_start,
        config.poll_interval(),
    )?;

    let svc_ctr = service::ServiceControl::new();

    ctrlc::set_handler({
        let svc_ctr = svc_ctr.clone();
        move || {
            eprintln!("Stopping all services...");
            svc_ctr.stop_all();
        }
    })?;

    svc_ctr.spawn_loop(follower).join()
}
