use std::path::PathBuf;

use clap::Parser;

use spend_tracker::config::load_or_default;
use spend_tracker::lifecycle::{signals, startup};
use spend_tracker::observability::logging;
use spend_tracker::Shutdown;

#[derive(Parser)]
#[command(name = "spend-tracker")]
#[command(about = "Serves the spend tracker shell, category registry and route table", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SPEND_TRACKER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("spend-tracker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base = %config.routing.base,
        request_timeout_secs = config.timeouts.request_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
