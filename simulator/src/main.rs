//! CBS Simulator
//!
//! Serves the demo core banking ledger over HTTP.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cbs_simulator::{CbsServer, LogFormat, SimulatorConfig};

/// CBS Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "cbs-simulator")]
#[command(about = "Core banking system simulator", version)]
struct Args {
    /// Listen address (overrides CBS_LISTEN_ADDR)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Environment name reported by the banner (overrides CBS_ENVIRONMENT / NODE_ENV)
    #[arg(short, long)]
    environment: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply(self, mut config: SimulatorConfig) -> SimulatorConfig {
        if let Some(host) = self.host {
            config.listen_addr = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(environment) = self.environment {
            config.environment = environment;
        }
        if self.json_logs {
            config.log_format = LogFormat::Json;
        }
        config
    }
}

fn init_tracing(config: &SimulatorConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.apply(SimulatorConfig::from_env());

    init_tracing(&config);

    info!("Starting CBS Simulator");

    let server = match CbsServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Failed to start");
            return Err(anyhow::anyhow!("Startup error: {}", e));
        }
    };

    info!(
        port = server.config().port,
        environment = %server.config().environment,
        metrics = server.config().metrics_enabled,
        "Ledger seeded"
    );

    server.serve().await?;

    info!("CBS Simulator shutdown complete");
    Ok(())
}
