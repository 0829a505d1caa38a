use anyhow::Result;
use clap::Parser;
use multibroker::{config::Config, server, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "multibroker",
    version,
    about = "Configurable Open Service Broker simulator for integration tests"
)]
struct Cli {
    /// Interface to listen on (overrides HTTP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides HTTP_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log output format: text or json (overrides LOG_FORMAT)
    #[arg(long, value_parser = ["text", "json"])]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.http_host = host;
    }
    if let Some(port) = cli.port {
        config.http_port = port;
    }
    if let Some(log_format) = cli.log_format {
        config.telemetry.log_format = log_format;
    }

    telemetry::init(&config.telemetry);

    info!("Starting multibroker");
    info!("HTTP server listening on {}", config.http_addr());

    server::run(config).await
}
