//! optionlab web server binary.
//!
//! Serves the HTML pricing form, the JSON pricing API, and health probes.
//! Configuration is layered: defaults, optional TOML file, `OPTIONLAB_*`
//! environment variables, then CLI flags.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_web::config::ServerConfig;
use service_web::Server;

/// optionlab pricing web server
#[derive(Parser)]
#[command(name = "optionlab_web")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .apply_env()?;

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Initialise tracing; RUST_LOG wins over the configured level.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_filter_str().into()),
        )
        .init();

    Server::new(config).run().await?;
    Ok(())
}
