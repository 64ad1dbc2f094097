use clap::Parser;
use clipcast::config::ServiceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Screen recording session service with shareable links.
#[derive(Debug, Parser)]
#[command(name = "clipcast", version, about)]
struct Args {
    /// Path to a JSON config file
    #[arg(long, default_value = "clipcast.json")]
    config: PathBuf,

    /// Override the listen address
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Override the artifact storage directory
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Override the public base URL share links are minted against
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServiceConfig::load(&args.config);
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(dir) = args.artifact_dir {
        config.artifacts.root_dir = dir;
    }
    if let Some(base_url) = args.base_url {
        config.artifacts.public_base_url = base_url;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Clipcast v{}", env!("CARGO_PKG_VERSION"));

    clipcast::run(config).await
}
