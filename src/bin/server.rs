//! StrataKV Server Binary
//!
//! Replays the WAL, then serves the HTTP API.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use stratakv::config::WalSyncStrategy;
use stratakv::network::Server;
use stratakv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// StrataKV Server
#[derive(Parser, Debug)]
#[command(name = "stratakv-server")]
#[command(about = "Single-node table store with a write-ahead log")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./stratakv_data")]
    data_dir: PathBuf,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Skip fsync on WAL appends (faster, not power-loss safe)
    #[arg(long)]
    no_fsync: bool,
}

impl Args {
    fn config(&self) -> Config {
        let sync_strategy = if self.no_fsync {
            WalSyncStrategy::OsBuffered
        } else {
            WalSyncStrategy::EveryWrite
        };

        Config::builder()
            .data_dir(&self.data_dir)
            .listen_addr(&self.listen)
            .wal_sync_strategy(sync_strategy)
            .build()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stratakv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    tracing::info!("StrataKV Server v{}", stratakv::VERSION);

    match run(args.config()).await {
        Ok(()) => {
            tracing::info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> stratakv::Result<()> {
    tracing::info!(
        data_dir = %config.data_dir.display(),
        listen = %config.listen_addr,
        sync = ?config.wal_sync_strategy,
        "starting"
    );

    // Replay runs inside open, on a blocking thread since it is all file I/O
    let open_config = config.clone();
    let engine = tokio::task::spawn_blocking(move || Engine::open(open_config))
        .await
        .map_err(|e| stratakv::StrataError::Network(format!("startup task failed: {}", e)))??;
    let engine = Arc::new(engine);

    tracing::info!("Engine ready with {} tables", engine.registry().len());

    Server::new(config, engine).run().await
}
