//! StrataKV CLI
//!
//! Offline inspection of a data directory's WAL. Never writes to the log.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stratakv::engine::replay_into;
use stratakv::table::TableRegistry;
use stratakv::wal::{WalRecovery, WAL_FILENAME};
use tracing_subscriber::{fmt, EnvFilter};

/// StrataKV CLI
#[derive(Parser, Debug)]
#[command(name = "stratakv-cli")]
#[command(about = "Inspect a StrataKV write-ahead log")]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./stratakv_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count valid, corrupt, and torn records
    Verify,

    /// Print every valid entry as JSON, one per line
    Dump,

    /// Replay the log and summarize each table
    Tables,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> stratakv::Result<()> {
    let wal_path = args.data_dir.join(WAL_FILENAME);

    match args.command {
        Commands::Verify => {
            let result = WalRecovery::verify(&wal_path)?;
            println!("wal:       {}", wal_path.display());
            println!("recovered: {}", result.entries_recovered);
            println!("corrupted: {}", result.entries_corrupted);
            println!("last lsn:  {}", result.last_lsn);
            println!("torn tail: {}", result.was_truncated);
        }
        Commands::Dump => {
            let (entries, _) = WalRecovery::read(&wal_path)?;
            for entry in entries {
                println!("{}", serde_json::to_string(&entry)?);
            }
        }
        Commands::Tables => {
            let (entries, _) = WalRecovery::read(&wal_path)?;
            let registry = TableRegistry::new();
            let stats = replay_into(&registry, &entries)?;
            println!("replayed {} entries", stats.total());

            for name in registry.table_names() {
                let table = registry.get_table(&name)?;
                let schema = table.schema();
                println!(
                    "{}  pk={} sk={}  items={} partitions={}",
                    name,
                    schema.partition_key_name,
                    schema.sort_key_name.as_deref().unwrap_or("-"),
                    table.item_count(),
                    table.partition_count()
                );
            }
        }
    }

    Ok(())
}
