//! levelwatch — replay subsystem state snapshots and report level trajectories
//!
//! Usage:
//!   levelwatch replay snapshots.jsonl                     → print summaries as JSON
//!   levelwatch replay snapshots.jsonl --export-dir out/   → also write one export per subsystem
//!   levelwatch summarize out/sys-a.json out/sys-b.json    → summarize exported documents
//!   levelwatch --dump-config                              → print default TOML config

use clap::{Parser, Subcommand};
use levelwatch::replay;
use levelwatch_tracker::export::read_document;
use levelwatch_tracker::{HistoryStore, TrackerConfig};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG: &str = "levelwatch.toml";

#[derive(Parser)]
#[command(
    name = "levelwatch",
    about = "Subsystem state history, level-leap milestones and trajectory summaries",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file (TOML). A named file must exist and parse; when
    /// omitted, ./levelwatch.toml is used if present, otherwise defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write daily-rotated logs into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Dump default config as TOML and exit.
    #[arg(long)]
    dump_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a JSONL file of snapshots and print every subsystem's summary
    Replay {
        /// One snapshot JSON object per line
        input: PathBuf,
        /// Write `<system_id>.json` export documents here
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Load export documents and print their summaries
    Summarize {
        /// Export documents written by `replay --export-dir`
        #[arg(required = true)]
        documents: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.dump_config {
        println!("{}", TrackerConfig::default().to_toml());
        return Ok(());
    }

    let _log_guard = init_tracing(cli.log_dir.as_deref());

    let config = match &cli.config {
        Some(path) => TrackerConfig::load_strict(path)?,
        None => TrackerConfig::load(Path::new(DEFAULT_CONFIG)),
    };
    let store = HistoryStore::from_config(&config);

    match cli.command {
        Some(Commands::Replay { input, export_dir }) => {
            store.enable();
            replay::replay_file(&store, &input)?;
            print_summaries(&store)?;
            if let Some(dir) = export_dir {
                let written = replay::export_all(&store, &dir)?;
                eprintln!("exported {} subsystem(s) to {}", written.len(), dir.display());
            }
        }
        Some(Commands::Summarize { documents }) => {
            for path in documents {
                let document = read_document(&path)
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
                store.import(document)?;
            }
            print_summaries(&store)?;
        }
        None => {
            anyhow::bail!(
                "no command given. Try `levelwatch replay <INPUT>` or `levelwatch --help`."
            );
        }
    }

    Ok(())
}

fn print_summaries(store: &HistoryStore) -> anyhow::Result<()> {
    let summaries = replay::summarize_all(store);
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

/// stderr logging, plus a rolling file when `log_dir` is set. The returned
/// guard flushes the file writer on drop and must outlive `main`'s work.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "levelwatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "levelwatch=info,levelwatch_tracker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
