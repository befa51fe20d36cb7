//! ProjectHub CLI binary.

use clap::Parser;
use projecthub::{cli::Cli, commands, config::CliConfig, init_tracing};
use task_store::{AggregateStore, FileKvStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = CliConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::debug!(data_dir = %config.data_dir.display(), "Starting ProjectHub");

    let kv = FileKvStore::open(&config.data_dir)?;
    let mut store = AggregateStore::new(kv);

    let mut stdout = std::io::stdout().lock();
    commands::run(&mut store, cli.project, cli.command, &mut stdout)
}
