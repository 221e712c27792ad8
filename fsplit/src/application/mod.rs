pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use fsplit_core::Context;
use fsplit_core::error::Result;
use fsplit_core::log::TracingSink;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub use handlers::Outcome;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = Context::new(cli.verbose, Arc::new(TracingSink));

    match cli.command {
        Commands::Split {
            file,
            sizing,
            remove,
            compress,
            level,
        } => handlers::handle_split(file, sizing, remove, compress, level, &ctx),
        Commands::Merge { dir, remove } => handlers::handle_merge(dir, remove, &ctx),
        Commands::SplitDir {
            dir,
            sizing,
            remove,
            compress,
            level,
            ignore,
        } => handlers::handle_split_dir(dir, sizing, remove, compress, level, ignore, &ctx),
        Commands::MergeDir {
            dir,
            remove,
            ignore,
        } => handlers::handle_merge_dir(dir, remove, ignore, &ctx),
        Commands::Verify { dir } => handlers::handle_verify(dir, &ctx),
        Commands::Inspect { dir, json } => handlers::handle_inspect(dir, json),
    }
}
