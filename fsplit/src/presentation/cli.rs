use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Split large files into parts and merge them back", long_about = None)]
pub struct Cli {
    /// Print progress messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Exactly one of --parts / --chunk-size.
#[derive(Args, Clone, Debug)]
#[command(group(ArgGroup::new("sizing").required(true).args(["parts", "chunk_size"])))]
pub struct Sizing {
    /// Number of parts to split into
    #[arg(short, long)]
    pub parts: Option<u64>,

    /// Max size in bytes of each part
    #[arg(short, long = "chunk-size")]
    pub chunk_size: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split one file into parts stored in a sibling directory
    Split {
        /// File to split
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        sizing: Sizing,

        /// Remove the original file after splitting
        #[arg(short = 'R', long)]
        remove: bool,

        /// zstd-compress each part
        #[arg(long)]
        compress: bool,

        /// zstd level used with --compress
        #[arg(long, default_value_t = 3)]
        level: i32,
    },

    /// Merge a split directory back into the original file
    Merge {
        /// Directory holding the parts and descriptor
        #[arg(short, long)]
        dir: PathBuf,

        /// Remove the directory after a verified merge
        #[arg(short = 'R', long)]
        remove: bool,
    },

    /// Recursively split every file under a directory
    SplitDir {
        #[arg(short, long)]
        dir: PathBuf,

        #[command(flatten)]
        sizing: Sizing,

        #[arg(short = 'R', long)]
        remove: bool,

        #[arg(long)]
        compress: bool,

        #[arg(long, default_value_t = 3)]
        level: i32,

        /// Files (or subtrees) to leave alone; repeatable
        #[arg(long = "ignore", value_name = "PATH")]
        ignore: Vec<PathBuf>,
    },

    /// Recursively merge every split directory under a directory
    MergeDir {
        #[arg(short, long)]
        dir: PathBuf,

        #[arg(short = 'R', long)]
        remove: bool,

        /// Directories to leave alone; repeatable
        #[arg(long = "ignore", value_name = "PATH")]
        ignore: Vec<PathBuf>,
    },

    /// Check a split directory's parts against the recorded hash
    Verify {
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// Print a split directory's descriptor
    Inspect {
        #[arg(short, long)]
        dir: PathBuf,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
