use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsplitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Descriptor missing or unreadable: {}: {source}", path.display())]
    MissingDescriptor {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot read part #{index} ({}): {reason}", path.display())]
    PartRead {
        index: u64,
        path: PathBuf,
        reason: String,
    },

    #[error("Hash mismatch for {}: expected {expected}, got {actual}", target.display())]
    HashMismatch {
        target: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Refusing to reuse {}: {reason}", path.display())]
    DirectoryConflict { path: PathBuf, reason: String },
}

impl FsplitError {
    /// True for a structurally complete reconstruction whose content is wrong.
    pub fn is_hash_mismatch(&self) -> bool {
        matches!(self, FsplitError::HashMismatch { .. })
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, FsplitError>;
