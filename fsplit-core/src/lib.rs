#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod log;

pub mod util {
    pub mod fsops;
    pub mod hash_forward;
}

pub mod chunking {
    pub mod plan;
}

pub mod hash {
    pub mod sha256;
}

pub mod codec;

pub mod container {
    pub mod descriptor;
}

pub mod split {
    pub mod writer;
}

pub mod read {
    pub mod merge;
    pub mod opened;
}

pub mod tree {
    pub mod batch;
    pub mod walker;
}

// Re-exports: stable API surface
pub use chunking::plan::{ChunkPlan, ChunkSpec};
pub use container::descriptor::SplitDescriptor;
pub use context::Context;
pub use read::merge::{MergeOptions, MergeReport, VerifyReport, merge, verify};
pub use split::writer::{SplitOptions, split};
pub use tree::batch::{BatchReport, merge_tree, split_tree};
pub use tree::walker::{collect_split_directories, collect_splittable};
