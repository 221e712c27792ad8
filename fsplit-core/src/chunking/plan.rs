use crate::error::{FsplitError, Result};

/// Upper bound on the number of part files one split may produce.
pub const MAX_PARTS: u64 = 1 << 20;

/// How the caller sizes a split. Exactly one dimension is fixed; the planner
/// derives the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkSpec {
    Parts(u64),
    ChunkSize(u64),
}

impl ChunkSpec {
    /// Build from the two raw knobs, where 0 means "not given".
    pub fn from_args(parts: u64, chunk_size: u64) -> Result<Self> {
        match (parts, chunk_size) {
            (0, 0) => Err(FsplitError::InvalidArguments(
                "parts and chunk size cannot both be 0".into(),
            )),
            (p, 0) => Ok(ChunkSpec::Parts(p)),
            (0, c) => Ok(ChunkSpec::ChunkSize(c)),
            (p, c) => Err(FsplitError::InvalidArguments(format!(
                "give either parts ({p}) or chunk size ({c}), not both"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    pub parts: u64,
    pub chunk_size: u64,
}

impl ChunkPlan {
    pub fn resolve(file_size: u64, spec: ChunkSpec) -> Result<Self> {
        let plan = match spec {
            ChunkSpec::Parts(0) | ChunkSpec::ChunkSize(0) => {
                return Err(FsplitError::InvalidArguments(
                    "parts and chunk size must be positive".into(),
                ));
            }
            ChunkSpec::Parts(parts) => Self {
                parts,
                chunk_size: file_size.div_ceil(parts),
            },
            ChunkSpec::ChunkSize(chunk_size) => Self {
                parts: file_size.div_ceil(chunk_size),
                chunk_size,
            },
        };
        if plan.parts > MAX_PARTS {
            return Err(FsplitError::InvalidArguments(format!(
                "{} parts requested, at most {MAX_PARTS} allowed",
                plan.parts
            )));
        }
        Ok(plan)
    }

    /// Plaintext length of part `index` for a file of `file_size` bytes.
    pub fn part_len(&self, index: u64, file_size: u64) -> u64 {
        let start = index.saturating_mul(self.chunk_size);
        file_size.saturating_sub(start).min(self.chunk_size)
    }
}
