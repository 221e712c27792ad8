use crate::context::Context;
use crate::error::{FsplitError, Result};
use crate::hash::sha256::digest_file;
use crate::read::opened::OpenedSplit;
use crate::util::fsops::{remove_dir_with_entries, remove_file_if_exists};
use crate::util::hash_forward::HashingForward;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default)]
pub struct MergeOptions {
    /// Delete the split directory after a verified merge.
    pub remove_after: bool,
}

#[derive(Clone, Debug)]
pub struct MergeReport {
    pub target: PathBuf,
    pub expected_hash: String,
    pub verified_hash: String,
    pub bytes_written: u64,
    pub ok: bool,
}

impl MergeReport {
    /// Turns a reported mismatch into a `HashMismatch` error.
    pub fn ensure_verified(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(FsplitError::HashMismatch {
                target: self.target,
                expected: self.expected_hash,
                actual: self.verified_hash,
            })
        }
    }
}

#[derive(Clone, Debug)]
pub struct VerifyReport {
    pub dir: PathBuf,
    pub expected_hash: String,
    pub computed_hash: String,
    pub expected_size: u64,
    pub bytes: u64,
    pub ok: bool,
}

/// Rebuild the original next to `dir` from the parts listed in its descriptor.
///
/// A hash mismatch is not an error here: the report carries `ok == false`
/// and the rebuilt file stays on disk. Use [`MergeReport::ensure_verified`]
/// to make it one. Parts that decode to more or fewer bytes than the
/// descriptor records fail with `PartRead` before hashing.
pub fn merge(dir: &Path, opts: &MergeOptions, ctx: &Context) -> Result<MergeReport> {
    ctx.log(format!("reading directory: {}", dir.display()));
    let opened = OpenedSplit::open(dir)?;
    let d = &opened.descriptor;
    let target = opened.target_path()?;

    if fs::symlink_metadata(&target).is_ok_and(|m| m.is_dir()) {
        return Err(FsplitError::DirectoryConflict {
            path: target,
            reason: "merge target is a directory".into(),
        });
    }
    remove_file_if_exists(&target)?;

    ctx.log(format!("merging {} parts into {}", d.part_count(), target.display()));
    let file = OpenOptions::new().create(true).append(true).open(&target)?;
    let mut out = BufWriter::with_capacity(ctx.block_size(), file);
    let mut lens = Vec::new();
    for i in 0..d.part_count() {
        ctx.log(format!("reading part {}", d.parts[i as usize]));
        lens.push(opened.decode_part(i, &mut out, ctx.block_size())?);
    }
    out.into_inner().map_err(|e| e.into_error())?.sync_all()?;

    let bytes_written: u64 = lens.iter().sum();
    if bytes_written != d.original_size {
        if lens.is_empty() {
            return Err(FsplitError::Format(format!(
                "descriptor lists no parts for {} bytes",
                d.original_size
            )));
        }
        let index = suspect_part(&lens, d.original_size);
        return Err(FsplitError::PartRead {
            index,
            path: opened.part_path(index),
            reason: format!(
                "parts decode to {bytes_written} bytes, descriptor records {}",
                d.original_size
            ),
        });
    }

    ctx.log("verifying file hash");
    let verified_hash = digest_file(&target, ctx.block_size())?;
    let ok = verified_hash == d.original_hash;
    if ok {
        ctx.log("hash verification succeeded");
    } else {
        ctx.log(format!(
            "hash verification failed: expected {}, got {verified_hash}",
            d.original_hash
        ));
    }

    if opts.remove_after && ok {
        ctx.log("removing the split directory");
        remove_dir_with_entries(&opened.dir)?;
    }

    Ok(MergeReport {
        target,
        expected_hash: d.original_hash.clone(),
        verified_hash,
        bytes_written,
        ok,
    })
}

/// Index of the part to blame when the decoded lengths do not add up to
/// `expected`. Every part before the short tail holds a full chunk, so the
/// first part shorter than the longest one is the truncated candidate.
fn suspect_part(lens: &[u64], expected: u64) -> u64 {
    let last = lens.len().saturating_sub(1) as u64;
    let total: u64 = lens.iter().sum();
    if total > expected {
        let mut seen = 0u64;
        for (i, len) in lens.iter().enumerate() {
            seen += len;
            if seen > expected {
                return i as u64;
            }
        }
        return last;
    }
    let longest = lens.iter().copied().max().unwrap_or(0);
    lens.iter()
        .position(|&len| len < longest)
        .map_or(last, |i| i as u64)
}

/// Check a split directory in place by hashing the decoded parts; writes nothing.
pub fn verify(dir: &Path, ctx: &Context) -> Result<VerifyReport> {
    let opened = OpenedSplit::open(dir)?;
    let d = &opened.descriptor;
    let mut hasher = Sha256::new();
    let bytes = {
        let mut sink = HashingForward::new(std::io::sink(), &mut hasher);
        for i in 0..d.part_count() {
            opened.decode_part(i, &mut sink, ctx.block_size())?;
        }
        sink.flush()?;
        sink.counted
    };
    let computed_hash = hex::encode(hasher.finalize());
    let ok = computed_hash == d.original_hash && bytes == d.original_size;
    ctx.log(format!(
        "{}: {} ({} bytes)",
        opened.dir.display(),
        if ok { "OK" } else { "MISMATCH" },
        bytes
    ));
    Ok(VerifyReport {
        dir: opened.dir.clone(),
        expected_hash: d.original_hash.clone(),
        computed_hash,
        expected_size: d.original_size,
        bytes,
        ok,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blames_the_short_part() {
        assert_eq!(suspect_part(&[100, 50, 100], 300), 1);
        assert_eq!(suspect_part(&[100, 100, 10], 230), 2);
        assert_eq!(suspect_part(&[100, 40, 100, 30], 330), 1);
        // uniform shortfall: nothing stands out, blame the last part
        assert_eq!(suspect_part(&[50, 50], 200), 1);
    }

    #[test]
    fn blames_the_part_that_overruns() {
        assert_eq!(suspect_part(&[100, 180, 100], 300), 1);
        assert_eq!(suspect_part(&[100, 100, 140], 300), 2);
    }
}
