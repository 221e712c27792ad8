use crate::chunking::plan::ChunkSpec;
use crate::context::Context;
use crate::error::{FsplitError, Result};
use crate::read::merge::{MergeOptions, merge};
use crate::split::writer::{SplitOptions, split};
use crate::tree::walker::{collect_split_directories, collect_splittable};
use std::path::{Path, PathBuf};

/// Outcome of a bulk run. One item failing never stops the others.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, FsplitError)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, item: PathBuf, res: Result<()>, ctx: &Context) {
        match res {
            Ok(()) => self.succeeded.push(item),
            Err(e) => {
                ctx.alert(format!("{}: {e}", item.display()));
                self.failed.push((item, e));
            }
        }
    }
}

/// Split every eligible file under `root`.
pub fn split_tree(
    root: &Path,
    ignore_files: &[PathBuf],
    opts: &SplitOptions,
    ctx: &Context,
) -> Result<BatchReport> {
    // fail fast on bad sizing instead of once per file
    ChunkSpec::from_args(opts.parts, opts.chunk_size)?;
    let files = collect_splittable(root, ignore_files)?;
    ctx.log(format!("{} files to split", files.len()));

    let mut report = BatchReport::default();
    for f in files {
        let res = split(&f, opts, ctx).map(|_| ());
        report.record(f, res, ctx);
    }
    Ok(report)
}

/// Merge every split directory under `root`. A hash mismatch counts as a
/// failure for that directory only.
pub fn merge_tree(
    root: &Path,
    ignore_dirs: &[PathBuf],
    opts: &MergeOptions,
    ctx: &Context,
) -> Result<BatchReport> {
    let dirs = collect_split_directories(root, ignore_dirs)?;
    ctx.log(format!("{} directories to merge", dirs.len()));

    let mut report = BatchReport::default();
    for d in dirs {
        let res = merge(&d, opts, ctx).and_then(|r| r.ensure_verified()).map(|_| ());
        report.record(d, res, ctx);
    }
    Ok(report)
}
