//! Breadth-first collectors for bulk split and merge.
//!
//! Both walks canonicalize the root and the ignore entries up front, so an
//! ignore entry matches however it was spelled. Symbolic links are never
//! followed. A subdirectory that cannot be listed is logged and skipped;
//! only an unreadable root fails the walk.

use crate::container::descriptor::{DESCRIPTOR_FILE, DESCRIPTOR_TMP, PART_SUFFIX};
use crate::error::{FsplitError, Result};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

pub fn is_split_directory(dir: &Path) -> bool {
    dir.join(DESCRIPTOR_FILE).is_file()
}

/// Names the engine itself writes; never candidates for splitting.
pub fn is_split_artifact(file_name: &str) -> bool {
    file_name.ends_with(PART_SUFFIX) || file_name == DESCRIPTOR_FILE || file_name == DESCRIPTOR_TMP
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    let abs = fs::canonicalize(root).map_err(|_| FsplitError::MissingDirectory(root.into()))?;
    if !abs.is_dir() {
        return Err(FsplitError::MissingDirectory(root.into()));
    }
    Ok(abs)
}

/// Entries that do not exist cannot match anything on disk and are dropped.
fn resolve_ignores(entries: &[PathBuf]) -> HashSet<PathBuf> {
    entries
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .collect()
}

/// (files, subdirectories)
type Listing = (Vec<PathBuf>, Vec<PathBuf>);

/// Direct children of `dir`, name-sorted, split into files and subdirectories.
fn children(dir: &Path) -> Result<Listing> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for e in entries {
        let ft = e.file_type()?;
        if ft.is_dir() {
            dirs.push(e.path());
        } else if ft.is_file() {
            files.push(e.path());
        }
        // symlinks skipped
    }
    Ok((files, dirs))
}

/// `children` for a queued directory. Below the root, a listing failure
/// prunes that subtree instead of ending the walk.
fn listed(dir: &Path, root: &Path) -> Result<Option<Listing>> {
    match children(dir) {
        Ok(c) => Ok(Some(c)),
        Err(e) if dir != root => {
            tracing::warn!(target: "fsplit", dir = %dir.display(), error = %e, "skipping unreadable directory");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Every regular file under `root` that is neither ignored nor a split
/// artifact, in breadth-first order.
pub fn collect_splittable(root: &Path, ignore_files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let root = resolve_root(root)?;
    let ignored = resolve_ignores(ignore_files);
    let mut out = Vec::new();
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(dir) = queue.pop_front() {
        if ignored.contains(&dir) {
            continue;
        }
        let Some((files, dirs)) = listed(&dir, &root)? else {
            continue;
        };
        for f in files {
            let skip = ignored.contains(&f)
                || f.file_name()
                    .map(|n| is_split_artifact(&n.to_string_lossy()))
                    .unwrap_or(true);
            if !skip {
                out.push(f);
            }
        }
        queue.extend(dirs);
    }
    Ok(out)
}

/// Directories under `root` (root included) that carry a descriptor. The
/// walk does not descend into a directory once it is recognised as split.
pub fn collect_split_directories(root: &Path, ignore_dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let root = resolve_root(root)?;
    let ignored = resolve_ignores(ignore_dirs);
    let mut out = Vec::new();
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(dir) = queue.pop_front() {
        if ignored.contains(&dir) {
            continue;
        }
        if is_split_directory(&dir) {
            out.push(dir);
            continue;
        }
        if let Some((_, dirs)) = listed(&dir, &root)? {
            queue.extend(dirs);
        }
    }
    Ok(out)
}
