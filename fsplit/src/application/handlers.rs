use std::path::PathBuf;
use std::process::ExitCode;

use crate::presentation::cli::Sizing;
use fsplit_core::error::{FsplitError, Result};
use fsplit_core::read::opened::OpenedSplit;
use fsplit_core::{
    BatchReport, Context, MergeOptions, SplitOptions, merge, merge_tree, split, split_tree, verify,
};

/// How a successfully executed command ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Content did not match the recorded hash.
    Mismatch,
    /// A bulk run finished with at least one failed item.
    Partial,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::Mismatch | Outcome::Partial => ExitCode::from(2),
        }
    }
}

fn split_options(sizing: Sizing, remove: bool, compress: bool, level: i32) -> SplitOptions {
    SplitOptions {
        parts: sizing.parts.unwrap_or(0),
        chunk_size: sizing.chunk_size.unwrap_or(0),
        remove_original: remove,
        compress,
        level,
    }
}

fn summarize(op: &str, report: &BatchReport) -> Outcome {
    eprintln!(
        "{op}: {} ok, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    for (path, err) in &report.failed {
        eprintln!("  {}: {err}", path.display());
    }
    if report.is_clean() {
        Outcome::Done
    } else {
        Outcome::Partial
    }
}

pub fn handle_split(
    file: PathBuf,
    sizing: Sizing,
    remove: bool,
    compress: bool,
    level: i32,
    ctx: &Context,
) -> Result<Outcome> {
    let opts = split_options(sizing, remove, compress, level);
    let d = split(&file, &opts, ctx)?;
    eprintln!(
        "split: {} -> {} parts{}",
        d.original_name,
        d.part_count(),
        if d.compressed { " (zstd)" } else { "" }
    );
    Ok(Outcome::Done)
}

pub fn handle_merge(dir: PathBuf, remove: bool, ctx: &Context) -> Result<Outcome> {
    let report = merge(&dir, &MergeOptions { remove_after: remove }, ctx)?;
    if report.ok {
        eprintln!("merge: {} (hash OK)", report.target.display());
        Ok(Outcome::Done)
    } else {
        eprintln!(
            "merge: {} hash mismatch: expected {}, got {}",
            report.target.display(),
            report.expected_hash,
            report.verified_hash
        );
        Ok(Outcome::Mismatch)
    }
}

pub fn handle_split_dir(
    dir: PathBuf,
    sizing: Sizing,
    remove: bool,
    compress: bool,
    level: i32,
    ignore: Vec<PathBuf>,
    ctx: &Context,
) -> Result<Outcome> {
    let opts = split_options(sizing, remove, compress, level);
    let report = split_tree(&dir, &ignore, &opts, ctx)?;
    Ok(summarize("split-dir", &report))
}

pub fn handle_merge_dir(
    dir: PathBuf,
    remove: bool,
    ignore: Vec<PathBuf>,
    ctx: &Context,
) -> Result<Outcome> {
    let report = merge_tree(&dir, &ignore, &MergeOptions { remove_after: remove }, ctx)?;
    Ok(summarize("merge-dir", &report))
}

pub fn handle_verify(dir: PathBuf, ctx: &Context) -> Result<Outcome> {
    let report = verify(&dir, ctx)?;
    if report.ok {
        eprintln!("verify: OK ({} bytes)", report.bytes);
        Ok(Outcome::Done)
    } else {
        eprintln!(
            "verify: MISMATCH expected {} ({} bytes), got {} ({} bytes)",
            report.expected_hash, report.expected_size, report.computed_hash, report.bytes
        );
        Ok(Outcome::Mismatch)
    }
}

pub fn handle_inspect(dir: PathBuf, json: bool) -> Result<Outcome> {
    let opened = OpenedSplit::open(&dir)?;
    let d = &opened.descriptor;
    if json {
        let s = serde_json::to_string_pretty(d)
            .map_err(|e| FsplitError::Format(format!("json encode: {e}")))?;
        println!("{s}");
    } else {
        println!("file:       {}", d.original_name);
        println!("size:       {}", d.original_size);
        println!("hash:       {}", d.original_hash);
        println!("compressed: {}", d.compressed);
        println!("parts:      {}", d.part_count());
        for (i, p) in d.parts.iter().enumerate() {
            let len = std::fs::metadata(opened.dir.join(p))
                .map(|m| m.len().to_string())
                .unwrap_or_else(|_| "missing".to_string());
            println!("#{i:<5} {len:>12}  {p}");
        }
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sizing(parts: Option<u64>, chunk_size: Option<u64>) -> Sizing {
        Sizing { parts, chunk_size }
    }

    #[test]
    fn split_merge_verify_through_handlers() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("movie.mp4");
        fs::write(&src, vec![9u8; 2048]).unwrap();
        let ctx = Context::default();

        let out = handle_split(src.clone(), sizing(Some(3), None), true, true, 3, &ctx).unwrap();
        assert_eq!(out, Outcome::Done);
        assert!(!src.exists());

        let dir = tmp.path().join("movie");
        assert_eq!(handle_verify(dir.clone(), &ctx).unwrap(), Outcome::Done);
        assert_eq!(handle_inspect(dir.clone(), true).unwrap(), Outcome::Done);
        assert_eq!(handle_merge(dir.clone(), true, &ctx).unwrap(), Outcome::Done);
        assert_eq!(fs::read(&src).unwrap(), vec![9u8; 2048]);
        assert!(!dir.exists());
    }

    #[test]
    fn mismatch_maps_to_its_own_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.bin");
        fs::write(&src, vec![1u8; 100]).unwrap();
        let ctx = Context::default();
        handle_split(src.clone(), sizing(None, Some(40)), false, false, 3, &ctx).unwrap();

        let part = tmp.path().join("a/a.bin.1.part");
        fs::write(&part, vec![2u8; 40]).unwrap();
        assert_eq!(handle_verify(tmp.path().join("a"), &ctx).unwrap(), Outcome::Mismatch);
        assert_eq!(
            handle_merge(tmp.path().join("a"), true, &ctx).unwrap(),
            Outcome::Mismatch
        );
        assert!(tmp.path().join("a").exists());
    }

    #[test]
    fn missing_sizing_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.bin");
        fs::write(&src, b"abc").unwrap();
        let err = handle_split(src, sizing(None, None), false, false, 3, &Context::default())
            .unwrap_err();
        assert!(matches!(err, FsplitError::InvalidArguments(_)));
    }

    #[test]
    fn batch_failures_are_partial() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("x.dat"), vec![5u8; 64]).unwrap();
        let ctx = Context::default();
        let out =
            handle_split_dir(tmp.path().into(), sizing(Some(2), None), true, false, 3, vec![], &ctx)
                .unwrap();
        assert_eq!(out, Outcome::Done);

        fs::remove_file(tmp.path().join("x/x.dat.0.part")).unwrap();
        let out = handle_merge_dir(tmp.path().into(), false, vec![], &ctx).unwrap();
        assert_eq!(out, Outcome::Partial);
    }
}
