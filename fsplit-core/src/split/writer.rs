use crate::chunking::plan::{ChunkPlan, ChunkSpec};
use crate::codec::zstdc::DEFAULT_LEVEL;
use crate::codec::{CodecId, codec_for};
use crate::container::descriptor::{
    DESCRIPTOR_FILE, DESCRIPTOR_TMP, PART_SUFFIX, SplitDescriptor, is_plain_file_name,
    part_file_name,
};
use crate::context::Context;
use crate::error::{FsplitError, Result};
use crate::hash::sha256::digest_file;
use crate::util::fsops::remove_file_if_exists;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct SplitOptions {
    /// Target number of parts; 0 when sizing by `chunk_size`.
    pub parts: u64,
    /// Target bytes per part; 0 when sizing by `parts`.
    pub chunk_size: u64,
    /// Delete the source once the descriptor is in place.
    pub remove_original: bool,
    /// zstd-compress each part independently.
    pub compress: bool,
    pub level: i32,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            parts: 0,
            chunk_size: 0,
            remove_original: false,
            compress: false,
            level: DEFAULT_LEVEL,
        }
    }
}

/// Base name with every suffix stripped: `a.tar.gz` → `a`, `.bashrc` stays.
/// Falls back to `<name>_split` when stripping would reuse the file's own name.
pub fn sibling_dir_name(file_name: &str) -> String {
    let lead = file_name.len() - file_name.trim_start_matches('.').len();
    let (dots, rest) = file_name.split_at(lead);
    let stem = if rest.ends_with('.') {
        rest
    } else {
        rest.split('.').next().unwrap_or(rest)
    };
    let name = format!("{dots}{stem}");
    if name == file_name || stem.is_empty() {
        format!("{file_name}_split")
    } else {
        name
    }
}

pub fn sibling_dir(source: &Path) -> Result<PathBuf> {
    let name = file_name_str(source)?;
    let parent = source
        .parent()
        .ok_or_else(|| FsplitError::SourceNotFound(source.to_path_buf()))?;
    Ok(parent.join(sibling_dir_name(name)))
}

fn file_name_str(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FsplitError::Format(format!("unsupported file name: {}", path.display())))
}

fn resolve_source(path: &Path) -> Result<PathBuf> {
    let abs = fs::canonicalize(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => FsplitError::SourceNotFound(path.to_path_buf()),
        _ => FsplitError::Io(e),
    })?;
    if !abs.is_file() {
        return Err(FsplitError::SourceNotFound(path.to_path_buf()));
    }
    Ok(abs)
}

/// Leaves `dir` existing and empty. Only a previous split of the same file,
/// or an empty directory, may be wiped.
fn prepare_sibling(dir: &Path, original_name: &str) -> Result<()> {
    let conflict = |reason: String| FsplitError::DirectoryConflict {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::symlink_metadata(dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir(dir)?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
        Ok(md) if !md.is_dir() => return Err(conflict("exists and is not a directory".into())),
        Ok(_) => {}
    }

    if dir.join(DESCRIPTOR_FILE).exists() {
        match SplitDescriptor::read_from(dir) {
            Ok(d) if d.original_name == original_name => {}
            Ok(d) => {
                return Err(conflict(format!(
                    "holds parts of a different file ({})",
                    d.original_name
                )));
            }
            Err(e) => return Err(conflict(format!("existing descriptor unreadable: {e}"))),
        }
    }

    let mut stale = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let ours = name == DESCRIPTOR_FILE
            || name == DESCRIPTOR_TMP
            || (name.starts_with(original_name) && name.ends_with(PART_SUFFIX));
        if entry.file_type()?.is_dir() || !ours {
            return Err(conflict(format!("contains unrelated entry {name}")));
        }
        stale.push(entry.path());
    }
    for p in stale {
        fs::remove_file(p)?;
    }
    fs::remove_dir(dir)?;
    fs::create_dir(dir)?;
    Ok(())
}

/// Split `path` into parts inside its sibling directory and return the
/// descriptor that was persisted there.
pub fn split(path: &Path, opts: &SplitOptions, ctx: &Context) -> Result<SplitDescriptor> {
    let spec = ChunkSpec::from_args(opts.parts, opts.chunk_size)?;
    let src = resolve_source(path)?;
    let original_name = file_name_str(&src)?.to_string();
    if !is_plain_file_name(&original_name) {
        return Err(FsplitError::Format(format!(
            "file name cannot be recorded: {original_name:?}"
        )));
    }
    let subdir = sibling_dir(&src)?;

    let original_size = fs::metadata(&src)?.len();
    ctx.log(format!("source file: {}", src.display()));
    ctx.log(format!("file size: {original_size}"));
    let original_hash = digest_file(&src, ctx.block_size())?;
    ctx.log(format!("file hash: {original_hash}"));

    let plan = ChunkPlan::resolve(original_size, spec)?;
    ctx.log(format!(
        "parts: {}, segment size: {}",
        plan.parts, plan.chunk_size
    ));

    ctx.log(format!("preparing directory {}", subdir.display()));
    prepare_sibling(&subdir, &original_name)?;

    let codec = codec_for(CodecId::for_flag(opts.compress));
    let mut f = File::open(&src)?;
    let mut parts = Vec::new();
    let mut consumed = 0u64;
    let mut stored = 0u64;
    for i in 0..plan.parts {
        let name = part_file_name(&original_name, i, plan.parts);
        let part_path = subdir.join(&name);
        ctx.log(format!("writing {name}"));

        let mut out = BufWriter::with_capacity(ctx.block_size(), File::create(&part_path)?);
        let mut chunk = (&mut f).take(plan.chunk_size);
        let enc = codec.encode(&mut chunk, &mut out, opts.level)?;
        consumed += enc.plain;
        stored += enc.stored;
        out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        parts.push(name);
    }
    if consumed != original_size {
        return Err(FsplitError::Format(format!(
            "source changed during split: read {consumed} of {original_size} bytes"
        )));
    }
    ctx.log(format!("{stored} bytes written"));

    let descriptor = SplitDescriptor {
        original_name,
        original_size,
        original_hash,
        compressed: opts.compress,
        parts,
    };
    descriptor.write_to(&subdir)?;
    ctx.log("descriptor written");

    if opts.remove_original {
        ctx.log("removing the original file");
        remove_file_if_exists(&src)?;
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_names() {
        assert_eq!(sibling_dir_name("movie.tar.gz"), "movie");
        assert_eq!(sibling_dir_name("data.bin"), "data");
        assert_eq!(sibling_dir_name(".bashrc"), ".bashrc_split");
        assert_eq!(sibling_dir_name(".config.json"), ".config");
        assert_eq!(sibling_dir_name("README"), "README_split");
        assert_eq!(sibling_dir_name("trailing."), "trailing._split");
    }

    #[test]
    fn invalid_arguments_touch_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.bin");
        fs::write(&src, b"hello").unwrap();
        let err = split(&src, &SplitOptions::default(), &Context::default()).unwrap_err();
        assert!(matches!(err, FsplitError::InvalidArguments(_)));
        assert!(!tmp.path().join("a").exists());
    }

    #[test]
    fn missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = SplitOptions {
            parts: 2,
            ..Default::default()
        };
        let err = split(&tmp.path().join("nope.bin"), &opts, &Context::default()).unwrap_err();
        assert!(matches!(err, FsplitError::SourceNotFound(_)));
        // a directory is not a regular file either
        let err = split(tmp.path(), &opts, &Context::default()).unwrap_err();
        assert!(matches!(err, FsplitError::SourceNotFound(_)));
    }

    #[test]
    fn refuses_foreign_sibling_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("photos.zip");
        fs::write(&src, b"zipzip").unwrap();
        let user_dir = tmp.path().join("photos");
        fs::create_dir(&user_dir).unwrap();
        fs::write(user_dir.join("cat.jpg"), b"meow").unwrap();

        let opts = SplitOptions {
            parts: 2,
            ..Default::default()
        };
        let err = split(&src, &opts, &Context::default()).unwrap_err();
        assert!(matches!(err, FsplitError::DirectoryConflict { .. }));
        assert_eq!(fs::read(user_dir.join("cat.jpg")).unwrap(), b"meow");
    }

    #[test]
    fn refuses_sibling_of_another_original() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), b"text").unwrap();
        fs::write(tmp.path().join("a.bin"), b"binary").unwrap();
        let opts = SplitOptions {
            parts: 1,
            ..Default::default()
        };
        split(&tmp.path().join("a.txt"), &opts, &Context::default()).unwrap();
        let err = split(&tmp.path().join("a.bin"), &opts, &Context::default()).unwrap_err();
        assert!(matches!(err, FsplitError::DirectoryConflict { .. }));
        let d = SplitDescriptor::read_from(&tmp.path().join("a")).unwrap();
        assert_eq!(d.original_name, "a.txt");
    }

    #[test]
    fn oversized_part_count_keeps_previous_split() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("hello.txt");
        fs::write(&src, b"hello").unwrap();
        let two = SplitOptions {
            parts: 2,
            ..Default::default()
        };
        split(&src, &two, &Context::default()).unwrap();

        let huge = SplitOptions {
            parts: u64::MAX,
            ..Default::default()
        };
        let err = split(&src, &huge, &Context::default()).unwrap_err();
        assert!(matches!(err, FsplitError::InvalidArguments(_)));
        let d = SplitDescriptor::read_from(&tmp.path().join("hello")).unwrap();
        assert_eq!(d.part_count(), 2);
        for name in &d.parts {
            assert!(tmp.path().join("hello").join(name).exists());
        }
    }

    #[test]
    fn remove_original_deletes_source() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("x.dat");
        fs::write(&src, vec![7u8; 100]).unwrap();
        let opts = SplitOptions {
            chunk_size: 30,
            remove_original: true,
            ..Default::default()
        };
        let d = split(&src, &opts, &Context::default()).unwrap();
        assert_eq!(d.part_count(), 4);
        assert!(!src.exists());
        assert!(tmp.path().join("x").join(DESCRIPTOR_FILE).exists());
    }
}
