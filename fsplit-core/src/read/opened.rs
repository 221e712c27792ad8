use crate::codec::{CodecId, codec_for};
use crate::container::descriptor::SplitDescriptor;
use crate::error::{FsplitError, Result};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// A split directory whose descriptor has been read and validated.
#[derive(Clone, Debug)]
pub struct OpenedSplit {
    pub dir: PathBuf,
    pub descriptor: SplitDescriptor,
}

impl OpenedSplit {
    pub fn open(dir: &Path) -> Result<Self> {
        let is_dir = fs::metadata(dir).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(FsplitError::MissingDirectory(dir.to_path_buf()));
        }
        let dir = fs::canonicalize(dir)?;
        let descriptor = SplitDescriptor::read_from(&dir)?;
        Ok(Self { dir, descriptor })
    }

    pub fn part_path(&self, index: u64) -> PathBuf {
        self.dir.join(&self.descriptor.parts[index as usize])
    }

    /// Where the original is rebuilt: next to the split directory.
    pub fn target_path(&self) -> Result<PathBuf> {
        let parent = self.dir.parent().ok_or_else(|| {
            FsplitError::Format(format!("{} has no parent directory", self.dir.display()))
        })?;
        Ok(parent.join(&self.descriptor.original_name))
    }

    /// Decode part `index` into `dst`, returning the plaintext byte count.
    /// Every failure is reported as `PartRead` for that index.
    pub fn decode_part(&self, index: u64, dst: &mut dyn Write, block_size: usize) -> Result<u64> {
        let path = self.part_path(index);
        let part_err = |reason: String| FsplitError::PartRead {
            index,
            path: path.clone(),
            reason,
        };
        let f = File::open(&path).map_err(|e| part_err(e.to_string()))?;
        let mut r = BufReader::with_capacity(block_size, f);
        let codec = codec_for(CodecId::for_flag(self.descriptor.compressed));
        codec
            .decode(&mut r, dst)
            .map_err(|e| part_err(e.to_string()))
    }
}
