//! The per-directory split descriptor and its INI-style text form.
//!
//! Layout:
//!
//! ```text
//! [ORIGINAL]
//! filename = big.iso
//! size = 1000
//! hash = <sha-256 hex>
//!
//! [OPERATION]
//! compress = false
//!
//! [PARTS]
//! parts = 3
//! 0 = big.iso.0.part
//! 1 = big.iso.1.part
//! 2 = big.iso.2.part
//! ```

use crate::error::{FsplitError, Result};
use crate::hash::sha256::is_hex_digest;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

pub const DESCRIPTOR_FILE: &str = "split-descriptor.ini";
/// Staging name; renamed to `DESCRIPTOR_FILE` once fully written.
pub const DESCRIPTOR_TMP: &str = "split-descriptor.ini.tmp";
pub const PART_SUFFIX: &str = ".part";

const SEC_ORIGINAL: &str = "ORIGINAL";
const SEC_OPERATION: &str = "OPERATION";
const SEC_PARTS: &str = "PARTS";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitDescriptor {
    pub original_name: String,
    pub original_size: u64,
    pub original_hash: String,
    pub compressed: bool,
    /// Part file names; position is the part index.
    pub parts: Vec<String>,
}

/// `<original>.<index>.part`, index zero-padded to the width of the last index.
pub fn part_file_name(original_name: &str, index: u64, part_count: u64) -> String {
    let width = part_count.saturating_sub(1).to_string().len();
    format!("{original_name}.{index:0width$}{PART_SUFFIX}")
}

/// A single normal path component: no separators, no `.`/`..`, no newlines.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['\n', '\r', '\0', '/', '\\']) {
        return false;
    }
    if name.trim() != name {
        return false;
    }
    let mut comps = Path::new(name).components();
    matches!((comps.next(), comps.next()), (Some(Component::Normal(_)), None))
}

pub fn descriptor_path(dir: &Path) -> PathBuf {
    dir.join(DESCRIPTOR_FILE)
}

impl SplitDescriptor {
    pub fn part_count(&self) -> u64 {
        self.parts.len() as u64
    }

    pub fn validate(&self) -> Result<()> {
        if !is_plain_file_name(&self.original_name) {
            return Err(FsplitError::Format(format!(
                "unsafe original file name: {:?}",
                self.original_name
            )));
        }
        if !is_hex_digest(&self.original_hash) {
            return Err(FsplitError::Format(format!(
                "hash is not a sha-256 hex digest: {:?}",
                self.original_hash
            )));
        }
        for (i, p) in self.parts.iter().enumerate() {
            if !is_plain_file_name(p) {
                return Err(FsplitError::Format(format!("unsafe part #{i} name: {p:?}")));
            }
        }
        Ok(())
    }

    pub fn to_ini_string(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("[{SEC_ORIGINAL}]\n"));
        s.push_str(&format!("filename = {}\n", self.original_name));
        s.push_str(&format!("size = {}\n", self.original_size));
        s.push_str(&format!("hash = {}\n\n", self.original_hash));
        s.push_str(&format!("[{SEC_OPERATION}]\n"));
        s.push_str(&format!("compress = {}\n\n", self.compressed));
        s.push_str(&format!("[{SEC_PARTS}]\n"));
        s.push_str(&format!("parts = {}\n", self.parts.len()));
        for (i, p) in self.parts.iter().enumerate() {
            s.push_str(&format!("{i} = {p}\n"));
        }
        s
    }

    pub fn from_ini_str(text: &str) -> Result<Self> {
        let mut original: BTreeMap<String, String> = BTreeMap::new();
        let mut operation: BTreeMap<String, String> = BTreeMap::new();
        let mut parts_sec: BTreeMap<String, String> = BTreeMap::new();
        let mut section: Option<String> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim().to_ascii_uppercase());
                continue;
            }
            let (k, v) = line.split_once('=').ok_or_else(|| {
                FsplitError::Format(format!("line {}: expected `key = value`", lineno + 1))
            })?;
            let key = k.trim().to_ascii_lowercase();
            let value = v.trim().to_string();
            let target = match section.as_deref() {
                Some(SEC_ORIGINAL) => &mut original,
                Some(SEC_OPERATION) => &mut operation,
                Some(SEC_PARTS) => &mut parts_sec,
                Some(_) => continue,
                None => {
                    return Err(FsplitError::Format(format!(
                        "line {}: key outside of any section",
                        lineno + 1
                    )));
                }
            };
            target.insert(key, value);
        }

        let original_name = take(&mut original, SEC_ORIGINAL, "filename")?;
        let original_size = parse_u64(&take(&mut original, SEC_ORIGINAL, "size")?, "size")?;
        let original_hash = take(&mut original, SEC_ORIGINAL, "hash")?.to_ascii_lowercase();
        let compressed = parse_bool(&take(&mut operation, SEC_OPERATION, "compress")?)?;
        let part_count = parse_u64(&take(&mut parts_sec, SEC_PARTS, "parts")?, "parts")?;

        let mut indexed: BTreeMap<u64, String> = BTreeMap::new();
        for (k, v) in parts_sec {
            let idx = parse_u64(&k, "part index")?;
            indexed.insert(idx, v);
        }
        if indexed.len() as u64 != part_count {
            return Err(FsplitError::Format(format!(
                "descriptor declares {part_count} parts but lists {}",
                indexed.len()
            )));
        }
        // BTreeMap iterates in key order; contiguity means key == position.
        let mut parts = Vec::with_capacity(indexed.len());
        for (pos, (idx, name)) in indexed.into_iter().enumerate() {
            if idx != pos as u64 {
                return Err(FsplitError::Format(format!("part index {pos} is missing")));
            }
            parts.push(name);
        }

        let d = Self {
            original_name,
            original_size,
            original_hash,
            compressed,
            parts,
        };
        d.validate()?;
        Ok(d)
    }

    /// Stage to a temp file and rename into place.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        self.validate()?;
        let tmp = dir.join(DESCRIPTOR_TMP);
        let dst = descriptor_path(dir);
        {
            let mut f = File::create(&tmp)?;
            f.write_all(self.to_ini_string().as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &dst)?;
        Ok(dst)
    }

    pub fn read_from(dir: &Path) -> Result<Self> {
        let path = descriptor_path(dir);
        let text = fs::read_to_string(&path)
            .map_err(|source| FsplitError::MissingDescriptor { path, source })?;
        Self::from_ini_str(&text)
    }
}

fn take(map: &mut BTreeMap<String, String>, section: &str, key: &str) -> Result<String> {
    map.remove(key)
        .ok_or_else(|| FsplitError::Format(format!("missing [{section}] {key}")))
}

fn parse_u64(s: &str, what: &str) -> Result<u64> {
    s.parse::<u64>()
        .map_err(|e| FsplitError::Format(format!("bad {what} {s:?}: {e}")))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(FsplitError::Format(format!("bad boolean {s:?}"))),
    }
}
