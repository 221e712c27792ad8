use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read buffer used for hashing and part copies.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_LEN: usize = 64;

/// SHA-256 of a file's contents, lowercase hex. Reads `block_size` bytes at a
/// time so memory stays flat for any file size.
pub fn digest_file(path: &Path, block_size: usize) -> Result<String> {
    let f = File::open(path)?;
    digest_reader(f, block_size)
}

pub fn digest_reader<R: Read>(mut r: R, block_size: usize) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; block_size.max(1)];
    loop {
        let n = r.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn is_hex_digest(s: &str) -> bool {
    s.len() == HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn known_vectors() {
        assert_eq!(digest_reader(&b""[..], 512).unwrap(), EMPTY);
        assert_eq!(digest_reader(&b"abc"[..], 512).unwrap(), ABC);
    }

    #[test]
    fn block_size_does_not_change_digest() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let a = digest_reader(&data[..], 1).unwrap();
        let b = digest_reader(&data[..], 7).unwrap();
        let c = digest_reader(&data[..], DEFAULT_BLOCK_SIZE).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(is_hex_digest(&a));
    }

    #[test]
    fn digest_file_matches_reader() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"abc").unwrap();
        f.flush().unwrap();
        assert_eq!(digest_file(f.path(), 2).unwrap(), ABC);
    }

    #[test]
    fn rejects_non_digests() {
        assert!(!is_hex_digest("abc"));
        assert!(!is_hex_digest(&"z".repeat(HEX_LEN)));
        assert!(is_hex_digest(EMPTY));
    }
}
