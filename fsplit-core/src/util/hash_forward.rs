use sha2::{Digest, Sha256};
use std::io::{Result, Write};

/// Write adapter that feeds every byte into a SHA-256 accumulator before
/// passing it on.
pub struct HashingForward<'a, W: Write> {
    inner: W,
    hasher: &'a mut Sha256,
    pub counted: u64,
}

impl<'a, W: Write> HashingForward<'a, W> {
    pub fn new(inner: W, hasher: &'a mut Sha256) -> Self {
        Self {
            inner,
            hasher,
            counted: 0,
        }
    }
}

impl<'a, W: Write> Write for HashingForward<'a, W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.counted += n as u64;
        Ok(n)
    }
    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}
