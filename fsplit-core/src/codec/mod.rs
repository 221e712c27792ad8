use crate::error::Result;
use std::io::{Read, Write};

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodecId {
    Store = 0,
    Zstd = 1,
}

impl CodecId {
    pub fn for_flag(compressed: bool) -> Self {
        if compressed { CodecId::Zstd } else { CodecId::Store }
    }
}

/// Byte counts for one encoded part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Plaintext consumed from the source.
    pub plain: u64,
    /// Bytes that landed in the part file.
    pub stored: u64,
}

/// Each call handles one self-contained payload: an encoded part can be
/// decoded without any other part.
pub trait Compressor: Send + Sync {
    fn id(&self) -> CodecId;
    fn encode(&self, src: &mut dyn Read, dst: &mut dyn Write, level: i32) -> Result<Encoded>;
    /// Returns the number of plaintext bytes written to `dst`.
    fn decode(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64>;
}

pub fn codec_for(id: CodecId) -> &'static dyn Compressor {
    match id {
        CodecId::Store => &store::Store,
        CodecId::Zstd => &zstdc::ZstdCompressor,
    }
}

/// Write adapter that counts bytes accepted by the inner writer.
pub(crate) struct CountingWriter<'a> {
    inner: &'a mut dyn Write,
    pub n: u64,
}

impl<'a> CountingWriter<'a> {
    pub(crate) fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, n: 0 }
    }
}

impl Write for CountingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let k = self.inner.write(buf)?;
        self.n += k as u64;
        Ok(k)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

pub mod store;
pub mod zstdc;
