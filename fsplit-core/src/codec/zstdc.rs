use super::{CodecId, Compressor, CountingWriter, Encoded};
use crate::error::Result;
use std::io::{Read, Write};

pub const DEFAULT_LEVEL: i32 = 3;

/// One complete zstd frame per part.
pub struct ZstdCompressor;

impl Compressor for ZstdCompressor {
    fn id(&self) -> CodecId {
        CodecId::Zstd
    }

    fn encode(&self, src: &mut dyn Read, dst: &mut dyn Write, level: i32) -> Result<Encoded> {
        let mut counted = CountingWriter::new(dst);
        let mut enc = zstd::stream::Encoder::new(&mut counted, level.max(1))?;
        let plain = std::io::copy(src, &mut enc)?;
        // finish() writes the frame epilogue
        enc.finish()?;
        Ok(Encoded {
            plain,
            stored: counted.n,
        })
    }

    fn decode(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64> {
        let mut dec = zstd::stream::Decoder::new(src)?;
        Ok(std::io::copy(&mut dec, dst)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_roundtrip_and_shrinks_repetitive_input() {
        let data = b"abcdefgh".repeat(512);
        let mut packed = Vec::new();
        let enc = ZstdCompressor
            .encode(&mut &data[..], &mut packed, DEFAULT_LEVEL)
            .unwrap();
        assert_eq!(enc.plain, data.len() as u64);
        assert_eq!(enc.stored, packed.len() as u64);
        assert!(packed.len() < data.len());
        assert_ne!(&packed[..], &data[..packed.len()]);

        let mut out = Vec::new();
        let w = ZstdCompressor.decode(&mut &packed[..], &mut out).unwrap();
        assert_eq!(w, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn empty_payload_still_produces_a_frame() {
        let mut packed = Vec::new();
        let enc = ZstdCompressor
            .encode(&mut &b""[..], &mut packed, DEFAULT_LEVEL)
            .unwrap();
        assert_eq!(enc.plain, 0);
        assert!(!packed.is_empty());

        let mut out = Vec::new();
        ZstdCompressor.decode(&mut &packed[..], &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn garbage_fails_to_decode() {
        let mut out = Vec::new();
        assert!(
            ZstdCompressor
                .decode(&mut &b"definitely not zstd"[..], &mut out)
                .is_err()
        );
    }
}
