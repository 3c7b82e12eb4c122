use std::io::{self, Read, Write};

use clap::ValueEnum;
use derive_more::Display;
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};

/// A reversible byte transformation applied to the text artifact.
///
/// `decompress` must fail on input that was not produced by `compress`
/// rather than hand back garbage.
pub trait Codec: Send + Sync {
    fn compress(&self, bytes: &[u8]) -> io::Result<Vec<u8>>;
    fn decompress(&self, bytes: &[u8]) -> io::Result<Vec<u8>>;
}

/// zlib wrapped deflate, the format binary artifacts use by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibCodec {
    level: Compression,
}

impl ZlibCodec {
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level),
        }
    }
}

impl Codec for ZlibCodec {
    fn compress(&self, bytes: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder.write_all(bytes)?;
        encoder.finish()
    }

    fn decompress(&self, bytes: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        Ok(decompressed)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    pub fn with_level(level: i32) -> Self {
        Self { level }
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self {
            level: zstd::DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl Codec for ZstdCodec {
    fn compress(&self, bytes: &[u8]) -> io::Result<Vec<u8>> {
        zstd::encode_all(bytes, self.level)
    }

    fn decompress(&self, bytes: &[u8]) -> io::Result<Vec<u8>> {
        zstd::decode_all(bytes)
    }
}

/// Selects one of the built-in codecs by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum CodecKind {
    #[default]
    #[display("zlib")]
    Zlib,
    #[display("zstd")]
    Zstd,
}

impl CodecKind {
    pub fn codec(&self) -> Box<dyn Codec> {
        match self {
            CodecKind::Zlib => Box::new(ZlibCodec::default()),
            CodecKind::Zstd => Box::new(ZstdCodec::default()),
        }
    }
}
