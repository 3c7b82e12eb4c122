use snafu::prelude::*;
use tracing::debug;

use super::{Codec, EncodeError, ParseError, ZlibCodec};
use crate::bundle::PackageBundle;

impl PackageBundle {
    /// Encodes the text artifact as bytes, zlib compressed when `compress` is set.
    ///
    /// Nothing in the output records whether compression was used; readers
    /// have to know.
    pub fn to_bytes(&self, compress: bool) -> Result<Vec<u8>, BinaryError> {
        if compress {
            return self.to_bytes_with(&ZlibCodec::default());
        }
        Ok(self.to_text().context(EncodeSnafu)?.into_bytes())
    }

    pub fn to_bytes_with(&self, codec: &dyn Codec) -> Result<Vec<u8>, BinaryError> {
        let text = self.to_text().context(EncodeSnafu)?;
        let bytes = codec.compress(text.as_bytes()).context(CompressSnafu)?;
        debug!("Compressed {} bytes of text into {}", text.len(), bytes.len());
        Ok(bytes)
    }

    /// Decodes a zlib compressed artifact.
    ///
    /// Input is always treated as compressed, so the output of
    /// `to_bytes(false)` is rejected here; read it with `from_text` instead.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BinaryError> {
        Self::from_bytes_with(bytes, &ZlibCodec::default())
    }

    pub fn from_bytes_with(bytes: &[u8], codec: &dyn Codec) -> Result<Self, BinaryError> {
        let decompressed = codec.decompress(bytes).context(DecompressSnafu)?;
        debug!(
            "Decompressed {} bytes into {}",
            bytes.len(),
            decompressed.len()
        );
        let text = String::from_utf8(decompressed).context(InvalidUtf8Snafu)?;
        Self::from_text(&text).context(ParseSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum BinaryError {
    #[snafu(display("Failed to encode bundle as text"))]
    EncodeError { source: EncodeError },
    #[snafu(display("Failed to compress artifact"))]
    CompressError { source: std::io::Error },
    #[snafu(display("Artifact is not valid compressed data"))]
    DecompressError { source: std::io::Error },
    #[snafu(display("Decompressed artifact is not valid UTF-8"))]
    InvalidUtf8Error { source: std::string::FromUtf8Error },
    #[snafu(display("Decompressed artifact is malformed"))]
    ParseError { source: ParseError },
}
