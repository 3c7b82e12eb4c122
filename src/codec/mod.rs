//! Encoding a [`PackageBundle`](crate::bundle::PackageBundle) into an artifact and back.
//!
//! The canonical form is a flat stream of `<<...>>` markers. The binary form
//! is that same text passed through a [`Codec`], zlib unless told otherwise.

mod binary;
mod compression;
mod marker;
mod text;

pub use binary::BinaryError;
pub use compression::{Codec, CodecKind, ZlibCodec, ZstdCodec};
pub use marker::FOLDER_KIND;
pub use text::{EncodeError, ParseError};
