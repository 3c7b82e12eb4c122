use std::fs;
use std::path::Path;

use clap::ValueEnum;
use derive_more::Display;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::bundle::PackageBundle;
use crate::codec::{BinaryError, Codec, EncodeError, ParseError, ZlibCodec};
use crate::ext::PathExt;

/// How an artifact is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum ArtifactFormat {
    /// The marker stream as UTF-8 text
    #[display("text")]
    Text,
    /// The marker stream passed through a codec
    #[default]
    #[display("binary")]
    Binary,
}

impl PackageBundle {
    /// Writes the bundle to `path`. `compress` only applies to binary artifacts.
    pub fn bundle(
        &self,
        path: impl AsRef<Path>,
        format: ArtifactFormat,
        compress: bool,
    ) -> Result<(), ArtifactError> {
        match (format, compress) {
            (ArtifactFormat::Binary, true) => self.bundle_with(path, format, &ZlibCodec::default()),
            (ArtifactFormat::Binary, false) => {
                let bytes = self.to_bytes(false).context(BinarySnafu)?;
                write_artifact(path.as_ref(), format, &bytes)
            }
            (ArtifactFormat::Text, _) => {
                let text = self.to_text().context(EncodeSnafu)?;
                write_artifact(path.as_ref(), format, text.as_bytes())
            }
        }
    }

    pub fn bundle_with(
        &self,
        path: impl AsRef<Path>,
        format: ArtifactFormat,
        codec: &dyn Codec,
    ) -> Result<(), ArtifactError> {
        let bytes = match format {
            ArtifactFormat::Text => self.to_text().context(EncodeSnafu)?.into_bytes(),
            ArtifactFormat::Binary => self.to_bytes_with(codec).context(BinarySnafu)?,
        };
        write_artifact(path.as_ref(), format, &bytes)
    }

    /// Reads a bundle back from `path`. Binary artifacts are always decompressed.
    pub fn open(path: impl AsRef<Path>, format: ArtifactFormat) -> Result<Self, ArtifactError> {
        Self::open_with(path, format, &ZlibCodec::default())
    }

    pub fn open_with(
        path: impl AsRef<Path>,
        format: ArtifactFormat,
        codec: &dyn Codec,
    ) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        debug!("Reading {} artifact {}", format, path.best_effort_display());
        let bytes = fs::read(path).context(ReadSnafu {
            path: path.best_effort_display(),
        })?;

        match format {
            ArtifactFormat::Text => {
                let text = String::from_utf8(bytes).context(InvalidUtf8Snafu {
                    path: path.best_effort_display(),
                })?;
                Self::from_text(&text).context(ParseSnafu)
            }
            ArtifactFormat::Binary => Self::from_bytes_with(&bytes, codec).context(BinarySnafu),
        }
    }
}

fn write_artifact(path: &Path, format: ArtifactFormat, bytes: &[u8]) -> Result<(), ArtifactError> {
    fs::write(path, bytes).context(WriteSnafu {
        path: path.best_effort_display(),
    })?;
    info!(
        "Wrote {} byte {} artifact to {}",
        bytes.len(),
        format,
        path.best_effort_display()
    );
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum ArtifactError {
    #[snafu(display("Failed to read artifact {}", path))]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write artifact {}", path))]
    WriteError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Text artifact {} is not valid UTF-8", path))]
    InvalidUtf8Error {
        path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to encode the text artifact"))]
    EncodeError { source: EncodeError },
    #[snafu(display("Text artifact is malformed"))]
    ParseError { source: ParseError },
    #[snafu(display("Failed to process the binary artifact"))]
    BinaryError { source: BinaryError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FileEntry;
    use crate::codec::ZstdCodec;
    use rstest::*;
    use tempfile::TempDir;

    fn sample_bundle() -> PackageBundle {
        let mut bundle = PackageBundle::new();
        bundle.add_file("tsconfig", "json", "{ \"strict\": true }");
        bundle.add_folder("src", vec![FileEntry::new("main", "ts", "main()")], None);
        bundle
    }

    #[rstest]
    #[case(ArtifactFormat::Text, false)]
    #[case(ArtifactFormat::Text, true)]
    #[case(ArtifactFormat::Binary, true)]
    fn bundle_then_open_restores_the_bundle(#[case] format: ArtifactFormat, #[case] compress: bool) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("package.bundle");

        sample_bundle().bundle(&path, format, compress).unwrap();
        let opened = PackageBundle::open(&path, format).unwrap();

        assert_eq!(opened, sample_bundle());
    }

    #[test]
    fn text_artifact_is_plain_markers() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("package.txt");

        sample_bundle().bundle(&path, ArtifactFormat::Text, true).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            sample_bundle().to_text().unwrap()
        );
    }

    #[test]
    fn uncompressed_binary_artifact_cannot_be_opened_as_binary() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("package.bin");

        sample_bundle()
            .bundle(&path, ArtifactFormat::Binary, false)
            .unwrap();

        assert!(matches!(
            PackageBundle::open(&path, ArtifactFormat::Binary),
            Err(ArtifactError::BinaryError {
                source: BinaryError::DecompressError { .. }
            })
        ));
        assert_eq!(
            PackageBundle::open(&path, ArtifactFormat::Text).unwrap(),
            sample_bundle()
        );
    }

    #[test]
    fn zstd_artifact_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("package.zst");
        let codec = ZstdCodec::default();

        sample_bundle()
            .bundle_with(&path, ArtifactFormat::Binary, &codec)
            .unwrap();

        assert_eq!(
            PackageBundle::open_with(&path, ArtifactFormat::Binary, &codec).unwrap(),
            sample_bundle()
        );
    }

    #[test]
    fn missing_artifact_is_a_read_error() {
        let result = PackageBundle::open("/this/path/does/not/exist.bundle", ArtifactFormat::Text);

        assert!(matches!(result, Err(ArtifactError::ReadError { .. })));
    }

    #[test]
    fn format_display_matches_cli_names() {
        assert_eq!(ArtifactFormat::Text.to_string(), "text");
        assert_eq!(ArtifactFormat::Binary.to_string(), "binary");
    }
}
