use std::collections::HashSet;
use std::str::FromStr;

use snafu::prelude::*;
use tracing::{debug, warn};

use super::marker::{self, CLOSE, FOLDER_KIND, Header, OPEN, Token};
use crate::bundle::{FileEntry, FolderEntry, PackageBundle};

impl PackageBundle {
    /// Serializes the bundle into its canonical marker stream.
    ///
    /// Root files come first, then every folder header followed by the
    /// files of that folder. A nested folder is always written after its
    /// parent, so the stream can be read back in a single forward pass.
    pub fn to_text(&self) -> Result<String, EncodeError> {
        let mut text = String::new();

        for file in self.files() {
            write_file(&mut text, file, None)?;
        }

        for folder in self.folders_in_stream_order()? {
            ensure!(
                marker::is_valid_header_value(&folder.name),
                InvalidHeaderValueSnafu {
                    value: folder.name.clone()
                }
            );
            let header = Header::new(&folder.name, FOLDER_KIND, folder.parent_name());
            text.push_str(&header.to_string());
            text.push('\n');

            for file in &folder.files {
                write_file(&mut text, file, Some(&folder.name))?;
            }
        }

        debug!("Serialized bundle into {} bytes of text", text.len());
        Ok(text)
    }

    /// Parses a marker stream produced by [`PackageBundle::to_text`].
    ///
    /// Folders are resolved by name, so a parent folder marker must appear
    /// before any marker that references it.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let tokens = marker::tokenize(text)?;
        let mut bundle = Self::new();

        if tokens.is_empty() {
            ensure!(text.trim().is_empty(), NoMarkersSnafu);
            return Ok(bundle);
        }

        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            ensure!(
                token.is_header(),
                UnexpectedPayloadSnafu {
                    offset: token.offset
                }
            );
            let header = Header::parse(token)?;

            match (header.is_folder(), header.folder) {
                (true, None) => bundle.register_folder(header.name, None),
                (true, Some(parent)) => {
                    let parent = bundle.folder(parent).context(UnknownFolderSnafu {
                        name: header.name,
                        folder: parent,
                        offset: token.offset,
                    })?;
                    let path = format!("{}/{}", parent.location(), header.name);
                    bundle.register_folder(header.name, Some(path));
                }
                (false, Some(folder)) => {
                    let payload = next_payload(&mut tokens, &header, token.offset)?;
                    bundle
                        .folder_mut(folder)
                        .context(UnknownFolderSnafu {
                            name: header.name,
                            folder,
                            offset: token.offset,
                        })?
                        .files
                        .push(FileEntry::new(header.name, header.kind, payload.content));
                }
                (false, None) => {
                    let payload = next_payload(&mut tokens, &header, token.offset)?;
                    let previous = bundle.add_file(header.name, header.kind, payload.content);
                    if let Some(previous) = previous {
                        warn!(
                            "File '{}' appears more than once, keeping the last one",
                            previous.name
                        );
                    }
                }
            }
        }

        debug!(
            "Parsed {} root files and {} folders",
            bundle.files().count(),
            bundle.folders().count()
        );
        Ok(bundle)
    }

    fn register_folder(&mut self, name: &str, path: Option<String>) {
        if let Some(previous) = self.add_folder(name, Vec::new(), path) {
            warn!(
                "Folder '{}' appears more than once, dropping {} files of the earlier one",
                previous.name,
                previous.files.len()
            );
        }
    }

    /// Folders in insertion order, with any folder whose parent has not been
    /// emitted yet preceded by its chain of ancestors.
    fn folders_in_stream_order(&self) -> Result<Vec<&FolderEntry>, EncodeError> {
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut ordered = Vec::new();

        for folder in self.folders() {
            if emitted.contains(folder.name.as_str()) {
                continue;
            }

            let mut chain = vec![folder];
            let mut current = folder;
            while let Some(parent_name) = current.parent_name() {
                if emitted.contains(parent_name) {
                    break;
                }
                let parent = self.folder(parent_name).context(UnknownParentSnafu {
                    folder: current.name.clone(),
                    parent: parent_name,
                })?;
                ensure!(
                    !chain.iter().any(|f| f.name == parent.name),
                    CyclicParentSnafu {
                        folder: folder.name.clone()
                    }
                );
                chain.push(parent);
                current = parent;
            }

            for entry in chain.into_iter().rev() {
                check_path_consistency(self, entry);
                emitted.insert(entry.name.as_str());
                ordered.push(entry);
            }
        }

        Ok(ordered)
    }
}

impl FromStr for PackageBundle {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_text(text)
    }
}

fn write_file(
    text: &mut String,
    file: &FileEntry,
    folder: Option<&str>,
) -> Result<(), EncodeError> {
    for value in [&file.name, &file.kind] {
        ensure!(
            marker::is_valid_header_value(value),
            InvalidHeaderValueSnafu {
                value: value.clone()
            }
        );
    }
    ensure!(
        file.kind != FOLDER_KIND,
        ReservedKindSnafu {
            name: file.name.clone()
        }
    );
    ensure!(
        marker::is_valid_payload(&file.code),
        DelimiterInPayloadSnafu {
            name: file.name.clone()
        }
    );

    let header = Header::new(&file.name, &file.kind, folder);
    text.push_str(&header.to_string());
    text.push('\n');
    text.push_str(OPEN);
    text.push_str(&file.code);
    text.push_str(CLOSE);
    text.push('\n');
    Ok(())
}

fn next_payload<'a>(
    tokens: &mut impl Iterator<Item = Token<'a>>,
    header: &Header<'_>,
    offset: usize,
) -> Result<Token<'a>, ParseError> {
    tokens.next().context(MissingPayloadSnafu {
        name: header.name,
        offset,
    })
}

/// A nested folder is rebuilt from its parent's location on parse, so a path
/// that disagrees with the parent will not survive a round trip.
fn check_path_consistency(bundle: &PackageBundle, folder: &FolderEntry) {
    let (Some(path), Some(parent)) = (
        folder.path.as_deref(),
        folder.parent_name().and_then(|name| bundle.folder(name)),
    ) else {
        return;
    };

    let rebuilt = format!("{}/{}", parent.location(), folder.name);
    if rebuilt != path {
        warn!(
            "Folder '{}' has path '{}' but will be read back as '{}'",
            folder.name, path, rebuilt
        );
    }
}

/// The text artifact cannot be turned back into a bundle.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum ParseError {
    #[snafu(display("Artifact contains text but no markers"))]
    NoMarkers,
    #[snafu(display("Marker opened at byte {} is never closed", offset))]
    UnterminatedMarker { offset: usize },
    #[snafu(display("Header at byte {} has no '{}' field", offset, key))]
    MissingKey { key: &'static str, offset: usize },
    #[snafu(display(
        "Entry '{}' at byte {} references folder '{}' before it is defined",
        name,
        offset,
        folder
    ))]
    UnknownFolder {
        name: String,
        folder: String,
        offset: usize,
    },
    #[snafu(display("File '{}' at byte {} has no content marker", name, offset))]
    MissingPayload { name: String, offset: usize },
    #[snafu(display("Content marker at byte {} does not belong to any file", offset))]
    UnexpectedPayload { offset: usize },
}

/// The bundle holds something the text artifact cannot represent.
#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display("'{}' cannot be used as a name or type in a header", value))]
    InvalidHeaderValue { value: String },
    #[snafu(display("File '{}' uses the reserved type '{}'", name, FOLDER_KIND))]
    ReservedKind { name: String },
    #[snafu(display("Content of file '{}' contains a marker delimiter", name))]
    DelimiterInPayload { name: String },
    #[snafu(display("Folder '{}' is nested under unknown folder '{}'", folder, parent))]
    UnknownParent { folder: String, parent: String },
    #[snafu(display("Folder '{}' is nested under itself", folder))]
    CyclicParent { folder: String },
}
