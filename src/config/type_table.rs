use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{borrow::Cow, path::Path};
use tracing::debug;

use crate::codec::FOLDER_KIND;
use crate::ext::PathExt;

/// Kinds every table starts with, each written with an identical extension.
const DEFAULT_KINDS: [&str; 3] = ["json", "js", "ts"];

/// Mapping between file kinds and the extensions they are written with.
///
/// The same table drives both directions: reading a directory infers a kind
/// from a file name, extracting a bundle turns the kind back into a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTable {
    extensions: LinkedHashMap<String, String>,
}

impl Default for TypeTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for kind in DEFAULT_KINDS {
            table.register(kind, kind);
        }
        table
    }
}

impl TypeTable {
    pub fn empty() -> Self {
        Self {
            extensions: LinkedHashMap::new(),
        }
    }

    /// Reads a YAML type table and merges it over the defaults.
    pub fn read(path: &Path) -> Result<Self, TypeTableError> {
        debug!("Reading type table: {}", path.best_effort_display());
        let contents = std::fs::read_to_string(path).context(ReadSnafu {
            file_path: path.best_effort_display(),
        })?;
        contents.as_str().try_into()
    }

    /// Adds or replaces a kind. A leading dot on the extension is ignored.
    pub fn register(&mut self, kind: impl Into<String>, extension: impl AsRef<str>) {
        let extension = extension.as_ref().trim_start_matches('.').to_string();
        self.extensions.replace(kind.into(), extension);
    }

    pub fn extension_for(&self, kind: impl AsRef<str>) -> Option<&str> {
        self.extensions.get(kind.as_ref()).map(String::as_str)
    }

    /// The first registered kind written with `extension`.
    pub fn kind_for(&self, extension: impl AsRef<str>) -> Option<&str> {
        self.extensions
            .iter()
            .find(|(_, ext)| ext.as_str() == extension.as_ref())
            .map(|(kind, _)| kind.as_str())
    }

    pub fn kinds(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extensions
            .iter()
            .map(|(kind, ext)| (kind.as_str(), ext.as_str()))
    }

    /// Splits a file name into its logical name and kind.
    ///
    /// The longest registered extension that ends the name wins, so
    /// compound extensions such as `d.ts` can be registered. Otherwise the
    /// name is split at its last dot and the raw extension becomes the kind.
    /// A name without an extension gets an empty kind.
    pub fn split_file_name(&self, file_name: &str) -> (String, String) {
        let registered = self
            .extensions
            .iter()
            // Reversed so that among equally long extensions the first registered wins
            .rev()
            .filter_map(|(kind, ext)| {
                let stem = file_name.strip_suffix(ext.as_str())?.strip_suffix('.')?;
                (!stem.is_empty()).then_some((stem, kind, ext.len()))
            })
            .max_by_key(|(_, _, length)| *length);

        if let Some((stem, kind, _)) = registered {
            return (stem.to_string(), kind.clone());
        }

        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_string()),
            _ => (file_name.to_string(), String::new()),
        }
    }

    fn merge_from_yaml(
        &mut self,
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<(), TypeTableError> {
        let Some(types) = top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("types"))))
        else {
            debug!("No types section, keeping the defaults");
            return Ok(());
        };

        let types = types.as_mapping().context(TypesNotMapSnafu)?;
        for (key, value) in types.iter() {
            let kind = key.as_str().context(InvalidEntrySnafu {
                entry: format!("{key:?}"),
            })?;
            let extension = value.as_str().context(InvalidEntrySnafu {
                entry: kind.to_string(),
            })?;
            ensure!(
                kind != FOLDER_KIND && !extension.trim_start_matches('.').is_empty(),
                InvalidEntrySnafu {
                    entry: kind.to_string()
                }
            );

            debug!("Registering kind '{}' with extension '{}'", kind, extension);
            self.register(kind, extension);
        }

        Ok(())
    }
}

impl TryFrom<&str> for TypeTable {
    type Error = TypeTableError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let mut table = Self::default();
        table.merge_from_yaml(top_level)?;
        Ok(table)
    }
}

#[derive(Debug, Snafu)]
pub enum TypeTableError {
    #[snafu(display("Failed to read the type table: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the type table"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted type table"))]
    MalformedConfig,
    #[snafu(display("Top level of the type table should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Types section should be a map of kind to extension"))]
    TypesNotMap,
    #[snafu(display("Invalid type table entry '{}'", entry))]
    InvalidEntry { entry: String },
}
