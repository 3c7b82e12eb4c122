use hashlink::LinkedHashMap;
use tracing::debug;

use super::{FileEntry, FolderEntry};

/// Root files and folders of a bundle, both kept in insertion order.
///
/// The order matters: it is the order entries are written to the text
/// artifact, so building the same bundle twice yields identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageBundle {
    files: LinkedHashMap<String, FileEntry>,
    folders: LinkedHashMap<String, FolderEntry>,
}

impl PackageBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a root level file, returning the entry it replaced if the name was taken.
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        code: impl Into<String>,
    ) -> Option<FileEntry> {
        let entry = FileEntry::new(name, kind, code);
        debug!("Adding file '{}' of kind '{}'", entry.name, entry.kind);
        self.files.replace(entry.name.clone(), entry)
    }

    /// Inserts a folder, returning the entry it replaced if the name was taken.
    ///
    /// Folders live in one flat map regardless of nesting depth, so two
    /// folders with the same name in different branches collide.
    pub fn add_folder(
        &mut self,
        name: impl Into<String>,
        files: Vec<FileEntry>,
        path: Option<String>,
    ) -> Option<FolderEntry> {
        let entry = FolderEntry::new(name, files, path);
        debug!(
            "Adding folder '{}' at '{}' with {} files",
            entry.name,
            entry.location(),
            entry.files.len()
        );
        self.folders.replace(entry.name.clone(), entry)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values()
    }

    pub fn folders(&self) -> impl Iterator<Item = &FolderEntry> {
        self.folders.values()
    }

    pub fn file(&self, name: impl AsRef<str>) -> Option<&FileEntry> {
        self.files.get(name.as_ref())
    }

    pub fn folder(&self, name: impl AsRef<str>) -> Option<&FolderEntry> {
        self.folders.get(name.as_ref())
    }

    pub(crate) fn folder_mut(&mut self, name: impl AsRef<str>) -> Option<&mut FolderEntry> {
        self.folders.get_mut(name.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }
}
