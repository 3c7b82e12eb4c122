/// A single text file, either at the root of a bundle or inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Logical file name, without its extension
    pub name: String,
    /// Content kind tag, e.g. `json` or `ts`
    pub kind: String,
    pub code: String,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub files: Vec<FileEntry>,
    /// Slash separated path relative to the bundle root. Only nested folders have one.
    pub path: Option<String>,
}

impl FolderEntry {
    pub fn new(name: impl Into<String>, files: Vec<FileEntry>, path: Option<String>) -> Self {
        Self {
            name: name.into(),
            files,
            path,
        }
    }

    /// Name of the folder this one nests under.
    ///
    /// Only paths with at least two segments have a parent; a folder without
    /// a path, or with a single segment path, lives at the root.
    pub fn parent_name(&self) -> Option<&str> {
        let path = self.path.as_deref()?;
        let mut segments = path.rsplit('/').filter(|segment| !segment.is_empty());
        segments.next()?;
        segments.next()
    }

    /// The relative directory this folder materializes to.
    pub fn location(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(None, None)]
    #[case(Some("src"), None)]
    #[case(Some("src/lib"), Some("src"))]
    #[case(Some("src/lib/util"), Some("lib"))]
    #[case(Some("src/lib/"), Some("src"))]
    fn parent_name_is_second_to_last_segment(
        #[case] path: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let folder = FolderEntry::new("leaf", Vec::new(), path.map(str::to_string));
        assert_eq!(folder.parent_name(), expected);
    }

    #[test]
    fn location_prefers_path_over_name() {
        let root = FolderEntry::new("src", Vec::new(), None);
        let nested = FolderEntry::new("util", Vec::new(), Some("src/util".into()));

        assert_eq!(root.location(), "src");
        assert_eq!(nested.location(), "src/util");
    }
}
