use std::fs;
use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::bundle::{FileEntry, PackageBundle};
use crate::config::TypeTable;
use crate::ext::PathExt;

impl PackageBundle {
    /// Builds a bundle from every directory and file below `root`.
    ///
    /// Top level directories become root folders, deeper ones become nested
    /// folders keyed by their last path segment. Files directly under `root`
    /// become root files, every other file joins the folder of its parent
    /// directory. Kinds are inferred through `types`.
    pub fn from_path(root: impl AsRef<Path>, types: &TypeTable) -> Result<Self, ScanError> {
        let root = root.as_ref();
        ensure!(
            root.is_dir(),
            NotADirectorySnafu {
                path: root.best_effort_display()
            }
        );

        let (directories, files) = collect_entries(root)?;
        let mut bundle = Self::new();

        // Every folder has to exist before files are attached to it
        for relative in directories {
            let previous = match relative.rsplit_once('/') {
                None => bundle.add_folder(relative.as_str(), Vec::new(), None),
                Some((_, name)) => bundle.add_folder(name, Vec::new(), Some(relative.clone())),
            };
            if let Some(previous) = previous {
                warn!(
                    "Directory '{}' shares its name with '{}', only the last one is kept",
                    relative,
                    previous.location()
                );
            }
        }

        for (path, relative) in files {
            let code = fs::read_to_string(&path).with_context(|_| ReadSnafu {
                path: path.best_effort_display(),
            })?;

            match relative.rsplit_once('/') {
                None => {
                    let (name, kind) = types.split_file_name(&relative);
                    if bundle.add_file(name, kind, code).is_some() {
                        warn!("File '{}' replaced an earlier file with the same name", relative);
                    }
                }
                Some((parent, file_name)) => {
                    let folder_name = parent.rsplit('/').next().unwrap_or(parent);
                    let (name, kind) = types.split_file_name(file_name);
                    match bundle.folder_mut(folder_name) {
                        Some(folder) => folder.files.push(FileEntry::new(name, kind, code)),
                        None => warn!("No folder '{}' for file '{}'", folder_name, relative),
                    }
                }
            }
        }

        info!(
            "Read {} root files and {} folders from {}",
            bundle.files().count(),
            bundle.folders().count(),
            root.best_effort_display()
        );
        Ok(bundle)
    }
}

/// Relative, slash separated paths of all directories and files below `root`,
/// in a stable order.
fn collect_entries(root: &Path) -> Result<(Vec<String>, Vec<(PathBuf, String)>), ScanError> {
    let mut directories = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|_| WalkSnafu {
            path: root.best_effort_display(),
        })?;
        let relative = entry
            .path()
            .to_slash_relative(root)
            .context(NonUtf8PathSnafu {
                path: entry.path().to_string_lossy().to_string(),
            })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            directories.push(relative);
        } else if file_type.is_file() {
            files.push((entry.into_path(), relative));
        } else {
            debug!("Skipping '{}', neither a file nor a directory", relative);
        }
    }

    debug!(
        "Found {} directories and {} files",
        directories.len(),
        files.len()
    );
    Ok((directories, files))
}

#[derive(Debug, Snafu)]
pub enum ScanError {
    #[snafu(display("{} is not a directory", path))]
    NotADirectory { path: String },
    #[snafu(display("Failed to walk directory {}", path))]
    WalkError {
        path: String,
        source: walkdir::Error,
    },
    #[snafu(display("Path {} is not valid UTF-8", path))]
    NonUtf8Path { path: String },
    #[snafu(display("Failed to read {} as text", path))]
    ReadError {
        path: String,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(path, contents).expect("Failed to write file");
    }

    #[test]
    fn root_files_and_folders_are_registered() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        write(temp_dir.path(), "package.json", "{}");
        write(temp_dir.path(), "src/index.ts", "export default 1");

        let bundle = PackageBundle::from_path(temp_dir.path(), &TypeTable::default()).unwrap();

        assert_eq!(bundle.file("package"), Some(&FileEntry::new("package", "json", "{}")));
        let src = bundle.folder("src").expect("src folder");
        assert_eq!(src.path, None);
        assert_eq!(src.files, vec![FileEntry::new("index", "ts", "export default 1")]);
    }

    #[test]
    fn nested_directories_carry_their_relative_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        write(temp_dir.path(), "src/lib/util/strings.ts", "export {}");

        let bundle = PackageBundle::from_path(temp_dir.path(), &TypeTable::default()).unwrap();

        assert_eq!(bundle.folder("src").and_then(|f| f.path.clone()), None);
        assert_eq!(
            bundle.folder("lib").and_then(|f| f.path.clone()),
            Some("src/lib".to_string())
        );
        let util = bundle.folder("util").expect("util folder");
        assert_eq!(util.path.as_deref(), Some("src/lib/util"));
        assert_eq!(util.files[0].name, "strings");
    }

    #[test]
    fn empty_directories_become_empty_folders() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("assets")).unwrap();

        let bundle = PackageBundle::from_path(temp_dir.path(), &TypeTable::default()).unwrap();

        assert_eq!(bundle.folder("assets").map(|f| f.files.len()), Some(0));
    }

    #[test]
    fn entries_are_discovered_in_file_name_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        write(temp_dir.path(), "b.js", "");
        write(temp_dir.path(), "a.js", "");
        write(temp_dir.path(), "c.js", "");

        let bundle = PackageBundle::from_path(temp_dir.path(), &TypeTable::default()).unwrap();

        let names = bundle.files().map(|f| f.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn multi_dot_and_unknown_extensions_are_split_at_the_last_dot() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        write(temp_dir.path(), "index.d.ts", "declare const x: number");
        write(temp_dir.path(), "notes.md", "# notes");

        let bundle = PackageBundle::from_path(temp_dir.path(), &TypeTable::default()).unwrap();

        assert_eq!(bundle.file("index.d").map(|f| f.kind.as_str()), Some("ts"));
        assert_eq!(bundle.file("notes").map(|f| f.kind.as_str()), Some("md"));
    }

    #[test]
    fn missing_root_is_rejected() {
        let result = PackageBundle::from_path("/this/path/does/not/exist", &TypeTable::default());

        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }

    #[test]
    fn non_utf8_content_is_a_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("blob.js"), [0xff, 0xfe, 0xfd]).unwrap();

        let result = PackageBundle::from_path(temp_dir.path(), &TypeTable::default());

        assert!(matches!(result, Err(ScanError::ReadError { .. })));
    }
}
