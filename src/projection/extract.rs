use std::fs;
use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::bundle::{FileEntry, PackageBundle};
use crate::config::TypeTable;
use crate::ext::PathExt;

/// What an extraction wrote, and what it left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

impl ExtractReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A file whose kind has no extension in the type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Slash separated location inside the output, without extension
    pub path: String,
    pub kind: String,
}

impl PackageBundle {
    /// Writes every folder and file of the bundle below `output`.
    ///
    /// Files whose kind is unknown to `types` are not written and show up in
    /// [`ExtractReport::skipped`]. Entries written before an error stay on
    /// disk.
    pub fn extract(
        &self,
        output: impl AsRef<Path>,
        types: &TypeTable,
    ) -> Result<ExtractReport, ExtractError> {
        let output = output.as_ref();
        let mut report = ExtractReport::default();

        create_dir(output)?;

        for folder in self.folders() {
            let location = folder.location();
            ensure!(
                !location.is_empty() && Path::new(location).is_contained(),
                UnsafePathSnafu { path: location }
            );

            let directory = output.join(location);
            create_dir(&directory)?;
            for file in &folder.files {
                write_file(&directory, Some(location), file, types, &mut report)?;
            }
        }

        for file in self.files() {
            write_file(output, None, file, types, &mut report)?;
        }

        info!(
            "Extracted {} files into {}, skipped {}",
            report.written.len(),
            output.best_effort_display(),
            report.skipped.len()
        );
        Ok(report)
    }
}

fn create_dir(path: &Path) -> Result<(), ExtractError> {
    debug!("Creating directory {}", path.display());
    fs::create_dir_all(path).context(CreateDirSnafu {
        path: path.best_effort_display(),
    })
}

fn write_file(
    directory: &Path,
    location: Option<&str>,
    file: &FileEntry,
    types: &TypeTable,
    report: &mut ExtractReport,
) -> Result<(), ExtractError> {
    let relative = match location {
        Some(location) => format!("{}/{}", location, file.name),
        None => file.name.clone(),
    };
    ensure!(
        !file.name.is_empty() && !file.name.contains(['/', '\\']),
        UnsafePathSnafu { path: relative }
    );

    let Some(extension) = types.extension_for(&file.kind) else {
        warn!(
            "Skipping '{}': no extension known for type '{}'",
            relative, file.kind
        );
        report.skipped.push(SkippedFile {
            path: relative,
            kind: file.kind.clone(),
        });
        return Ok(());
    };

    let path = directory.join(format!("{}.{}", file.name, extension));
    debug!("Writing {}", path.display());
    fs::write(&path, &file.code).context(WriteSnafu {
        path: path.best_effort_display(),
    })?;
    report.written.push(path);
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum ExtractError {
    #[snafu(display("Refusing to write outside the output directory: {}", path))]
    UnsafePath { path: String },
    #[snafu(display("Failed to create directory {}", path))]
    CreateDirError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write {}", path))]
    WriteError {
        path: String,
        source: std::io::Error,
    },
}
