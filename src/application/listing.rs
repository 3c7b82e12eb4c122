use std::fmt::Write;

use colored::Colorize;

use crate::bundle::{FileEntry, PackageBundle};
use crate::config::TypeTable;

/// Human readable overview of a bundle, one line per folder and file.
///
/// Files whose kind has no extension in `types` are marked, since they
/// would be skipped on extraction.
pub fn render_tree(bundle: &PackageBundle, types: &TypeTable) -> String {
    let mut out = String::new();

    for file in bundle.files() {
        render_file(&mut out, file, types, "");
    }

    for folder in bundle.folders() {
        let _ = writeln!(out, "{}", format!("{}/", folder.location()).blue().bold());
        for file in &folder.files {
            render_file(&mut out, file, types, "  ");
        }
    }

    out
}

fn render_file(out: &mut String, file: &FileEntry, types: &TypeTable, indent: &str) {
    let size = format!("({} bytes)", file.code.len()).dimmed();
    let _ = match types.extension_for(&file.kind) {
        Some(extension) => writeln!(out, "{indent}{}.{} {}", file.name, extension, size),
        None => writeln!(
            out,
            "{indent}{} {} {}",
            file.name,
            format!("[unknown type '{}']", file.kind).yellow(),
            size
        ),
    };
}
