//! In-memory representation of a package bundle.
//!
//! A bundle is two flat, insertion-ordered mappings: root level files and
//! folders. Folder nesting is never stored as pointers; a nested folder only
//! carries its relative `path`, and its parent is found by looking up the
//! second-to-last path segment by name.

mod bundle;
mod entry;

pub use bundle::PackageBundle;
pub use entry::{FileEntry, FolderEntry};
