//! Pack a tree of named, typed text files into a single marker-delimited
//! artifact, and turn it back into a tree or into files on disk.
//!
//! ```no_run
//! use bundlr::{ArtifactFormat, PackageBundle, TypeTable};
//!
//! let types = TypeTable::default();
//! let bundle = PackageBundle::from_path("./plugin", &types)?;
//! bundle.bundle("plugin.bundle", ArtifactFormat::Binary, true)?;
//!
//! let restored = PackageBundle::open("plugin.bundle", ArtifactFormat::Binary)?;
//! let report = restored.extract("./plugin-copy", &types)?;
//! assert!(report.is_complete());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![allow(clippy::enum_variant_names)]
#![allow(clippy::module_inception)]

pub mod application;
pub mod artifact;
pub mod bundle;
pub mod cli;
pub mod codec;
pub mod config;
mod ext;
pub mod projection;

pub use artifact::ArtifactFormat;
pub use bundle::{FileEntry, FolderEntry, PackageBundle};
pub use codec::{Codec, CodecKind};
pub use config::TypeTable;
pub use projection::ExtractReport;
