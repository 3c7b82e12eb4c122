//! Converting between a [`PackageBundle`](crate::bundle::PackageBundle) and a
//! real directory tree.

mod extract;
mod scan;

pub use extract::{ExtractError, ExtractReport, SkippedFile};
pub use scan::ScanError;
