//! Reading and writing whole artifacts on disk.

mod artifact;

pub use artifact::{ArtifactError, ArtifactFormat};
