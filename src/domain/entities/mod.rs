//! Domain Entities
//!
//! - `Entry` - a requested source file with its key and kind
//! - `Artifact` / `ArtifactGraph` - one bundler pass worth of output
//! - `PathRemapping` - entry path to emitted files, the build's only product

mod artifact;
mod entry;
mod remapping;

pub use artifact::{Artifact, ArtifactGraph, ArtifactKind};
pub use entry::Entry;
pub use remapping::{PathRemapping, RemappingBuilder};
