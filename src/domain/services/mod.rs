//! Domain Services
//!
//! Packaging logic that operates on entries and artifact graphs.
//! Only the namer and classifier read files, and they do so through the
//! `FileSystem` port.

mod classifier;
mod dependency_collector;
mod isolation;
mod namer;

pub use classifier::{Classification, EntryClassifier, DEFAULT_DEPS_MARKER};
pub use dependency_collector::{collect_all, collect_dependencies, DependencyCollector};
pub use isolation::{isolate_graph, wrap_in_closure};
pub use namer::output_key_for;
