//! Domain Value Objects
//!
//! Immutable value types shared by the packaging services.

mod entry_kind;
mod output_key;

pub use entry_kind::{AssetKind, EntryKind, OutputExtension};
pub use output_key::{hash8, OutputKey};
