//! Domain Layer
//!
//! The packaging core: pure logic over entries and artifact graphs.
//!
//! ## Structure
//!
//! - `value_objects/` - Output keys and entry kinds
//! - `entities/` - Entries, artifacts, artifact graphs, the remapping table
//! - `services/` - Namer, classifier, dependency collector, isolation wrapper
//! - `ports/` - Interfaces for the bundler and the file system
//!
//! Nothing in here writes to disk. Reading entry contents goes through the
//! `FileSystem` port so the services stay testable with in-memory files.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
