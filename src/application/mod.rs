//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `PackUseCase` - classify, bundle twice, isolate, collect dependencies, write
//!
//! ## Services
//!
//! - `manifest` - read and rewrite manifest content-script lists

pub mod manifest;
pub mod pack;

pub use manifest::{collect_content_scripts, rewrite_content_scripts};
pub use pack::{PackOptions, PackOutcome, PackUseCase};
