//! Pack Use Case
//!
//! Orchestrates one packaging run:
//! - Classifying entries and computing output keys
//! - Running the script and asset bundler passes
//! - Isolating every code artifact
//! - Collecting shared-chunk dependencies into the remapping table
//! - Writing the output once both passes succeeded

mod options;
mod result;
mod use_case;

pub use options::PackOptions;
pub use result::PackOutcome;
pub use use_case::PackUseCase;
