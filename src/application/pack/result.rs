//! Pack result types

use std::path::PathBuf;

use crate::domain::entities::PathRemapping;

/// Result of a packaging run
#[derive(Debug, Clone, Default)]
pub struct PackOutcome {
    /// Entry path -> [own output, ...shared chunks]
    pub remapping: PathRemapping,
    /// Files written, absolute, in write order
    pub written: Vec<PathBuf>,
    /// Entry counts per group
    pub scripts: usize,
    pub assets: usize,
    pub shared_chunks: usize,
}

impl PackOutcome {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}
