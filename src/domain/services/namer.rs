//! Content hash namer

use std::path::Path;

use crate::domain::ports::FileSystem;
use crate::domain::value_objects::OutputKey;
use crate::error::{PackError, PackResult};

/// Compute the output key of the file at `path` from its own bytes.
///
/// An unreadable file is a configuration error and aborts the run.
pub fn output_key_for<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> PackResult<OutputKey> {
    let content = fs.read(path).map_err(|source| PackError::UnreadableEntry {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(OutputKey::compute(path, &content))
}
