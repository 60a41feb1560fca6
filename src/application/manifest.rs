//! Manifest content-script helpers
//!
//! The manifest is handled as plain JSON; only `content_scripts[].js` and
//! `content_scripts[].css` are read or touched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::entities::PathRemapping;
use crate::error::{PackError, PackResult};

const SCRIPT_KEYS: [&str; 2] = ["js", "css"];

fn content_scripts(manifest: &Value) -> PackResult<&[Value]> {
    match manifest.get("content_scripts") {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(PackError::Manifest {
            message: "'content_scripts' must be an array".to_string(),
        }),
    }
}

fn path_list<'a>(entry: &'a Value, key: &str) -> PackResult<Vec<&'a str>> {
    match entry.get(key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| PackError::Manifest {
                    message: format!("content_scripts[].{} must contain only strings", key),
                })
            })
            .collect(),
        Some(_) => Err(PackError::Manifest {
            message: format!("content_scripts[].{} must be an array", key),
        }),
    }
}

/// Every script and stylesheet the manifest injects, first-seen order
pub fn collect_content_scripts(manifest: &Value) -> PackResult<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for entry in content_scripts(manifest)? {
        for key in SCRIPT_KEYS {
            for path in path_list(entry, key)? {
                if seen.insert(path) {
                    paths.push(PathBuf::from(path));
                }
            }
        }
    }

    Ok(paths)
}

/// Replace every `js`/`css` list with the remapped output files.
///
/// Each listed source expands to its remapped files, prefixed with
/// `prefix`. Sources missing from the table are dropped.
pub fn rewrite_content_scripts(
    manifest: &mut Value,
    table: &PathRemapping,
    prefix: &str,
) -> PackResult<()> {
    content_scripts(manifest)?;
    let Some(Value::Array(entries)) = manifest.get_mut("content_scripts") else {
        return Ok(());
    };

    for entry in entries.iter_mut() {
        for key in SCRIPT_KEYS {
            let sources: Vec<String> = path_list(entry, key)?
                .into_iter()
                .map(str::to_string)
                .collect();
            if entry.get(key).is_none() {
                continue;
            }

            let rewritten: Vec<Value> = sources
                .iter()
                .flat_map(|source| table.resolve(Path::new(source)))
                .map(|file| Value::String(deployment_path(prefix, file)))
                .collect();

            if let Some(slot) = entry.get_mut(key) {
                *slot = Value::Array(rewritten);
            }
        }
    }

    Ok(())
}

/// `prefix/file` with `/` separators and no leading `./`
fn deployment_path(prefix: &str, file: &str) -> String {
    let prefix = prefix.replace('\\', "/");
    let prefix = prefix.trim_start_matches("./").trim_matches('/');
    let file = file.replace('\\', "/");
    if prefix.is_empty() {
        file
    } else {
        format!("{}/{}", prefix, file)
    }
}
