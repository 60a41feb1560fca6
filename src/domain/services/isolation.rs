//! Isolation wrapper
//!
//! Encloses every emitted code artifact in an immediately-invoked closure so
//! helpers the bundler hoists to the top level stay private to their file.
//! Pure text transform: it knows nothing about the code inside.

use crate::domain::entities::ArtifactGraph;

/// Wrap `code` in `(() => { ... })();`
pub fn wrap_in_closure(code: &str) -> String {
    format!("(() => {{\n{}}})();", code)
}

/// Wrap every code artifact in the graph; assets are left untouched.
/// Returns the number of artifacts wrapped.
pub fn isolate_graph(graph: &mut ArtifactGraph) -> usize {
    let mut wrapped = 0;
    for artifact in graph.iter_mut() {
        let Some(code) = artifact.code() else {
            continue;
        };
        let isolated = wrap_in_closure(code);
        artifact.set_code(isolated);
        wrapped += 1;
    }
    wrapped
}
