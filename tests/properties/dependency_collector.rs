//! Property tests for chunk dependency collection.

use std::collections::HashSet;

use proptest::prelude::*;

use scriptpack::domain::entities::{Artifact, ArtifactGraph, ArtifactKind};
use scriptpack::domain::services::collect_dependencies;

/// Edge lists over `n` chunks; cycles and self-imports allowed
fn import_edges() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..10).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(0..n, 0..5), n)
    })
}

fn file(i: usize) -> String {
    format!("chunks/c{}-AAAAAAAA.js", i)
}

fn build_graph(edges: &[Vec<usize>]) -> ArtifactGraph {
    edges
        .iter()
        .enumerate()
        .map(|(i, imports)| {
            let kind = if i == 0 {
                ArtifactKind::EntryChunk
            } else {
                ArtifactKind::SharedChunk
            };
            Artifact::chunk(file(i), kind, "")
                .with_imports(imports.iter().map(|&j| file(j)).collect())
        })
        .collect()
}

/// Files reachable from chunk 0 by at least one import edge
fn reachable(edges: &[Vec<usize>]) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut stack: Vec<usize> = edges[0].clone();
    while let Some(i) = stack.pop() {
        if seen.insert(file(i)) {
            stack.extend(edges[i].iter().copied());
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Collection terminates, never lists a file twice, never lists
    /// the artifact itself, and lists exactly what is reachable.
    #[test]
    fn property_dependencies_are_reachable_set_without_repeats(edges in import_edges()) {
        let graph = build_graph(&edges);
        let root = graph.get(&file(0)).unwrap();

        let deps = collect_dependencies(&graph, root).unwrap();

        let unique: HashSet<&String> = deps.iter().collect();
        prop_assert_eq!(unique.len(), deps.len());
        prop_assert!(!deps.contains(&file(0)));

        let mut expected = reachable(&edges);
        expected.remove(&file(0));
        let actual: HashSet<String> = deps.into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    /// PROPERTY: Direct imports come first, in declared order.
    #[test]
    fn property_direct_imports_lead(edges in import_edges()) {
        let graph = build_graph(&edges);
        let root = graph.get(&file(0)).unwrap();
        let deps = collect_dependencies(&graph, root).unwrap();

        let mut seen = HashSet::new();
        let direct: Vec<String> = edges[0]
            .iter()
            .filter(|&&j| j != 0)
            .map(|&j| file(j))
            .filter(|f| seen.insert(f.clone()))
            .collect();

        prop_assert_eq!(&deps[..direct.len()], &direct[..]);
    }
}
