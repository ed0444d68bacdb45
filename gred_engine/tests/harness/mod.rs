//! Shared helpers for the engine integration tests.
#![allow(dead_code)]

use std::sync::Once;

use gred_common::{
    EditOperation, Mapping, OptimalEdit, PossibleMappings, SchemaGraph, Vertex, VertexId,
};
use gred_engine::editorial_cost_for_mapping;
use rand::rngs::StdRng;
use rand::Rng;

static INIT_LOGGER: Once = Once::new();

/// Initializes a capture-friendly subscriber once; repeated calls are no-ops.
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing_subscriber::filter::LevelFilter::INFO)
            .with_test_writer()
            .try_init();
    });
}

/// Minimum editorial cost over all oracle-respecting total bijections.
pub fn brute_force_ged(
    source: &SchemaGraph,
    target: &SchemaGraph,
    possible: &PossibleMappings,
) -> usize {
    assert_eq!(source.size(), target.size(), "graphs must be padded");
    let sources: Vec<VertexId> = source.vertex_ids().collect();
    let mut targets: Vec<VertexId> = target.vertex_ids().collect();
    let mut best = usize::MAX;
    permute(source, target, possible, &sources, &mut targets, 0, &mut best);
    best
}

#[allow(clippy::too_many_arguments)]
fn permute(
    source: &SchemaGraph,
    target: &SchemaGraph,
    possible: &PossibleMappings,
    sources: &[VertexId],
    targets: &mut Vec<VertexId>,
    level: usize,
    best: &mut usize,
) {
    if level == sources.len() {
        let mut mapping = Mapping::new();
        for (i, &s) in sources.iter().enumerate() {
            mapping.add(s, targets[i]);
        }
        let cost = editorial_cost_for_mapping(&mapping, source, target, &mut Vec::new());
        *best = (*best).min(cost);
        return;
    }
    for i in level..targets.len() {
        targets.swap(level, i);
        if possible.mapping_possible(sources[level], targets[level]) {
            permute(source, target, possible, sources, targets, level + 1, best);
        }
        targets.swap(level, i);
    }
}

/// Checks that the edit list is exactly the set of changes the mapping
/// implies: one operation per differing vertex pair and per differing edge,
/// and `edits.len() == ged`. Replaying these operations on the source graph
/// yields the target graph.
pub fn assert_edit_list_consistent(
    optimal: &OptimalEdit,
    source: &SchemaGraph,
    target: &SchemaGraph,
) {
    assert_eq!(optimal.edits.len(), optimal.ged, "one operation per edit");
    let mapping = &optimal.mapping;
    assert_eq!(mapping.size(), source.size(), "mapping must be total");

    for level in 0..mapping.size() {
        let v = mapping.source_at(level);
        let u = mapping.target_at(level);
        if source.vertex(v).same_label(target.vertex(u)) {
            assert!(
                !optimal.edits.iter().any(|op| touches_pair(op, v, u)),
                "unchanged pair {v} -> {u} must not be edited"
            );
        } else if source.vertex(v).is_isolated() {
            assert!(
                optimal.edits.iter().any(|op| matches!(
                    op,
                    EditOperation::InsertVertex { target, .. } if *target == u
                )),
                "missing vertex insertion for {u}"
            );
        } else if target.vertex(u).is_isolated() {
            assert!(
                optimal.edits.iter().any(|op| matches!(
                    op,
                    EditOperation::DeleteVertex { source, .. } if *source == v
                )),
                "missing vertex deletion for {v}"
            );
        } else {
            assert!(
                optimal.edits.iter().any(|op| matches!(
                    op,
                    EditOperation::ChangeVertex { source, target, .. }
                        if *source == v && *target == u
                )),
                "missing vertex relabel for {v} -> {u}"
            );
        }
    }

    for edge in source.edges() {
        let (Some(target_from), Some(target_to)) = (
            mapping.target_of(edge.from()),
            mapping.target_of(edge.to()),
        ) else {
            unreachable!("mapping is total");
        };
        match target.edge_between(target_from, target_to) {
            None => assert!(
                optimal.edits.iter().any(|op| matches!(
                    op,
                    EditOperation::DeleteEdge { source_from, source_to, .. }
                        if *source_from == edge.from() && *source_to == edge.to()
                )),
                "missing edge deletion for {} -> {}",
                edge.from(),
                edge.to()
            ),
            Some(target_edge) if target_edge.label() != edge.label() => assert!(
                optimal.edits.iter().any(|op| matches!(
                    op,
                    EditOperation::ChangeEdge { source_from, source_to, .. }
                        if *source_from == edge.from() && *source_to == edge.to()
                )),
                "missing edge relabel for {} -> {}",
                edge.from(),
                edge.to()
            ),
            Some(_) => {}
        }
    }

    for edge in target.edges() {
        let (Some(source_from), Some(source_to)) = (
            mapping.source_of(edge.from()),
            mapping.source_of(edge.to()),
        ) else {
            unreachable!("mapping is total");
        };
        if source.edge_between(source_from, source_to).is_none() {
            assert!(
                optimal.edits.iter().any(|op| matches!(
                    op,
                    EditOperation::InsertEdge { target_from, target_to, .. }
                        if *target_from == edge.from() && *target_to == edge.to()
                )),
                "missing edge insertion for {} -> {}",
                edge.from(),
                edge.to()
            );
        }
    }
}

fn touches_pair(op: &EditOperation, v: VertexId, u: VertexId) -> bool {
    matches!(
        op,
        EditOperation::InsertVertex { target, .. } if *target == u
    ) || matches!(
        op,
        EditOperation::DeleteVertex { source, .. } if *source == v
    ) || matches!(
        op,
        EditOperation::ChangeVertex { source, target, .. } if *source == v && *target == u
    )
}

/// A small random graph with kinds and edge labels drawn from fixed pools.
pub fn random_graph(rng: &mut StdRng, vertex_count: usize) -> SchemaGraph {
    const KINDS: [&str; 3] = ["Object", "Field", "Scalar"];
    const LABELS: [Option<&str>; 3] = [None, Some("uses"), Some("owns")];

    let mut graph = SchemaGraph::new();
    for i in 0..vertex_count {
        let kind = KINDS[rng.gen_range(0..KINDS.len())];
        let mut vertex = Vertex::new(format!("v{i}"), kind);
        if rng.gen_bool(0.5) {
            vertex = vertex.with_property("p", rng.gen_range(0..3).to_string());
        }
        graph.add_vertex(vertex);
    }
    for from in 0..vertex_count {
        for to in 0..vertex_count {
            if rng.gen_bool(0.3) {
                let label = LABELS[rng.gen_range(0..LABELS.len())];
                graph.add_edge(VertexId::new(from), VertexId::new(to), label);
            }
        }
    }
    graph
}
