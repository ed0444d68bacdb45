//! Admissible lower bound for extending a partial mapping by one pair.
//!
//! For a candidate pair `(v, u)` the estimate never exceeds the true cost
//! of any completion that maps `v` to `u`, which makes the A* search exact.
//! The formula follows the anchor-aware bound of Chang et al. adapted to
//! directed graphs: no halving factor, and anchored edges are compared in
//! both directions.

use std::collections::{HashMap, HashSet};

use gred_common::{Mapping, PossibleMappings, SchemaGraph, VertexId};

use crate::assignment::FORBIDDEN;

/// Cache for the isolated shortcut, scoped to a single parent expansion.
///
/// The isolated estimate depends only on the non-isolated vertex and the
/// partial mapping, so within one expansion it is computed once per vertex
/// and per side. Source and target vertices are kept apart because their
/// ids live in different graphs.
#[derive(Debug, Default)]
pub(crate) struct IsolatedCostCache {
    source_side: HashMap<VertexId, f64>,
    target_side: HashMap<VertexId, f64>,
}

pub(crate) struct LowerBoundEstimator<'g> {
    source: &'g SchemaGraph,
    target: &'g SchemaGraph,
    possible: &'g PossibleMappings,
}

impl<'g> LowerBoundEstimator<'g> {
    pub(crate) fn new(
        source: &'g SchemaGraph,
        target: &'g SchemaGraph,
        possible: &'g PossibleMappings,
    ) -> Self {
        LowerBoundEstimator {
            source,
            target,
            possible,
        }
    }

    /// Lower bound on the additional cost of any completion of
    /// `partial ∪ {v → u}`.
    pub(crate) fn mapping_cost(
        &self,
        v: VertexId,
        u: VertexId,
        partial: &Mapping,
        cache: &mut IsolatedCostCache,
    ) -> f64 {
        if !self.possible.mapping_possible(v, u) {
            return FORBIDDEN;
        }
        let source_vertex = self.source.vertex(v);
        let target_vertex = self.target.vertex(u);

        // slack-to-slack pairs are free; pricing them at the isolated
        // estimate would overshoot the true cost and break admissibility
        if source_vertex.is_isolated() && target_vertex.is_isolated() {
            return 0.0;
        }
        if target_vertex.is_isolated() {
            if let Some(&cached) = cache.source_side.get(&v) {
                return cached;
            }
            let cost = self.isolated_cost(v, true, partial);
            cache.source_side.insert(v, cost);
            return cost;
        }
        if source_vertex.is_isolated() {
            if let Some(&cached) = cache.target_side.get(&u) {
                return cached;
            }
            let cost = self.isolated_cost(u, false, partial);
            cache.target_side.insert(u, cost);
            return cost;
        }

        let equal_labels = source_vertex.same_label(target_vertex);

        // multisets of labels over inner out-edges (the far endpoint is not
        // yet mapped); v and u themselves are unmapped by definition
        let mut labels_v: HashMap<Option<&str>, usize> = HashMap::new();
        for edge in self.source.adjacent(v) {
            if !partial.contains_source(edge.to()) {
                *labels_v.entry(edge.label()).or_insert(0) += 1;
            }
        }
        let mut labels_u: HashMap<Option<&str>, usize> = HashMap::new();
        for edge in self.target.adjacent(u) {
            if !partial.contains_target(edge.to()) {
                *labels_u.entry(edge.label()).or_insert(0) += 1;
            }
        }

        let size_v: usize = labels_v.values().sum();
        let size_u: usize = labels_u.values().sum();
        let intersection: usize = labels_v
            .iter()
            .map(|(label, &count)| count.min(labels_u.get(label).copied().unwrap_or(0)))
            .sum();
        let multiset_edit_distance = size_v.max(size_u) - intersection;

        let anchored_cost = self.anchored_vertices_cost(v, u, partial);

        (usize::from(!equal_labels) + multiset_edit_distance + anchored_cost) as f64
    }

    /// Edges between `v`/`u` and already-anchored vertices are forced: the
    /// anchored endpoint's image is pinned, so a missing or relabeled
    /// counterpart certainly costs one edit. Out- and in-edges are matched
    /// independently.
    fn anchored_vertices_cost(&self, v: VertexId, u: VertexId, partial: &Mapping) -> usize {
        let mut cost = 0;

        // destinations of u's out-edges matched against v's anchored out-edges
        let mut matched_out: HashSet<VertexId> = HashSet::new();
        for edge_v in self.source.adjacent(v) {
            let Some(image) = partial.target_of(edge_v.to()) else {
                continue;
            };
            match self.target.edge_between(u, image) {
                Some(edge_u) => {
                    matched_out.insert(image);
                    if edge_v.label() != edge_u.label() {
                        cost += 1;
                    }
                }
                None => cost += 1,
            }
        }

        let mut matched_in: HashSet<VertexId> = HashSet::new();
        for edge_v in self.source.adjacent_inverse(v) {
            let Some(image) = partial.target_of(edge_v.from()) else {
                continue;
            };
            match self.target.edge_between(image, u) {
                Some(edge_u) => {
                    matched_in.insert(image);
                    if edge_v.label() != edge_u.label() {
                        cost += 1;
                    }
                }
                None => cost += 1,
            }
        }

        // anchored edges of u with no matched counterpart at v
        for edge_u in self.target.adjacent(u) {
            if partial.contains_target(edge_u.to()) && !matched_out.contains(&edge_u.to()) {
                cost += 1;
            }
        }
        for edge_u in self.target.adjacent_inverse(u) {
            if partial.contains_target(edge_u.from()) && !matched_in.contains(&edge_u.from()) {
                cost += 1;
            }
        }

        cost
    }

    /// Simplified bound when one side of the pair is a slack vertex: one
    /// edit for the vertex itself, one per inner edge, and one per labeled
    /// edge to an anchored vertex.
    fn isolated_cost(&self, vertex: VertexId, from_source: bool, partial: &Mapping) -> f64 {
        let graph = if from_source { self.source } else { self.target };
        let is_anchored = |id: VertexId| {
            if from_source {
                partial.contains_source(id)
            } else {
                partial.contains_target(id)
            }
        };

        let mut inner_edges = 0;
        let mut labeled_anchored_edges = 0;
        for edge in graph.adjacent(vertex) {
            if !is_anchored(edge.to()) {
                inner_edges += 1;
            } else if edge.label().is_some() {
                labeled_anchored_edges += 1;
            }
        }
        for edge in graph.adjacent_inverse(vertex) {
            if is_anchored(edge.from()) && edge.label().is_some() {
                labeled_anchored_edges += 1;
            }
        }

        (1 + inner_edges + labeled_anchored_edges) as f64
    }
}
