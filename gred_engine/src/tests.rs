//! Cross-module kernel tests: the estimator must never overshoot the true
//! cost of any completion, or the search stops being exact.

use gred_common::{pad_isolated, Mapping, PossibleMappings, SchemaGraph, Vertex, VertexId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assignment::FORBIDDEN;
use crate::editorial::editorial_cost_for_mapping;
use crate::estimator::{IsolatedCostCache, LowerBoundEstimator};

/// Minimum editorial cost over all total bijections extending `partial`
/// (ignoring the oracle; infeasible pairs are the estimator's concern).
fn cheapest_completion(
    partial: &Mapping,
    source: &SchemaGraph,
    target: &SchemaGraph,
) -> Option<usize> {
    fn recurse(
        mapping: &Mapping,
        remaining_sources: &[VertexId],
        free_targets: &[VertexId],
        source: &SchemaGraph,
        target: &SchemaGraph,
        best: &mut Option<usize>,
    ) {
        let Some((&v, rest)) = remaining_sources.split_first() else {
            let cost = editorial_cost_for_mapping(mapping, source, target, &mut Vec::new());
            *best = Some(best.map_or(cost, |b: usize| b.min(cost)));
            return;
        };
        for &u in free_targets {
            let next = mapping.extend(v, u);
            let still_free: Vec<VertexId> =
                free_targets.iter().copied().filter(|&t| t != u).collect();
            recurse(&next, rest, &still_free, source, target, best);
        }
    }

    let remaining: Vec<VertexId> = source
        .vertex_ids()
        .filter(|&v| !partial.contains_source(v))
        .collect();
    let free: Vec<VertexId> = target
        .vertex_ids()
        .filter(|&u| !partial.contains_target(u))
        .collect();
    let mut best = None;
    recurse(partial, &remaining, &free, source, target, &mut best);
    best
}

fn padded_random_pair(seed: u64) -> (SchemaGraph, SchemaGraph) {
    const KINDS: [&str; 2] = ["Object", "Field"];
    const LABELS: [Option<&str>; 2] = [None, Some("uses")];

    let mut rng = StdRng::seed_from_u64(seed);
    let build = |rng: &mut StdRng| {
        let n = rng.gen_range(1..=3);
        let mut graph = SchemaGraph::new();
        for i in 0..n {
            let mut vertex = Vertex::new(format!("v{i}"), KINDS[rng.gen_range(0..KINDS.len())]);
            if rng.gen_bool(0.5) {
                vertex = vertex.with_property("p", rng.gen_range(0..2).to_string());
            }
            graph.add_vertex(vertex);
        }
        for from in 0..n {
            for to in 0..n {
                if rng.gen_bool(0.3) {
                    graph.add_edge(
                        VertexId::new(from),
                        VertexId::new(to),
                        LABELS[rng.gen_range(0..LABELS.len())],
                    );
                }
            }
        }
        graph
    };
    let mut source = build(&mut rng);
    let mut target = build(&mut rng);
    pad_isolated(&mut source, &mut target, 1);
    (source, target)
}

#[test]
fn lower_bound_is_admissible_for_first_extensions() {
    for seed in 0..20 {
        let (source, target) = padded_random_pair(seed);
        let possible = PossibleMappings::unrestricted();
        let estimator = LowerBoundEstimator::new(&source, &target, &possible);
        let empty = Mapping::new();

        let mut cache = IsolatedCostCache::default();
        for v in source.vertex_ids() {
            for u in target.vertex_ids() {
                let bound = estimator.mapping_cost(v, u, &empty, &mut cache);
                let partial = empty.extend(v, u);
                let truth = cheapest_completion(&partial, &source, &target)
                    .expect("padded graphs always complete");
                assert!(
                    bound <= truth as f64,
                    "seed {seed}: bound {bound} for {v} -> {u} exceeds cheapest completion {truth}"
                );
            }
        }
    }
}

#[test]
fn lower_bound_is_admissible_beyond_a_partial_mapping() {
    for seed in 20..35 {
        let (source, target) = padded_random_pair(seed);
        let possible = PossibleMappings::unrestricted();
        let estimator = LowerBoundEstimator::new(&source, &target, &possible);

        // anchor the first source vertex to the first target vertex
        let partial = Mapping::new().extend(VertexId::new(0), VertexId::new(0));
        let anchored_cost =
            editorial_cost_for_mapping(&partial, &source, &target, &mut Vec::new());

        let mut cache = IsolatedCostCache::default();
        for v in source.vertex_ids().filter(|&v| !partial.contains_source(v)) {
            for u in target.vertex_ids().filter(|&u| !partial.contains_target(u)) {
                let bound = estimator.mapping_cost(v, u, &partial, &mut cache);
                if bound >= FORBIDDEN {
                    continue;
                }
                let extended = partial.extend(v, u);
                let truth = cheapest_completion(&extended, &source, &target)
                    .expect("padded graphs always complete");
                assert!(
                    anchored_cost as f64 + bound <= truth as f64,
                    "seed {seed}: {anchored_cost} + {bound} for {v} -> {u} exceeds {truth}"
                );
            }
        }
    }
}
