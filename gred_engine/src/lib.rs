//! Exact graph edit distance between directed labeled graphs.
//!
//! This crate computes a minimum-cost total vertex mapping between a source
//! and a target graph, the integer edit distance, and the concrete list of
//! edit operations realizing it. The search is an exact best-first
//! branch-and-bound guided by an admissible Hungarian-assignment bound.

mod assignment;
mod editorial;
mod estimator;
mod search;
#[cfg(test)]
mod tests;

pub use crate::assignment::{Assignment, FORBIDDEN};
pub use crate::editorial::editorial_cost_for_mapping;
pub use crate::search::DiffSearch;

use gred_common::{
    pad_isolated, CancellationHandle, DiffConfig, DiffError, Mapping, OptimalEdit,
    PossibleMappings, RunningCheck, SchemaGraph, VertexId,
};

/// Entry point for diff runs.
///
/// Pads both graphs with ISOLATED slack vertices, builds the
/// possible-mappings oracle and drives the search. The returned mapping
/// refers to the padded graphs, available via
/// [`GraphDiffer::padded_graphs`].
pub struct GraphDiffer {
    source: SchemaGraph,
    target: SchemaGraph,
    config: DiffConfig,
    handle: CancellationHandle,
}

impl GraphDiffer {
    pub fn new(source: SchemaGraph, target: SchemaGraph) -> Self {
        GraphDiffer::with_config(source, target, DiffConfig::default())
    }

    pub fn with_config(source: SchemaGraph, target: SchemaGraph, config: DiffConfig) -> Self {
        GraphDiffer {
            source,
            target,
            config,
            handle: CancellationHandle::new(),
        }
    }

    /// Handle for requesting a stop from another thread. The search itself
    /// stays single-threaded and polls the flag between expansions.
    pub fn cancellation_handle(&self) -> CancellationHandle {
        self.handle.clone()
    }

    /// Both graphs after ISOLATED padding, for interpreting result ids.
    pub fn padded_graphs(&self) -> (SchemaGraph, SchemaGraph) {
        self.padded()
    }

    /// Diffs under the by-kind oracle: vertices map within their kind, or
    /// to ISOLATED slack for pure insertions and deletions.
    pub fn diff(&self) -> Result<OptimalEdit, DiffError> {
        let (source, target) = self.padded();
        let possible = PossibleMappings::by_kind(&source, &target);
        self.run(&source, &target, &possible)
    }

    /// Diffs with every vertex pair allowed, so cross-kind relabelings are
    /// considered too.
    pub fn diff_unrestricted(&self) -> Result<OptimalEdit, DiffError> {
        let (source, target) = self.padded();
        let possible = PossibleMappings::unrestricted();
        self.run(&source, &target, &possible)
    }

    /// Diffs with a caller-provided oracle over the padded graphs.
    pub fn diff_with_oracle(&self, possible: &PossibleMappings) -> Result<OptimalEdit, DiffError> {
        let (source, target) = self.padded();
        self.run(&source, &target, possible)
    }

    fn padded(&self) -> (SchemaGraph, SchemaGraph) {
        let mut source = self.source.clone();
        let mut target = self.target.clone();
        pad_isolated(&mut source, &mut target, self.config.extra_isolated);
        (source, target)
    }

    fn run(
        &self,
        source: &SchemaGraph,
        target: &SchemaGraph,
        possible: &PossibleMappings,
    ) -> Result<OptimalEdit, DiffError> {
        let check = RunningCheck::with_handle(self.config.timeout, &self.handle);
        let all_sources: Vec<VertexId> = source.vertex_ids().collect();
        let all_targets: Vec<VertexId> = target.vertex_ids().collect();
        let search = DiffSearch::new(source, target, possible, &check);
        search.diff_impl(Mapping::new(), &all_sources, &all_targets)
    }
}
