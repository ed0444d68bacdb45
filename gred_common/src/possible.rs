//! The possible-mappings oracle restricting which vertex pairs may map.

use std::collections::HashSet;

use crate::graph::SchemaGraph;
use crate::vertex::VertexId;

/// Decides which source vertex may map to which target vertex.
///
/// Infeasible pairs are not errors; the estimator prices them as forbidden
/// and the search prunes them naturally.
#[derive(Clone, Debug)]
pub struct PossibleMappings {
    /// Allowed targets per source vertex; `None` means unrestricted.
    allowed: Option<Vec<HashSet<VertexId>>>,
}

impl PossibleMappings {
    /// Every pair is allowed.
    pub fn unrestricted() -> Self {
        PossibleMappings { allowed: None }
    }

    /// Pairs must share a kind, unless at least one side is ISOLATED.
    ///
    /// Isolated pairings model pure insertions and deletions; two isolated
    /// vertices may also pair with each other so unused slack is free.
    pub fn by_kind(source: &SchemaGraph, target: &SchemaGraph) -> Self {
        let mut allowed = Vec::with_capacity(source.size());
        for (_, v) in source.vertices() {
            let mut targets = HashSet::new();
            for (u_id, u) in target.vertices() {
                if v.is_isolated() || u.is_isolated() || v.kind() == u.kind() {
                    targets.insert(u_id);
                }
            }
            allowed.push(targets);
        }
        PossibleMappings {
            allowed: Some(allowed),
        }
    }

    /// Explicit per-source restrictions.
    pub fn from_allowed(allowed: Vec<HashSet<VertexId>>) -> Self {
        PossibleMappings {
            allowed: Some(allowed),
        }
    }

    pub fn mapping_possible(&self, source: VertexId, target: VertexId) -> bool {
        match &self.allowed {
            None => true,
            Some(allowed) => allowed[source.index()].contains(&target),
        }
    }
}
