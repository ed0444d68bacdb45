//! Partial bijections between source and target vertices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vertex::VertexId;

/// A growing partial bijection from source to target vertices.
///
/// The search commits one pair per level, so a mapping is always a prefix
/// of some total bijection. Pairs carried over from a start mapping form
/// the *fixed* prefix; pairs added during the search are *non-fixed*.
///
/// Extension has value semantics: [`Mapping::extend`] and
/// [`Mapping::remove_last_element`] return new mappings and never mutate
/// state visible to other holders of the original.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "MappingData", into = "MappingData")]
pub struct Mapping {
    pairs: Vec<(VertexId, VertexId)>,
    source_to_target: HashMap<VertexId, VertexId>,
    target_to_source: HashMap<VertexId, VertexId>,
    fixed: usize,
}

/// Serialized form of a [`Mapping`]: the committed pairs and the fixed
/// prefix length. The two lookup maps are redundant and rebuilt on
/// deserialization.
#[derive(Clone, Serialize, Deserialize)]
struct MappingData {
    pairs: Vec<(VertexId, VertexId)>,
    fixed: usize,
}

impl From<MappingData> for Mapping {
    fn from(data: MappingData) -> Self {
        let mut mapping = Mapping::new();
        for &(source, target) in &data.pairs {
            mapping.add(source, target);
        }
        mapping.fixed = data.fixed;
        mapping
    }
}

impl From<Mapping> for MappingData {
    fn from(mapping: Mapping) -> Self {
        MappingData {
            pairs: mapping.pairs,
            fixed: mapping.fixed,
        }
    }
}

impl Mapping {
    #[contracts::debug_ensures(ret.size() == 0)]
    pub fn new() -> Self {
        Mapping::default()
    }

    /// Builds a start mapping; every given pair belongs to the fixed prefix.
    pub fn from_fixed_pairs(pairs: &[(VertexId, VertexId)]) -> Self {
        let mut mapping = Mapping::new();
        for &(source, target) in pairs {
            mapping.add(source, target);
        }
        mapping.fixed = mapping.pairs.len();
        mapping
    }

    #[contracts::debug_requires(self.source_to_target.len() == self.target_to_source.len())]
    pub fn size(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains_source(&self, source: VertexId) -> bool {
        self.source_to_target.contains_key(&source)
    }

    pub fn contains_target(&self, target: VertexId) -> bool {
        self.target_to_source.contains_key(&target)
    }

    #[contracts::debug_ensures(self.debug_consistent(Some(source), ret))]
    pub fn target_of(&self, source: VertexId) -> Option<VertexId> {
        self.source_to_target.get(&source).copied()
    }

    #[contracts::debug_ensures(self.debug_consistent(ret, Some(target)))]
    pub fn source_of(&self, target: VertexId) -> Option<VertexId> {
        self.target_to_source.get(&target).copied()
    }

    pub fn source_at(&self, level: usize) -> VertexId {
        self.pairs[level].0
    }

    pub fn target_at(&self, level: usize) -> VertexId {
        self.pairs[level].1
    }

    pub fn pairs(&self) -> &[(VertexId, VertexId)] {
        &self.pairs
    }

    pub fn for_each_target(&self, mut f: impl FnMut(VertexId)) {
        for &(_, target) in &self.pairs {
            f(target);
        }
    }

    /// Visits only the targets committed after the fixed prefix.
    pub fn for_each_non_fixed_target(&self, mut f: impl FnMut(VertexId)) {
        for &(_, target) in &self.pairs[self.fixed..] {
            f(target);
        }
    }

    /// Grows the mapping in place. Used when completing a partial mapping
    /// into a total one; the search proper goes through [`Mapping::extend`].
    #[contracts::debug_requires(!self.contains_source(source), "source mapped twice")]
    #[contracts::debug_requires(!self.contains_target(target), "target mapped twice")]
    #[contracts::debug_ensures(self.source_to_target.len() == self.target_to_source.len())]
    pub fn add(&mut self, source: VertexId, target: VertexId) {
        self.pairs.push((source, target));
        self.source_to_target.insert(source, target);
        self.target_to_source.insert(target, source);
    }

    /// Returns a new mapping with one extra pair; `self` is unchanged.
    #[contracts::debug_ensures(ret.size() == self.size() + 1)]
    pub fn extend(&self, source: VertexId, target: VertexId) -> Mapping {
        let mut next = self.clone();
        next.add(source, target);
        next
    }

    /// Returns the parent prefix of this mapping.
    #[contracts::debug_requires(self.size() > self.fixed, "cannot drop a fixed pair")]
    #[contracts::debug_ensures(ret.size() + 1 == self.size())]
    pub fn remove_last_element(&self) -> Mapping {
        let mut parent = self.clone();
        let (source, target) = parent.pairs.pop().unwrap();
        parent.source_to_target.remove(&source);
        parent.target_to_source.remove(&target);
        parent
    }

    fn debug_consistent(&self, source: Option<VertexId>, target: Option<VertexId>) -> bool {
        match (source, target) {
            (Some(s), Some(t)) => {
                self.source_to_target.get(&s) == Some(&t)
                    && self.target_to_source.get(&t) == Some(&s)
            }
            (Some(s), None) => !self.source_to_target.contains_key(&s),
            (None, Some(t)) => !self.target_to_source.contains_key(&t),
            (None, None) => true,
        }
    }
}
