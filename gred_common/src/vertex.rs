//! Vertex definitions for schema graphs.

use std::collections::BTreeMap;
use std::fmt::{self, Formatter};

use serde::{Deserialize, Serialize};

/// Kind tag of the slack vertices used to pad graphs to equal size.
///
/// A pair containing an isolated vertex represents a pure insertion or
/// deletion rather than a relabeling.
pub const ISOLATED: &str = "__isolated__";

/// A lightweight index for vertices within a [`SchemaGraph`](crate::SchemaGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId {
    idx: usize,
}

impl VertexId {
    pub fn new(idx: usize) -> Self {
        VertexId { idx }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.idx
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.idx)
    }
}

/// A vertex: a kind tag plus an unordered set of string properties.
///
/// Two vertices carry the same label when both the kind and the property
/// set are equal; a label mismatch between mapped vertices costs one edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    name: String,
    kind: String,
    properties: BTreeMap<String, String>,
}

impl Vertex {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Vertex {
            name: name.into(),
            kind: kind.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Creates a slack vertex of the distinguished [`ISOLATED`] kind.
    pub fn isolated(name: impl Into<String>) -> Self {
        Vertex::new(name, ISOLATED)
    }

    /// Builder-style property attachment.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn is_of_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn is_isolated(&self) -> bool {
        self.kind == ISOLATED
    }

    /// True when kind and properties are equal; names are identity, not label.
    pub fn same_label(&self, other: &Vertex) -> bool {
        self.kind == other.kind && self.properties == other.properties
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.kind)
    }
}
