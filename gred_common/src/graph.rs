//! Directed labeled graphs with precomputed adjacency indices.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::vertex::{Vertex, VertexId};

/// A directed edge with an optional label.
///
/// At most one edge exists per ordered vertex pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    from: VertexId,
    to: VertexId,
    label: Option<String>,
}

impl Edge {
    pub fn from(&self) -> VertexId {
        self.from
    }

    pub fn to(&self) -> VertexId {
        self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// An immutable-once-built directed labeled graph.
///
/// Vertices live in a fixed order; [`VertexId`] is the position in that
/// order. Out-edges and in-edges are indexed per vertex so adjacency
/// queries cost O(deg), and the edge for an ordered vertex pair is an
/// O(1) lookup.
#[derive(Clone, Debug, Default)]
pub struct SchemaGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    edge_by_endpoints: HashMap<(VertexId, VertexId), usize>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        SchemaGraph::default()
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(vertex);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId, label: Option<&str>) {
        assert!(from.index() < self.vertices.len(), "unknown source vertex");
        assert!(to.index() < self.vertices.len(), "unknown target vertex");
        assert!(
            !self.edge_by_endpoints.contains_key(&(from, to)),
            "duplicate edge {from} -> {to}"
        );
        let idx = self.edges.len();
        self.edges.push(Edge {
            from,
            to,
            label: label.map(str::to_owned),
        });
        self.outgoing[from.index()].push(idx);
        self.incoming[to.index()].push(idx);
        self.edge_by_endpoints.insert((from, to), idx);
    }

    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Vertex at position `index` in graph order.
    pub fn vertex_at(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    /// All vertex ids in graph order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId::new)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| (VertexId::new(idx), v))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Out-edges of `v`.
    pub fn adjacent(&self, v: VertexId) -> impl Iterator<Item = &Edge> {
        self.outgoing[v.index()]
            .iter()
            .map(move |&idx| &self.edges[idx])
    }

    /// In-edges of `v`.
    pub fn adjacent_inverse(&self, v: VertexId) -> impl Iterator<Item = &Edge> {
        self.incoming[v.index()]
            .iter()
            .map(move |&idx| &self.edges[idx])
    }

    pub fn edge_between(&self, from: VertexId, to: VertexId) -> Option<&Edge> {
        self.edge_by_endpoints
            .get(&(from, to))
            .map(|&idx| &self.edges[idx])
    }
}

/// Appends ISOLATED slack vertices so both graphs have equal size and every
/// vertex has a feasible counterpart under the by-kind oracle.
///
/// For each kind, the side with fewer vertices of that kind receives one
/// slack vertex per missing counterpart. `extra` additional slack vertices
/// are appended to both sides so the optimum may still choose a
/// delete-plus-insert pair over a same-kind relabeling.
pub fn pad_isolated(source: &mut SchemaGraph, target: &mut SchemaGraph, extra: usize) {
    let mut by_kind: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for v in &source.vertices {
        if !v.is_isolated() {
            by_kind.entry(v.kind()).or_default().0 += 1;
        }
    }
    for u in &target.vertices {
        if !u.is_isolated() {
            by_kind.entry(u.kind()).or_default().1 += 1;
        }
    }

    let mut source_slack = extra;
    let mut target_slack = extra;
    for (source_count, target_count) in by_kind.values() {
        source_slack += target_count.saturating_sub(*source_count);
        target_slack += source_count.saturating_sub(*target_count);
    }

    for i in 0..source_slack {
        source.add_vertex(Vertex::isolated(format!("__slack_src_{i}")));
    }
    for i in 0..target_slack {
        target.add_vertex(Vertex::isolated(format!("__slack_tgt_{i}")));
    }

    debug_assert_eq!(source.size(), target.size());
}
