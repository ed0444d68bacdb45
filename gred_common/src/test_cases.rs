//! Shared diff test cases.
//!
//! Each case names a source graph, a target graph and the expected edit
//! distance under the default by-kind oracle. The engine's integration
//! tests iterate this table.

use crate::config::DiffConfig;
use crate::graph::SchemaGraph;
use crate::vertex::{Vertex, VertexId};

/// A complete diff test case definition.
#[derive(Clone, Debug)]
pub struct DiffCase {
    /// The name of the test case.
    pub name: &'static str,
    /// The configuration for the diff run.
    pub config: DiffConfig,
    /// The graph to edit.
    pub source: SchemaGraph,
    /// The graph to reach.
    pub target: SchemaGraph,
    /// The expected edit distance.
    pub expected_ged: usize,
}

fn vertex(name: &str, kind: &str, properties: &[(&str, &str)]) -> Vertex {
    let mut v = Vertex::new(name, kind);
    for (key, value) in properties {
        v = v.with_property(*key, *value);
    }
    v
}

fn graph(vertices: Vec<Vertex>, edges: &[(usize, usize, Option<&str>)]) -> SchemaGraph {
    let mut g = SchemaGraph::new();
    for v in vertices {
        g.add_vertex(v);
    }
    for &(from, to, label) in edges {
        g.add_edge(VertexId::new(from), VertexId::new(to), label);
    }
    g
}

fn case(
    name: &'static str,
    source: SchemaGraph,
    target: SchemaGraph,
    expected_ged: usize,
) -> DiffCase {
    DiffCase {
        name,
        config: DiffConfig::default(),
        source,
        target,
        expected_ged,
    }
}

lazy_static::lazy_static! {
    pub static ref ALL_DIFF_CASES: Vec<DiffCase> = vec![
        case(
            "identical_pair",
            graph(
                vec![vertex("a", "TypeA", &[("p", "1")]), vertex("b", "TypeB", &[])],
                &[(0, 1, Some("e"))],
            ),
            graph(
                vec![vertex("a", "TypeA", &[("p", "1")]), vertex("b", "TypeB", &[])],
                &[(0, 1, Some("e"))],
            ),
            0,
        ),
        case(
            "property_change",
            graph(vec![vertex("a", "T", &[("p", "1")])], &[]),
            graph(vec![vertex("a", "T", &[("p", "2")])], &[]),
            1,
        ),
        case(
            "edge_label_change",
            graph(
                vec![vertex("a", "TypeA", &[]), vertex("b", "TypeB", &[])],
                &[(0, 1, Some("x"))],
            ),
            graph(
                vec![vertex("a", "TypeA", &[]), vertex("b", "TypeB", &[])],
                &[(0, 1, Some("y"))],
            ),
            1,
        ),
        case(
            "pure_insertion",
            graph(vec![vertex("a", "T", &[])], &[]),
            graph(vec![vertex("a", "T", &[]), vertex("b", "TypeB", &[])], &[]),
            1,
        ),
        case(
            "edge_reversal",
            graph(
                vec![vertex("a", "TypeA", &[]), vertex("b", "TypeB", &[])],
                &[(0, 1, None)],
            ),
            graph(
                vec![vertex("a", "TypeA", &[]), vertex("b", "TypeB", &[])],
                &[(1, 0, None)],
            ),
            2,
        ),
        case(
            "self_loop_removal",
            graph(vec![vertex("a", "T", &[])], &[(0, 0, Some("l"))]),
            graph(vec![vertex("a", "T", &[])], &[]),
            1,
        ),
        case(
            "vertex_and_edge_insertion",
            graph(vec![vertex("a", "Object", &[])], &[]),
            graph(
                vec![vertex("a", "Object", &[]), vertex("b", "Field", &[])],
                &[(0, 1, Some("has"))],
            ),
            2,
        ),
        case(
            "kind_swap_is_delete_plus_insert",
            graph(vec![vertex("a", "TypeA", &[])], &[]),
            graph(vec![vertex("b", "TypeB", &[])], &[]),
            2,
        ),
        case(
            "fan_out_single_label_change",
            graph(
                vec![
                    vertex("a", "Object", &[]),
                    vertex("b", "Field", &[("n", "b")]),
                    vertex("c", "Field", &[("n", "c")]),
                ],
                &[(0, 1, Some("x")), (0, 2, Some("y"))],
            ),
            graph(
                vec![
                    vertex("a", "Object", &[]),
                    vertex("b", "Field", &[("n", "b")]),
                    vertex("c", "Field", &[("n", "c")]),
                ],
                &[(0, 1, Some("x")), (0, 2, Some("z"))],
            ),
            1,
        ),
        case(
            "two_property_changes",
            graph(
                vec![vertex("a", "T", &[("p", "1")]), vertex("b", "U", &[("q", "1")])],
                &[],
            ),
            graph(
                vec![vertex("a", "T", &[("p", "2")]), vertex("b", "U", &[("q", "2")])],
                &[],
            ),
            2,
        ),
    ];
}
