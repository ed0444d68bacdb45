//! True editorial cost of a mapping.
//!
//! A partial mapping induces a subgraph on each side; the editorial cost is
//! computed only with respect to those subgraphs. For a total mapping this
//! is the actual number of edit operations, i.e. the value the search
//! minimizes.

use gred_common::{EditOperation, Mapping, SchemaGraph};

/// Cost of `mapping` restricted to its mapped subgraph, appending the
/// concrete operations to `edits`. Deterministic: one operation per unit of
/// cost, in vertex-pass then edge-pass order.
pub fn editorial_cost_for_mapping(
    mapping: &Mapping,
    source: &SchemaGraph,
    target: &SchemaGraph,
    edits: &mut Vec<EditOperation>,
) -> usize {
    let mut cost = 0;

    for level in 0..mapping.size() {
        let v = mapping.source_at(level);
        let u = mapping.target_at(level);
        let source_vertex = source.vertex(v);
        let target_vertex = target.vertex(u);
        if source_vertex.same_label(target_vertex) {
            continue;
        }
        cost += 1;
        if source_vertex.is_isolated() {
            edits.push(EditOperation::InsertVertex {
                target: u,
                description: format!("insert vertex {target_vertex}"),
            });
        } else if target_vertex.is_isolated() {
            edits.push(EditOperation::DeleteVertex {
                source: v,
                description: format!("delete vertex {source_vertex}"),
            });
        } else {
            edits.push(EditOperation::ChangeVertex {
                source: v,
                target: u,
                description: format!("change vertex {source_vertex} to {target_vertex}"),
            });
        }
    }

    // source edges inside the mapped subgraph: deleted or relabeled
    for edge in source.edges() {
        let (Some(target_from), Some(target_to)) =
            (mapping.target_of(edge.from()), mapping.target_of(edge.to()))
        else {
            continue;
        };
        match target.edge_between(target_from, target_to) {
            None => {
                cost += 1;
                edits.push(EditOperation::DeleteEdge {
                    source_from: edge.from(),
                    source_to: edge.to(),
                    description: format!(
                        "delete edge {} -> {}",
                        source.vertex(edge.from()),
                        source.vertex(edge.to())
                    ),
                });
            }
            Some(target_edge) => {
                if edge.label() != target_edge.label() {
                    cost += 1;
                    edits.push(EditOperation::ChangeEdge {
                        source_from: edge.from(),
                        source_to: edge.to(),
                        target_from,
                        target_to,
                        description: format!(
                            "change edge {} -> {} label {:?} to {:?}",
                            source.vertex(edge.from()),
                            source.vertex(edge.to()),
                            edge.label(),
                            target_edge.label()
                        ),
                    });
                }
            }
        }
    }

    // target edges inside the mapped subgraph with no source counterpart: inserted
    for edge in target.edges() {
        let (Some(source_from), Some(source_to)) =
            (mapping.source_of(edge.from()), mapping.source_of(edge.to()))
        else {
            continue;
        };
        if source.edge_between(source_from, source_to).is_none() {
            cost += 1;
            edits.push(EditOperation::InsertEdge {
                target_from: edge.from(),
                target_to: edge.to(),
                description: format!(
                    "insert edge {} -> {}",
                    target.vertex(edge.from()),
                    target.vertex(edge.to())
                ),
            });
        }
    }

    cost
}
