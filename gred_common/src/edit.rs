//! Edit operations and the diff result.

use serde::{Deserialize, Serialize};

use crate::mapping::Mapping;
use crate::vertex::VertexId;

/// One concrete edit transforming the source graph toward the target graph.
///
/// Vertex ids refer to the graph the operation touches: deletions name
/// source vertices, insertions name target vertices, relabelings name both.
/// Every operation also carries a human-readable description built from the
/// vertices involved at emission time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOperation {
    InsertVertex {
        target: VertexId,
        description: String,
    },
    DeleteVertex {
        source: VertexId,
        description: String,
    },
    ChangeVertex {
        source: VertexId,
        target: VertexId,
        description: String,
    },
    InsertEdge {
        target_from: VertexId,
        target_to: VertexId,
        description: String,
    },
    DeleteEdge {
        source_from: VertexId,
        source_to: VertexId,
        description: String,
    },
    ChangeEdge {
        source_from: VertexId,
        source_to: VertexId,
        target_from: VertexId,
        target_to: VertexId,
        description: String,
    },
}

impl EditOperation {
    pub fn description(&self) -> &str {
        match self {
            EditOperation::InsertVertex { description, .. }
            | EditOperation::DeleteVertex { description, .. }
            | EditOperation::ChangeVertex { description, .. }
            | EditOperation::InsertEdge { description, .. }
            | EditOperation::DeleteEdge { description, .. }
            | EditOperation::ChangeEdge { description, .. } => description,
        }
    }

    pub fn is_vertex_operation(&self) -> bool {
        matches!(
            self,
            EditOperation::InsertVertex { .. }
                | EditOperation::DeleteVertex { .. }
                | EditOperation::ChangeVertex { .. }
        )
    }

    pub fn is_edge_operation(&self) -> bool {
        !self.is_vertex_operation()
    }
}

/// An optimal edit from one graph to another.
///
/// The mapping pairs every source vertex with a target vertex, but not
/// every pair represents a change; the edit list holds the actual changes
/// and its length equals `ged`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimalEdit {
    pub mapping: Mapping,
    pub edits: Vec<EditOperation>,
    pub ged: usize,
}

impl OptimalEdit {
    pub fn new() -> Self {
        OptimalEdit {
            mapping: Mapping::new(),
            edits: Vec::new(),
            ged: usize::MAX,
        }
    }

    /// True once a total mapping has been recorded.
    pub fn is_resolved(&self) -> bool {
        self.ged != usize::MAX
    }
}

impl Default for OptimalEdit {
    fn default() -> Self {
        OptimalEdit::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_classification() {
        let insert = EditOperation::InsertVertex {
            target: VertexId::new(0),
            description: "insert vertex a:Object".to_owned(),
        };
        let change = EditOperation::ChangeEdge {
            source_from: VertexId::new(0),
            source_to: VertexId::new(1),
            target_from: VertexId::new(0),
            target_to: VertexId::new(1),
            description: "change edge a:Object -> b:Field".to_owned(),
        };
        assert!(insert.is_vertex_operation());
        assert!(change.is_edge_operation());
        assert_eq!(insert.description(), "insert vertex a:Object");
    }

    #[test]
    fn edit_operations_round_trip_as_json() {
        let ops = vec![
            EditOperation::DeleteVertex {
                source: VertexId::new(2),
                description: "delete vertex c:Scalar".to_owned(),
            },
            EditOperation::InsertEdge {
                target_from: VertexId::new(0),
                target_to: VertexId::new(1),
                description: "insert edge a:Object -> b:Field".to_owned(),
            },
        ];
        let json = serde_json::to_string(&ops).unwrap();
        let back: Vec<EditOperation> = serde_json::from_str(&json).unwrap();
        assert_eq!(ops, back);
    }

    #[test]
    fn optimal_edit_round_trips_as_json() {
        let mut mapping = Mapping::new();
        mapping.add(VertexId::new(0), VertexId::new(1));
        let optimal = OptimalEdit {
            mapping,
            edits: vec![EditOperation::ChangeVertex {
                source: VertexId::new(0),
                target: VertexId::new(1),
                description: "change vertex a:T to b:T".to_owned(),
            }],
            ged: 1,
        };

        let json = serde_json::to_string(&optimal).unwrap();
        let back: OptimalEdit = serde_json::from_str(&json).unwrap();

        assert_eq!(back.ged, 1);
        assert_eq!(back.edits, optimal.edits);
        // lookup maps are rebuilt on deserialization
        assert_eq!(
            back.mapping.target_of(VertexId::new(0)),
            Some(VertexId::new(1))
        );
        assert_eq!(
            back.mapping.source_of(VertexId::new(1)),
            Some(VertexId::new(0))
        );
    }
}
