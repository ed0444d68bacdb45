//! Common types shared across the gred workspace.
//!
//! This crate provides the graph model, partial mappings, edit operations,
//! the possible-mappings oracle, diff configuration and a collection of
//! pre-defined diff test cases.

mod check;
mod config;
mod edit;
mod error;
mod graph;
mod mapping;
mod possible;
mod test_cases;
mod vertex;

pub use crate::check::{CancellationHandle, RunningCheck};
pub use crate::config::DiffConfig;
pub use crate::edit::{EditOperation, OptimalEdit};
pub use crate::error::DiffError;
pub use crate::graph::{pad_isolated, Edge, SchemaGraph};
pub use crate::mapping::Mapping;
pub use crate::possible::PossibleMappings;
pub use crate::test_cases::{DiffCase, ALL_DIFF_CASES};
pub use crate::vertex::{Vertex, VertexId, ISOLATED};
