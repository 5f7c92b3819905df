//! Graph structure API
//!
//! The local graph contract ([`Graph`]), the value model returned by the
//! remote server and helpers for element key/value arguments.

pub mod element;
pub mod helper;
pub mod value;

pub use element::{Edge, Property, Vertex, VertexProperty};
pub use value::{GValue, T};

use crate::config::Configuration;
use crate::context::ExecutionContext;
use crate::error::GraphResult;
use crate::features::Features;
use crate::process::{Transaction, TraversalSource};
use async_trait::async_trait;
use std::sync::Arc;

/// An OLAP engine bound to a graph
pub trait GraphComputer: Send {
    /// Engine name
    fn name(&self) -> &str;
}

/// Graph-level key/value variables
pub trait Variables: Send {
    fn keys(&self) -> Vec<String>;
    fn get(&self, key: &str) -> Option<GValue>;
    fn set(&mut self, key: &str, value: GValue) -> GraphResult<()>;
    fn remove(&mut self, key: &str);
}

/// The standard graph contract exercised by conformance suites.
///
/// Operations that reach a server take the caller's [`ExecutionContext`],
/// which owns the context's traversal source and connection.
#[async_trait]
pub trait Graph: Send + Sync {
    /// Add a vertex from a flat key/value array
    fn add_vertex(&self, key_values: &[GValue]) -> GraphResult<Vertex>;

    /// Release the graph and the context's remote resources
    async fn close(&mut self, ctx: &ExecutionContext) -> GraphResult<()>;

    /// Default graph computer
    fn compute(&self) -> GraphResult<Box<dyn GraphComputer>>;

    /// Graph computer by implementation name
    fn compute_with(&self, computer: &str) -> GraphResult<Box<dyn GraphComputer>>;

    fn configuration(&self) -> &Configuration;

    fn configuration_mut(&mut self) -> &mut Configuration;

    /// Edges by identifier (all edges when `edge_ids` is empty)
    fn edges(&self, edge_ids: &[GValue]) -> Box<dyn Iterator<Item = Edge> + Send>;

    /// Vertices by identifier (all vertices when `vertex_ids` is empty)
    fn vertices(&self, vertex_ids: &[GValue]) -> Box<dyn Iterator<Item = Vertex> + Send>;

    /// Transaction handle for the context
    async fn tx(&self, ctx: &ExecutionContext) -> GraphResult<Transaction>;

    fn variables(&self) -> GraphResult<Box<dyn Variables>>;

    /// Traversal source for the context
    async fn traversal(&self, ctx: &ExecutionContext) -> GraphResult<Arc<TraversalSource>>;

    fn features(&self) -> &'static Features;
}
