//! Fluent traversal builder
//!
//! Steps only append instructions to the bytecode; nothing reaches the
//! server until a terminal step (`to_list`, `next`, `iterate`) runs.

use super::source::TraversalSource;
use crate::error::GraphResult;
use crate::protocol::Bytecode;
use crate::structure::GValue;
use std::sync::Arc;

fn labels(names: &[&str]) -> Vec<GValue> {
    names.iter().map(|n| GValue::from(*n)).collect()
}

/// A traversal under construction
#[derive(Clone)]
pub struct Traversal {
    source: Arc<TraversalSource>,
    bytecode: Bytecode,
}

impl Traversal {
    pub(crate) fn new(source: Arc<TraversalSource>, bytecode: Bytecode) -> Self {
        Self { source, bytecode }
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    fn step(mut self, operator: &str, arguments: Vec<GValue>) -> Self {
        self.bytecode.add_step(operator, arguments);
        self
    }

    pub fn out(self, edge_labels: &[&str]) -> Self {
        self.step("out", labels(edge_labels))
    }

    pub fn in_(self, edge_labels: &[&str]) -> Self {
        self.step("in", labels(edge_labels))
    }

    pub fn both(self, edge_labels: &[&str]) -> Self {
        self.step("both", labels(edge_labels))
    }

    pub fn out_e(self, edge_labels: &[&str]) -> Self {
        self.step("outE", labels(edge_labels))
    }

    pub fn in_e(self, edge_labels: &[&str]) -> Self {
        self.step("inE", labels(edge_labels))
    }

    pub fn in_v(self) -> Self {
        self.step("inV", vec![])
    }

    pub fn out_v(self) -> Self {
        self.step("outV", vec![])
    }

    pub fn has(self, key: &str, value: impl Into<GValue>) -> Self {
        self.step("has", vec![key.into(), value.into()])
    }

    pub fn has_label(self, label: &str) -> Self {
        self.step("hasLabel", vec![label.into()])
    }

    pub fn has_id(self, id: impl Into<GValue>) -> Self {
        self.step("hasId", vec![id.into()])
    }

    pub fn values(self, keys: &[&str]) -> Self {
        self.step("values", labels(keys))
    }

    pub fn value_map(self) -> Self {
        self.step("valueMap", vec![])
    }

    pub fn id(self) -> Self {
        self.step("id", vec![])
    }

    pub fn label(self) -> Self {
        self.step("label", vec![])
    }

    pub fn property(self, key: impl Into<GValue>, value: impl Into<GValue>) -> Self {
        self.step("property", vec![key.into(), value.into()])
    }

    /// Label the current step for later reference
    pub fn as_(self, step_label: &str) -> Self {
        self.step("as", vec![step_label.into()])
    }

    /// Tail of an edge being added: a step label or a vertex
    pub fn from(self, vertex: impl Into<GValue>) -> Self {
        self.step("from", vec![vertex.into()])
    }

    /// Head of an edge being added: a step label or a vertex
    pub fn to(self, vertex: impl Into<GValue>) -> Self {
        self.step("to", vec![vertex.into()])
    }

    pub fn count(self) -> Self {
        self.step("count", vec![])
    }

    pub fn limit(self, max: i64) -> Self {
        self.step("limit", vec![max.into()])
    }

    pub fn drop(self) -> Self {
        self.step("drop", vec![])
    }

    /// Run the traversal and collect every result
    pub async fn to_list(self) -> GraphResult<Vec<GValue>> {
        self.source.submit(&self.bytecode).await
    }

    /// Run the traversal and return its first result
    pub async fn next(self) -> GraphResult<Option<GValue>> {
        Ok(self.to_list().await?.into_iter().next())
    }

    /// Run the traversal for its side effects
    pub async fn iterate(self) -> GraphResult<()> {
        self.to_list().await?;
        Ok(())
    }
}
