//! Remote graph facade
//!
//! [`RemoteGraph`] implements the [`Graph`] contract without holding any
//! graph data. Reads and writes go through the context's traversal source;
//! every other data operation fails fast.

use crate::config::{self, Configuration};
use crate::context::ExecutionContext;
use crate::driver::ConnectionDescriptor;
use crate::error::{GraphError, GraphResult, Unsupported};
use crate::features::{Features, REMOTE_FEATURES};
use crate::process::{Transaction, TraversalSource};
use crate::structure::helper;
use crate::structure::{Edge, GValue, Graph, GraphComputer, Variables, Vertex};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Value stored under [`config::GRAPH`] by [`RemoteGraph::open_default`]
pub const GRAPH_NAME: &str = "remote_graph::RemoteGraph";

/// Graph facade delegating to a remote Gremlin server
pub struct RemoteGraph {
    configuration: Configuration,
    descriptor: ConnectionDescriptor,
}

impl RemoteGraph {
    /// Open a graph over a copy of `configuration`; nothing is connected yet
    pub fn open(configuration: &Configuration, descriptor: ConnectionDescriptor) -> Self {
        let mut owned = Configuration::new();
        owned.copy_from(configuration);
        debug!("Opened graph for {} with {} configuration keys", descriptor.url(), owned.len());
        Self {
            configuration: owned,
            descriptor,
        }
    }

    /// Open a graph with the default descriptor and a minimal configuration
    pub fn open_default() -> Self {
        let mut configuration = Configuration::new();
        configuration.set_property(config::GRAPH, GRAPH_NAME);
        Self::open(&configuration, ConnectionDescriptor::default())
    }

    /// Open a graph whose descriptor is derived from the configuration
    pub fn from_configuration(configuration: &Configuration) -> GraphResult<Self> {
        let descriptor = ConnectionDescriptor::from_configuration(configuration)?;
        Ok(Self::open(configuration, descriptor))
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }
}

impl fmt::Display for RemoteGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remotegraph[{}]", self.descriptor.url())
    }
}

#[async_trait]
impl Graph for RemoteGraph {
    fn add_vertex(&self, key_values: &[GValue]) -> GraphResult<Vertex> {
        helper::legal_key_values(key_values)?;
        if helper::id_value(key_values).is_some() {
            return Err(GraphError::InvalidArgument(
                "Vertex does not support user supplied identifiers".to_string(),
            ));
        }
        Err(GraphError::OperationNotSupported(Unsupported::VertexAddition))
    }

    async fn close(&mut self, ctx: &ExecutionContext) -> GraphResult<()> {
        self.configuration.clear();
        match ctx.source() {
            Some(source) => {
                source.close()?;
                info!("Released traversal source of context {}", ctx.id());
            }
            None => debug!("Context {} never bound a traversal source", ctx.id()),
        }
        Ok(())
    }

    fn compute(&self) -> GraphResult<Box<dyn GraphComputer>> {
        Err(GraphError::OperationNotSupported(Unsupported::GraphComputer))
    }

    fn compute_with(&self, _computer: &str) -> GraphResult<Box<dyn GraphComputer>> {
        Err(GraphError::OperationNotSupported(Unsupported::GraphComputer))
    }

    fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.configuration
    }

    fn edges(&self, _edge_ids: &[GValue]) -> Box<dyn Iterator<Item = Edge> + Send> {
        Box::new(std::iter::empty())
    }

    fn vertices(&self, _vertex_ids: &[GValue]) -> Box<dyn Iterator<Item = Vertex> + Send> {
        Box::new(std::iter::empty())
    }

    async fn tx(&self, ctx: &ExecutionContext) -> GraphResult<Transaction> {
        Ok(self.traversal(ctx).await?.tx())
    }

    fn variables(&self) -> GraphResult<Box<dyn Variables>> {
        Err(GraphError::OperationNotSupported(Unsupported::Variables))
    }

    async fn traversal(&self, ctx: &ExecutionContext) -> GraphResult<Arc<TraversalSource>> {
        ctx.source_or_connect(&self.descriptor).await
    }

    fn features(&self) -> &'static Features {
        &REMOTE_FEATURES
    }
}
