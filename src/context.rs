//! Execution contexts
//!
//! Each unit of concurrent work (a thread, a task, a test case) creates its
//! own [`ExecutionContext`] and passes it to graph operations. The context
//! lazily binds one [`TraversalSource`], and with it one connection pool,
//! on first use and keeps it for its whole lifetime. Contexts are never
//! shared, so no lock spans two contexts.

use crate::driver::ConnectionDescriptor;
use crate::error::{GraphError, GraphResult};
use crate::process::TraversalSource;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;
use uuid::Uuid;

pub struct ExecutionContext {
    id: Uuid,
    source: OnceCell<Arc<TraversalSource>>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            source: OnceCell::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether a traversal source has been bound yet
    pub fn is_bound(&self) -> bool {
        self.source.initialized()
    }

    /// The bound traversal source, without connecting
    pub fn source(&self) -> Option<&Arc<TraversalSource>> {
        self.source.get()
    }

    /// The bound traversal source, connecting with `descriptor` on first use
    ///
    /// A source that was closed stays bound: it is never recreated.
    pub async fn source_or_connect(&self, descriptor: &ConnectionDescriptor) -> GraphResult<Arc<TraversalSource>> {
        let source = self
            .source
            .get_or_try_init(|| async {
                debug!("Binding traversal source for context {}", self.id);
                let source = TraversalSource::connect(descriptor.clone()).await?;
                Ok::<_, GraphError>(Arc::new(source))
            })
            .await?;
        Ok(Arc::clone(source))
    }
}
