//! Traversal source bound to a remote connection

use super::transaction::Transaction;
use super::traversal::Traversal;
use crate::driver::{ConnectionDescriptor, ConnectionPool};
use crate::error::GraphResult;
use crate::protocol::{Bytecode, RequestMessage};
use crate::structure::GValue;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Alias of the traversal source on the server
pub const DEFAULT_ALIAS: &str = "g";

/// Entry point for building and submitting traversals
///
/// A source owns exactly one [`ConnectionPool`] and tracks the remote
/// transaction session, if one is open.
pub struct TraversalSource {
    pool: ConnectionPool,
    alias: String,
    session: Mutex<Option<Uuid>>,
}

impl std::fmt::Debug for TraversalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalSource")
            .field("alias", &self.alias)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl TraversalSource {
    /// Build a pool from `descriptor` and bind a source to it
    pub async fn connect(descriptor: ConnectionDescriptor) -> GraphResult<Self> {
        let pool = ConnectionPool::open(descriptor).await?;
        Ok(Self::with_remote(pool))
    }

    /// Bind a source to an already open pool
    pub fn with_remote(pool: ConnectionPool) -> Self {
        Self {
            pool,
            alias: DEFAULT_ALIAS.to_string(),
            session: Mutex::new(None),
        }
    }

    /// Target a differently named source on the server
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn spawn(self: &Arc<Self>, operator: &str, arguments: Vec<GValue>) -> Traversal {
        let mut bytecode = Bytecode::new();
        bytecode.add_step(operator, arguments);
        Traversal::new(Arc::clone(self), bytecode)
    }

    /// Vertices by id, or all vertices when `ids` is empty
    pub fn v(self: &Arc<Self>, ids: Vec<GValue>) -> Traversal {
        self.spawn("V", ids)
    }

    /// Edges by id, or all edges when `ids` is empty
    pub fn e(self: &Arc<Self>, ids: Vec<GValue>) -> Traversal {
        self.spawn("E", ids)
    }

    pub fn add_v(self: &Arc<Self>, label: &str) -> Traversal {
        self.spawn("addV", vec![label.into()])
    }

    pub fn add_e(self: &Arc<Self>, label: &str) -> Traversal {
        self.spawn("addE", vec![label.into()])
    }

    /// Start a traversal from literal values
    pub fn inject(self: &Arc<Self>, values: Vec<GValue>) -> Traversal {
        self.spawn("inject", values)
    }

    /// Transaction handle for this source
    pub fn tx(self: &Arc<Self>) -> Transaction {
        Transaction::new(Arc::clone(self))
    }

    /// Submit a program, inside the open transaction if there is one
    pub async fn submit(&self, bytecode: &Bytecode) -> GraphResult<Vec<GValue>> {
        let session = self.session();
        self.submit_in(bytecode, session).await
    }

    pub(crate) async fn submit_in(&self, bytecode: &Bytecode, session: Option<Uuid>) -> GraphResult<Vec<GValue>> {
        let request = RequestMessage::bytecode(bytecode, &self.alias, session, self.pool.descriptor().wire_encoding());
        debug!("Submitting {} as {}", bytecode, request.request_id());
        Ok(self.pool.submit(&request).await?)
    }

    /// Release a transaction session on the server
    pub(crate) async fn close_session(&self, session: Uuid) -> GraphResult<()> {
        let request = RequestMessage::close_session(session);
        debug!("Closing session {} as {}", session, request.request_id());
        self.pool.submit(&request).await?;
        Ok(())
    }

    pub(crate) fn session(&self) -> Option<Uuid> {
        *self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open a new session unless one is already open
    pub(crate) fn begin_session(&self) -> Option<Uuid> {
        let mut guard = self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.is_some() {
            return None;
        }
        let session = Uuid::new_v4();
        *guard = Some(session);
        Some(session)
    }

    pub(crate) fn take_session(&self) -> Option<Uuid> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take()
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Release the underlying pool
    pub fn close(&self) -> GraphResult<()> {
        Ok(self.pool.close()?)
    }
}
