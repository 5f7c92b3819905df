//! Remote transactions
//!
//! A transaction is a server-side session: while it is open, every program
//! submitted through the source carries the session id, and commit or
//! rollback is itself a program sent on that session. The server owns all
//! transactional semantics.

use super::source::TraversalSource;
use crate::driver::SessionError;
use crate::error::GraphResult;
use crate::protocol::Bytecode;
use std::sync::Arc;
use tracing::debug;

/// Transaction handle of a [`TraversalSource`]
#[derive(Clone)]
pub struct Transaction {
    source: Arc<TraversalSource>,
}

impl Transaction {
    pub(crate) fn new(source: Arc<TraversalSource>) -> Self {
        Self { source }
    }

    pub fn is_open(&self) -> bool {
        self.source.session().is_some()
    }

    /// Open a session for subsequent traversals
    pub fn begin(&self) -> GraphResult<()> {
        if self.source.is_closed() {
            return Err(SessionError::Closed.into());
        }
        let session = self
            .source
            .begin_session()
            .ok_or_else(|| SessionError::Transaction("Transaction already open".to_string()))?;
        debug!("Began transaction session {}", session);
        Ok(())
    }

    pub async fn commit(&self) -> GraphResult<()> {
        self.finish(Bytecode::tx_commit()).await
    }

    pub async fn rollback(&self) -> GraphResult<()> {
        self.finish(Bytecode::tx_rollback()).await
    }

    /// Send the `tx` program, then close the server session
    ///
    /// The session is released locally and a close is sent even when the
    /// server rejects the `tx` program; its error takes precedence.
    async fn finish(&self, bytecode: Bytecode) -> GraphResult<()> {
        let session = self
            .source
            .take_session()
            .ok_or_else(|| SessionError::Transaction("No transaction is open".to_string()))?;
        debug!("Finishing transaction session {} with {}", session, bytecode);
        let finished = self.source.submit_in(&bytecode, Some(session)).await;
        let closed = self.source.close_session(session).await;
        finished?;
        closed
    }
}
