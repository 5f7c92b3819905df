//! Connection pool handle
//!
//! Wraps one logical connection built from a [`ConnectionDescriptor`].
//! The handle bounds how many callers may use the connection at once;
//! in-flight multiplexing is left to the connection itself.

use super::connection::Connection;
use super::descriptor::ConnectionDescriptor;
use super::error::{SessionError, SessionResult};
use crate::protocol::RequestMessage;
use crate::structure::GValue;
use tokio::sync::Semaphore;
use tracing::info;

pub struct ConnectionPool {
    descriptor: ConnectionDescriptor,
    connection: Connection,
    users: Semaphore,
}

impl ConnectionPool {
    /// Connect to the server described by `descriptor`
    pub async fn open(descriptor: ConnectionDescriptor) -> SessionResult<Self> {
        info!(
            "Opening connection to {} ({})",
            descriptor.url(),
            descriptor.wire_encoding()
        );
        let connection = Connection::open(&descriptor).await?;
        let users = Semaphore::new(descriptor.max_concurrent_users_per_connection());

        Ok(Self {
            descriptor,
            connection,
            users,
        })
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Submit a request on the pooled connection
    pub async fn submit(&self, request: &RequestMessage) -> SessionResult<Vec<GValue>> {
        let _user = self.users.acquire().await.map_err(|_| SessionError::Closed)?;
        self.connection.submit(request).await
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_closed()
    }

    /// Requests currently awaiting a response
    pub fn pending(&self) -> usize {
        self.connection.pending()
    }

    /// Release the connection; the pool cannot be reopened
    pub fn close(&self) -> SessionResult<()> {
        self.connection.close()?;
        self.users.close();
        info!("Closed connection to {}", self.descriptor.url());
        Ok(())
    }
}
