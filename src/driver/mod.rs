//! Remote session layer
//!
//! Everything needed to talk to a Gremlin server: the immutable
//! [`ConnectionDescriptor`], the pooled connection handle and its errors.

pub mod connection;
pub mod descriptor;
pub mod error;
pub mod pool;

pub use connection::Connection;
pub use descriptor::{ConnectionDescriptor, ConnectionDescriptorBuilder, WireEncoding};
pub use error::{SessionError, SessionResult};
pub use pool::ConnectionPool;
