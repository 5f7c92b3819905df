//! Remote Graph
//!
//! A graph API adapter whose storage and traversal engine live in a remote
//! Gremlin server. Conformance suites drive the standard graph contract
//! ([`Graph`]) against [`RemoteGraph`] without knowing that every read and
//! write crosses the network.
//!
//! # Architecture
//!
//! - [`RemoteGraph`]: the facade. Holds a configuration and a
//!   [`ConnectionDescriptor`]; owns no graph data.
//! - [`ExecutionContext`]: created by the caller per unit of concurrent
//!   work. Lazily binds one [`TraversalSource`] (and one connection pool).
//! - [`TraversalSource`]: builds traversals and manages remote transactions.
//! - [`Features`]: static capability descriptor, all flags unsupported.
//! - [`driver`] / [`protocol`]: the remote session layer (WebSocket
//!   connection, request framing and GraphSON).
//!
//! ## Example Usage
//!
//! ```no_run
//! use remote_graph::{ExecutionContext, Graph, RemoteGraph};
//!
//! # async fn run() -> remote_graph::GraphResult<()> {
//! let graph = RemoteGraph::open_default();
//! let ctx = ExecutionContext::new();
//!
//! let g = graph.traversal(&ctx).await?;
//! let count = g.v(vec![]).count().next().await?;
//! println!("vertices: {:?}", count);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod features;
pub mod graph;
pub mod process;
pub mod protocol;
pub mod structure;

// Re-export main types for convenience
pub use config::{ConfigValue, Configuration};
pub use context::ExecutionContext;
pub use driver::{ConnectionDescriptor, ConnectionPool, SessionError, SessionResult, WireEncoding};
pub use error::{GraphError, GraphResult, Unsupported};
pub use features::{Capability, FeatureCategory, Features, REMOTE_FEATURES};
pub use graph::RemoteGraph;
pub use process::{Transaction, Traversal, TraversalSource};
pub use protocol::Bytecode;
pub use structure::{Edge, GValue, Graph, GraphComputer, Property, Variables, Vertex, VertexProperty, T};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
