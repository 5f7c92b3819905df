//! Error types for the graph facade

use crate::driver::SessionError;
use std::fmt;
use thiserror::Error;

/// Operations the adapter declines to perform locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// Vertices can only be added through a remote traversal
    VertexAddition,
    /// No local OLAP engine exists
    GraphComputer,
    /// Graph variables are not exposed
    Variables,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Unsupported::VertexAddition => "Vertex additions are not supported",
            Unsupported::GraphComputer => "Graph does not support graph computer",
            Unsupported::Variables => "Graph does not support graph variables",
        };
        f.write_str(msg)
    }
}

/// Errors surfaced by the graph facade
#[derive(Error, Debug)]
pub enum GraphError {
    /// Malformed arguments, raised before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation that is never available on this graph
    #[error("Operation not supported: {0}")]
    OperationNotSupported(Unsupported),

    /// Failure from the connection/session layer, passed through unchanged
    #[error("Remote session error: {0}")]
    RemoteSession(#[from] SessionError),

    /// Configuration could not be read or holds an invalid value
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GraphError {
    /// Whether this error originated from the remote session layer
    pub fn is_remote(&self) -> bool {
        matches!(self, GraphError::RemoteSession(_))
    }
}

impl From<serde_yaml::Error> for GraphError {
    fn from(e: serde_yaml::Error) -> Self {
        GraphError::Configuration(e.to_string())
    }
}

impl From<std::io::Error> for GraphError {
    fn from(e: std::io::Error) -> Self {
        GraphError::Configuration(e.to_string())
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
