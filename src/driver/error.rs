//! Errors of the remote session layer

use thiserror::Error;

/// Failures surfaced by connections to the remote server
#[derive(Error, Debug)]
pub enum SessionError {
    /// WebSocket handshake or transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection pool was closed and cannot be used again
    #[error("Connection pool is closed")]
    Closed,

    /// The socket went away with requests outstanding
    #[error("Connection to the server was lost")]
    ConnectionLost,

    /// Malformed frame or message
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered with a failure status
    #[error("Server error {code}: {message}")]
    Server { code: u16, message: String },

    /// Transaction handle used out of order
    #[error("Transaction error: {0}")]
    Transaction(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
