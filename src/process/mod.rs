//! Traversal process API
//!
//! The traversal source, the traversal builder and remote transactions.
//! This is the only path through which remote graph data is read or written.

pub mod source;
pub mod transaction;
pub mod traversal;

pub use source::{TraversalSource, DEFAULT_ALIAS};
pub use transaction::Transaction;
pub use traversal::Traversal;
