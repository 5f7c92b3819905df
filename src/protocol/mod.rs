//! Gremlin server wire protocol
//!
//! Framing, GraphSON encoding and the request/response envelopes used to
//! talk to the remote server.

pub mod bytecode;
pub mod frame;
pub mod graphson;
pub mod message;

pub use bytecode::{Bytecode, Instruction};
pub use frame::RequestFrame;
pub use message::{RequestMessage, ResponseMessage, ResponseResult, ResponseStatus};
