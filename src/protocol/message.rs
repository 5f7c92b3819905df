//! Request and response messages

use crate::driver::{SessionError, SessionResult, WireEncoding};
use crate::protocol::bytecode::Bytecode;
use crate::protocol::graphson;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Processor handling sessionless traversals
pub const TRAVERSAL_PROCESSOR: &str = "traversal";
/// Processor handling traversals bound to a transaction session
pub const SESSION_PROCESSOR: &str = "session";

/// A request submitted to the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMessage {
    #[serde(rename = "requestId")]
    request_id: Uuid,
    op: String,
    processor: String,
    args: Map<String, Value>,
}

impl RequestMessage {
    /// Request evaluating a traversal program against `alias`
    pub fn bytecode(bytecode: &Bytecode, alias: &str, session: Option<Uuid>, encoding: WireEncoding) -> Self {
        let mut args = Map::new();
        args.insert("gremlin".to_string(), graphson::encode_bytecode(bytecode, encoding));
        args.insert("aliases".to_string(), json!({ "g": alias }));

        let processor = match session {
            Some(id) => {
                args.insert("session".to_string(), json!(id.to_string()));
                SESSION_PROCESSOR
            }
            None => TRAVERSAL_PROCESSOR,
        };

        RequestMessage {
            request_id: Uuid::new_v4(),
            op: "bytecode".to_string(),
            processor: processor.to_string(),
            args,
        }
    }

    /// Request releasing a transaction session on the server
    pub fn close_session(session: Uuid) -> Self {
        let mut args = Map::new();
        args.insert("session".to_string(), json!(session.to_string()));
        RequestMessage {
            request_id: Uuid::new_v4(),
            op: "close".to_string(),
            processor: SESSION_PROCESSOR.to_string(),
            args,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn processor(&self) -> &str {
        &self.processor
    }

    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    pub fn to_bytes(&self) -> SessionResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Status block of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attributes: Value,
}

impl ResponseStatus {
    pub const SUCCESS: u16 = 200;
    pub const NO_CONTENT: u16 = 204;
    pub const PARTIAL_CONTENT: u16 = 206;

    /// Final chunk of a successful response
    pub fn is_final_success(&self) -> bool {
        self.code == Self::SUCCESS || self.code == Self::NO_CONTENT
    }

    pub fn is_partial(&self) -> bool {
        self.code == Self::PARTIAL_CONTENT
    }
}

/// Result block of a response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseResult {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: Value,
}

/// One response chunk received from the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(rename = "requestId", default)]
    request_id: Value,
    pub status: ResponseStatus,
    #[serde(default)]
    pub result: ResponseResult,
}

impl ResponseMessage {
    pub fn from_slice(payload: &[u8]) -> SessionResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Request id, accepting both plain and `g:UUID` encodings
    pub fn request_id(&self) -> SessionResult<Uuid> {
        let raw = match &self.request_id {
            Value::String(s) => s.as_str(),
            Value::Object(o) => o
                .get("@value")
                .and_then(|v| v.as_str())
                .ok_or_else(|| SessionError::Protocol("Malformed requestId".to_string()))?,
            _ => return Err(SessionError::Protocol("Response without requestId".to_string())),
        };
        Uuid::parse_str(raw).map_err(|e| SessionError::Protocol(format!("Invalid requestId: {}", e)))
    }

    /// Build a response chunk, as a server would send it
    pub fn new(request_id: Uuid, status: ResponseStatus, data: Value) -> Self {
        ResponseMessage {
            request_id: json!(request_id.to_string()),
            status,
            result: ResponseResult {
                data,
                meta: json!({}),
            },
        }
    }
}
