//! In-process mock Gremlin server for integration tests
//!
//! Answers a handful of canned programs:
//! - `V()...count()` → 2
//! - `V()` → two vertices wrapped in traversers
//! - `E()` → 204 no content
//! - `inject(...)` → echoes the arguments across a 206 and a 200 chunk
//! - `fail()` → status 597
//! - `hangup()` → drops the socket without answering
//! - any `tx` source instruction → empty success
//! - the `close` op → 204 no content

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use remote_graph::protocol::frame;
use remote_graph::ConnectionDescriptor;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

#[derive(Default)]
pub struct MockState {
    connections: AtomicUsize,
    requests: Mutex<Vec<Value>>,
    mime_types: Mutex<Vec<String>>,
}

pub struct MockServer {
    pub port: u16,
    state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(MockState::default());

        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                accept_state.connections.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(handle(socket, Arc::clone(&accept_state)));
            }
        });

        MockServer { port, state }
    }

    pub fn descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::builder("127.0.0.1")
            .port(self.port)
            .build()
            .unwrap()
    }

    /// Connections accepted so far
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Request messages received so far, in arrival order
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn mime_types(&self) -> Vec<String> {
        self.state.mime_types.lock().unwrap().clone()
    }
}

async fn handle(socket: TcpStream, state: Arc<MockState>) {
    let Ok(mut ws) = tokio_tungstenite::accept_async(socket).await else {
        return;
    };

    while let Some(Ok(message)) = ws.next().await {
        let data = match message {
            Message::Binary(data) => data,
            Message::Close(_) => break,
            _ => continue,
        };

        let request_frame = frame::decode(data).unwrap();
        let request: Value = serde_json::from_slice(&request_frame.payload).unwrap();
        state.mime_types.lock().unwrap().push(request_frame.mime_type);
        state.requests.lock().unwrap().push(request.clone());

        let Some(responses) = respond(&request) else {
            return;
        };
        for response in responses {
            if ws.send(Message::Text(response.to_string().into())).await.is_err() {
                return;
            }
        }
    }
}

fn int64(i: i64) -> Value {
    json!({"@type": "g:Int64", "@value": i})
}

fn vertex(id: i64, name: &str) -> Value {
    json!({
        "@type": "g:Traverser",
        "@value": {
            "bulk": int64(1),
            "value": {
                "@type": "g:Vertex",
                "@value": {
                    "id": int64(id),
                    "label": "person",
                    "properties": {
                        "name": [{
                            "@type": "g:VertexProperty",
                            "@value": {"id": int64(id * 10), "label": "name", "value": name}
                        }]
                    }
                }
            }
        }
    })
}

fn chunk(id: &Value, code: u16, message: &str, items: Vec<Value>) -> Value {
    json!({
        "requestId": id,
        "status": {"code": code, "message": message, "attributes": {}},
        "result": {"data": {"@type": "g:List", "@value": items}, "meta": {}}
    })
}

fn no_content(id: &Value) -> Value {
    json!({
        "requestId": id,
        "status": {"code": 204, "message": "", "attributes": {}},
        "result": {"data": null, "meta": {}}
    })
}

/// Canned answers; `None` means hang up
fn respond(request: &Value) -> Option<Vec<Value>> {
    let id = &request["requestId"];
    let program = &request["args"]["gremlin"]["@value"];

    if request["op"] == "close" {
        return Some(vec![no_content(id)]);
    }
    if program.get("source").is_some() {
        return Some(vec![chunk(id, 200, "", vec![])]);
    }

    let steps = program["step"].as_array().cloned().unwrap_or_default();
    let first = steps.first().and_then(|s| s[0].as_str()).unwrap_or("");
    let last = steps.last().and_then(|s| s[0].as_str()).unwrap_or("");

    let responses = match (first, last) {
        ("V", "count") => vec![chunk(id, 200, "", vec![int64(2)])],
        ("V", _) => vec![chunk(id, 200, "", vec![vertex(1, "marko"), vertex(2, "vadas")])],
        ("E", _) => vec![no_content(id)],
        ("inject", _) => {
            let args: Vec<Value> = steps[0].as_array().unwrap()[1..].to_vec();
            let split = args.len() / 2;
            vec![
                chunk(id, 206, "", args[..split].to_vec()),
                chunk(id, 200, "", args[split..].to_vec()),
            ]
        }
        ("fail", _) => vec![chunk(id, 597, "boom", vec![])],
        ("hangup", _) => return None,
        _ => vec![chunk(id, 499, "unknown program", vec![])],
    };
    Some(responses)
}
