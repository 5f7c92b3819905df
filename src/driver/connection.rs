//! A multiplexed WebSocket connection to the remote server
//!
//! One writer task drains outbound frames, one reader task routes response
//! chunks to the request that is waiting for them. Requests are matched by
//! request id, so up to `max_in_flight_per_connection` of them can share the
//! socket at once.

use super::descriptor::{ConnectionDescriptor, WireEncoding};
use super::error::{SessionError, SessionResult};
use crate::protocol::{frame, graphson, RequestMessage, ResponseMessage};
use crate::structure::GValue;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use uuid::Uuid;

struct PendingRequest {
    /// Items accumulated from partial (206) chunks
    results: Vec<GValue>,
    reply: oneshot::Sender<SessionResult<Vec<GValue>>>,
}

#[derive(Default)]
struct InFlight {
    requests: HashMap<Uuid, PendingRequest>,
    /// Set once the reader has stopped; no further request can complete
    lost: bool,
}

fn lock(in_flight: &Mutex<InFlight>) -> MutexGuard<'_, InFlight> {
    in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A live session with the remote server
pub struct Connection {
    encoding: WireEncoding,
    outbound: mpsc::UnboundedSender<Message>,
    in_flight: Arc<Mutex<InFlight>>,
    permits: Semaphore,
    closed: AtomicBool,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl Connection {
    /// Connect and perform the WebSocket handshake
    pub async fn open(descriptor: &ConnectionDescriptor) -> SessionResult<Self> {
        let url = descriptor.url();
        let (socket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        debug!("WebSocket handshake with {} complete", url);

        let (mut sink, mut stream) = socket.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let in_flight = Arc::new(Mutex::new(InFlight::default()));

        let writer = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    warn!("Failed to write to server: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        let routes = Arc::clone(&in_flight);
        let reader = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Binary(data)) => dispatch(&routes, &data),
                    Ok(Message::Text(text)) => dispatch(&routes, text.as_bytes()),
                    Ok(Message::Close(_)) => {
                        debug!("Server closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Failed to read from server: {}", e);
                        break;
                    }
                }
            }
            fail_outstanding(&routes);
        });

        Ok(Self {
            encoding: descriptor.wire_encoding(),
            outbound,
            in_flight,
            permits: Semaphore::new(descriptor.max_in_flight_per_connection()),
            closed: AtomicBool::new(false),
            reader,
            writer,
        })
    }

    /// Send a request and wait for its complete result
    pub async fn submit(&self, request: &RequestMessage) -> SessionResult<Vec<GValue>> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let _permit = self.permits.acquire().await.map_err(|_| SessionError::Closed)?;

        let payload = frame::encode(self.encoding.mime_type(), &request.to_bytes()?)?;
        let request_id = request.request_id();
        let (reply, response) = oneshot::channel();
        {
            let mut in_flight = lock(&self.in_flight);
            if in_flight.lost {
                return Err(SessionError::ConnectionLost);
            }
            in_flight.requests.insert(
                request_id,
                PendingRequest {
                    results: Vec::new(),
                    reply,
                },
            );
        }

        if self.outbound.send(Message::Binary(payload)).is_err() {
            lock(&self.in_flight).requests.remove(&request_id);
            return Err(SessionError::ConnectionLost);
        }
        debug!("Submitted request {}", request_id);

        response.await.map_err(|_| SessionError::ConnectionLost)?
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of requests awaiting a response
    pub fn pending(&self) -> usize {
        lock(&self.in_flight).requests.len()
    }

    /// Send a close frame; a second call fails with [`SessionError::Closed`]
    pub fn close(&self) -> SessionResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(SessionError::Closed);
        }
        self.permits.close();
        // The writer may already be gone if the server hung up first
        let _ = self.outbound.send(Message::Close(None));
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
        if !self.is_closed() {
            self.writer.abort();
        }
    }
}

/// Route one response chunk to its waiting request
fn dispatch(in_flight: &Mutex<InFlight>, payload: &[u8]) {
    let response = match ResponseMessage::from_slice(payload) {
        Ok(response) => response,
        Err(e) => {
            warn!("Discarding unreadable response: {}", e);
            return;
        }
    };
    let request_id = match response.request_id() {
        Ok(id) => id,
        Err(e) => {
            warn!("Discarding response: {}", e);
            return;
        }
    };

    let mut in_flight = lock(in_flight);
    let status = &response.status;

    if !status.is_partial() && !status.is_final_success() {
        if let Some(pending) = in_flight.requests.remove(&request_id) {
            let _ = pending.reply.send(Err(SessionError::Server {
                code: status.code,
                message: status.message.clone(),
            }));
        }
        return;
    }

    let Some(pending) = in_flight.requests.get_mut(&request_id) else {
        debug!("Response for unknown request {}", request_id);
        return;
    };

    match graphson::decode_results(&response.result.data) {
        Ok(items) => pending.results.extend(items),
        Err(e) => {
            if let Some(pending) = in_flight.requests.remove(&request_id) {
                let _ = pending.reply.send(Err(e));
            }
            return;
        }
    }

    if status.is_final_success() {
        if let Some(pending) = in_flight.requests.remove(&request_id) {
            let _ = pending.reply.send(Ok(pending.results));
        }
    }
}

fn fail_outstanding(in_flight: &Mutex<InFlight>) {
    let mut in_flight = lock(in_flight);
    in_flight.lost = true;
    for (_, pending) in in_flight.requests.drain() {
        let _ = pending.reply.send(Err(SessionError::ConnectionLost));
    }
}
