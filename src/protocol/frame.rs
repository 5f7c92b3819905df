//! Request framing
//!
//! Requests travel as binary WebSocket messages laid out as
//! `[mime length: u8][mime type][payload]`, which lets the server pick a
//! deserializer before reading the payload. Responses are plain payloads.

use crate::driver::{SessionError, SessionResult};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// A decoded request frame
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFrame {
    pub mime_type: String,
    pub payload: Bytes,
}

/// Encode a payload behind its MIME type header
pub fn encode(mime_type: &str, payload: &[u8]) -> SessionResult<Bytes> {
    let mime = mime_type.as_bytes();
    let len = u8::try_from(mime.len())
        .map_err(|_| SessionError::Protocol(format!("MIME type too long: {}", mime_type)))?;

    let mut buf = BytesMut::with_capacity(1 + mime.len() + payload.len());
    buf.put_u8(len);
    buf.put_slice(mime);
    buf.put_slice(payload);
    Ok(buf.freeze())
}

/// Split a request frame into MIME type and payload
pub fn decode(mut frame: Bytes) -> SessionResult<RequestFrame> {
    if !frame.has_remaining() {
        return Err(SessionError::Protocol("Empty request frame".to_string()));
    }

    let len = frame.get_u8() as usize;
    if frame.remaining() < len {
        return Err(SessionError::Protocol(format!(
            "Truncated MIME header: expected {} bytes, found {}",
            len,
            frame.remaining()
        )));
    }

    let mime = frame.split_to(len);
    let mime_type = String::from_utf8(mime.to_vec())
        .map_err(|e| SessionError::Protocol(format!("Invalid MIME type: {}", e)))?;

    Ok(RequestFrame {
        mime_type,
        payload: frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let frame = encode("a/b", b"{}").unwrap();
        assert_eq!(&frame[..], b"\x03a/b{}");
    }

    #[test]
    fn test_decode() {
        let frame = encode("application/vnd.gremlin-v3.0+json", b"{\"op\":\"eval\"}").unwrap();
        let decoded = decode(frame).unwrap();
        assert_eq!(decoded.mime_type, "application/vnd.gremlin-v3.0+json");
        assert_eq!(&decoded.payload[..], b"{\"op\":\"eval\"}");
    }

    #[test]
    fn test_decode_truncated() {
        let result = decode(Bytes::from_static(b"\x10abc"));
        assert!(matches!(result, Err(SessionError::Protocol(_))));

        let result = decode(Bytes::new());
        assert!(matches!(result, Err(SessionError::Protocol(_))));
    }

    #[test]
    fn test_mime_too_long() {
        let mime = "x".repeat(256);
        assert!(encode(&mime, b"").is_err());
    }
}
