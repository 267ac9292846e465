//! Outgoing response plumbing.
//!
//! A response is produced exactly once per request. The [`Context`] holds
//! the sending half of a oneshot channel; the connection task awaits the
//! receiving half ([`PendingResponse`]). Sending early lets a handler
//! finish its own work after the client already has its answer.
//!
//! [`Context`]: crate::Context

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use http_body_util::Full;
use serde_json::Value;
use tokio::sync::oneshot;

/// The response type handed to hyper.
pub type HttpResponse = http::Response<Full<Bytes>>;

/// The JSON media type. Also the exact `content-type` string the JSON body
/// parser accepts.
pub const APPLICATION_JSON: &str = "application/json";

// ── Payload ───────────────────────────────────────────────────────────────────

/// What [`Context::send`](crate::Context::send) writes.
///
/// Structured values (objects, arrays, `null`) become JSON text with an
/// `application/json` content type. Everything else goes out verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Raw(Bytes),
    Json(Value),
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self { Self::Raw(Bytes::copy_from_slice(s.as_bytes())) }
}

impl From<String> for Payload {
    fn from(s: String) -> Self { Self::Raw(Bytes::from(s)) }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self { Self::Raw(Bytes::from(b)) }
}

impl From<Bytes> for Payload {
    fn from(b: Bytes) -> Self { Self::Raw(b) }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Self::from(s),
            Value::Bool(_) | Value::Number(_) => Self::from(v.to_string()),
            composite => Self::Json(composite),
        }
    }
}

// ── Finalizer / PendingResponse ───────────────────────────────────────────────

/// Sending half: owned by the context, consumed on finalization.
#[derive(Debug)]
pub(crate) struct Finalizer(oneshot::Sender<HttpResponse>);

impl Finalizer {
    /// Hands the response to the connection. A closed receiver means the
    /// client is gone; there is nobody left to tell.
    pub(crate) fn finish(self, response: HttpResponse) {
        let _ = self.0.send(response);
    }
}

/// Receiving half: awaited by whoever serves the connection.
#[derive(Debug)]
pub struct PendingResponse(oneshot::Receiver<HttpResponse>);

impl PendingResponse {
    /// Resolves with the finalized response, or `None` if the request's
    /// context was dropped without ever being finalized.
    pub async fn recv(self) -> Option<HttpResponse> {
        self.0.await.ok()
    }
}

pub(crate) fn channel() -> (Finalizer, PendingResponse) {
    let (tx, rx) = oneshot::channel();
    (Finalizer(tx), PendingResponse(rx))
}

/// Assembles a finished response.
pub(crate) fn build(status: StatusCode, content_type: Option<&'static str>, body: Bytes) -> HttpResponse {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    if let Some(ct) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(ct));
    }
    response
}
