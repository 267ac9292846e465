//! The per-request context.
//!
//! One fixed-shape struct carries everything a request accumulates on its
//! way through the framework: URL state from parsing, the body from
//! middleware, path parameters from routing, and the response-writing state
//! the handler drives. Each stage fills in its part; nothing is attached at
//! runtime.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{BoxError, Error};
use crate::request::{self, RequestBody};
use crate::response::{self, APPLICATION_JSON, Finalizer, Payload, PendingResponse};

/// Request state plus the response helpers for one request.
pub struct Context {
    method: http::Method,
    pathname: String,
    query: HashMap<String, String>,
    pub(crate) params: HashMap<String, String>,
    headers: HeaderMap,
    body: Value,
    stream: Option<RequestBody>,
    status: StatusCode,
    finalizer: Option<Finalizer>,
    pub(crate) pipeline_complete: bool,
}

impl Context {
    /// Builds a context from a raw request.
    ///
    /// Returns the context together with the handle that resolves once the
    /// response is finalized.
    pub fn new<B>(req: http::Request<B>) -> (Self, PendingResponse)
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let (pathname, query) = request::parse_target(&parts.uri);
        let (finalizer, pending) = response::channel();
        let ctx = Self {
            method: parts.method,
            pathname,
            query,
            params: HashMap::new(),
            headers: parts.headers,
            body: Value::Object(Map::new()),
            stream: Some(request::boxed(body)),
            status: StatusCode::OK,
            finalizer: Some(finalizer),
            pipeline_complete: false,
        };
        (ctx, pending)
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn pathname(&self) -> &str { &self.pathname }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn params(&self) -> &HashMap<String, String> { &self.params }
    pub fn query_map(&self) -> &HashMap<String, String> { &self.query }

    /// A decoded query parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/artists/:id`, `ctx.param("id")` on `/artists/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Case-insensitive header lookup. Values that are not visible ASCII
    /// read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The parsed request body. `{}` until a body middleware replaces it.
    pub fn body(&self) -> &Value { &self.body }

    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    /// Takes the raw body stream. `None` once something has claimed it.
    pub fn take_body_stream(&mut self) -> Option<RequestBody> {
        self.stream.take()
    }

    // ── Response side ─────────────────────────────────────────────────────────

    /// Sets the status used on finalization. Chainable.
    pub fn status(&mut self, code: StatusCode) -> &mut Self {
        self.status = code;
        self
    }

    pub fn status_code(&self) -> StatusCode { self.status }

    pub fn is_finalized(&self) -> bool {
        self.finalizer.is_none()
    }

    /// Finalizes with `value`: JSON for structured values, verbatim otherwise.
    pub fn send(&mut self, value: impl Into<Payload>) -> Result<(), Error> {
        match value.into() {
            Payload::Raw(bytes) => self.finalize(None, bytes),
            Payload::Json(v) => self.json(&v),
        }
    }

    /// Finalizes with `value` serialized as JSON, whatever its shape.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let text = serde_json::to_vec(value)?;
        self.finalize(Some(APPLICATION_JSON), Bytes::from(text))
    }

    fn finalize(&mut self, content_type: Option<&'static str>, body: Bytes) -> Result<(), Error> {
        let Some(finalizer) = self.finalizer.take() else {
            warn!(method = %self.method, path = %self.pathname, "response already finalized; dropping second write");
            return Err(Error::AlreadyFinalized);
        };
        finalizer.finish(response::build(self.status, content_type, body));
        Ok(())
    }
}
