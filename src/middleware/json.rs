//! JSON request-body parser.

use bytes::Bytes;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tracing::debug;

use super::{Middleware, Next};
use crate::context::Context;
use crate::error::Error;
use crate::handler::BoxFuture;
use crate::response::APPLICATION_JSON;

/// Parses `application/json` request bodies into [`Context::body`].
///
/// - `content-type` not exactly `application/json`: the body becomes `{}`
///   and the pipeline advances at once. The body stream is left unread.
/// - JSON content type: the whole body is buffered (no size cap), then
///   parsed. Empty input gives `{}`.
/// - Unparsable JSON: responds `400 Invalid JSON` and does not advance.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonBody;

impl Middleware for JsonBody {
    fn handle<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            if ctx.header(CONTENT_TYPE.as_str()) != Some(APPLICATION_JSON) {
                ctx.set_body(Value::Object(Map::new()));
                return next.run(ctx).await;
            }

            let bytes = match ctx.take_body_stream() {
                Some(stream) => stream.collect().await.map_err(Error::Body)?.to_bytes(),
                None => Bytes::new(),
            };

            let parsed = if bytes.is_empty() {
                Ok(Value::Object(Map::new()))
            } else {
                serde_json::from_slice(&bytes)
            };

            match parsed {
                Ok(body) => {
                    ctx.set_body(body);
                    next.run(ctx).await
                }
                Err(e) => {
                    debug!(path = %ctx.pathname(), error = %e, "rejecting malformed JSON body");
                    ctx.status(StatusCode::BAD_REQUEST).send("Invalid JSON")
                }
            }
        })
    }
}
