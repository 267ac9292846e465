//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The route table holds handlers of *different* types in one
//! `Vec<Route>` per method, so every handler is stored behind a trait
//! object: `Arc<dyn Handler>`.
//!
//! A handler borrows the request's [`Context`] mutably for the duration of
//! its future, which is why the signature spells the lifetime out:
//!
//! ```text
//! fn show<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
//!     Box::pin(async move { ctx.json(&serde_json::json!({"ok": true})) })
//! }
//!        ↓ app.get("/", show)
//! Arc::new(show)                  ← stored as BoxedHandler
//!        ↓
//! handler.call(&mut ctx).await    ← one vtable dispatch per request
//! ```
//!
//! Any plain `fn` with that shape is a handler. Types that carry state
//! (a store, a counter) implement [`Handler`] directly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;

/// A heap-allocated, type-erased future borrowing the request context.
///
/// `Send` lets tokio move the request task across worker threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A route handler.
///
/// The handler is responsible for finalizing the response through
/// [`Context::send`] or [`Context::json`]. Returning `Err` hands the failure
/// to the dispatcher, which logs it and answers `500` unless a response was
/// already sent.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>>;
}

/// Every `fn(&mut Context) -> BoxFuture<Result<(), Error>>` is a handler.
impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<(), Error>> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
        (self)(ctx)
    }
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;
