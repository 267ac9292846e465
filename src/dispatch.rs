//! Per-request orchestration.
//!
//! ```text
//! Created ─▶ MiddlewareRunning ─▶ Routing ─▶ HandlerRunning ─▶ Finalized
//!                 │                  │              │
//!                 └──────────────────┴──────────────┴─▶ ErrorFinalizing
//! ```
//!
//! Every failure from a middleware or handler lands in one place,
//! [`fail`], which logs it and answers `500` unless something already
//! answered. No detail of the failure reaches the client.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use http::StatusCode;
use tracing::{debug, error, warn};

use crate::app::App;
use crate::context::Context;
use crate::error::Error;
use crate::method::Method;
use crate::middleware::Outcome;
use crate::router::RouteMatch;

/// Drives one request from a fresh context to its final response.
pub(crate) async fn dispatch(app: &App, ctx: &mut Context) {
    match app.pipeline().run(ctx).await {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Halted) => {
            if !ctx.is_finalized() {
                warn!(method = %ctx.method(), path = %ctx.pathname(), "middleware stopped the pipeline without responding");
            }
            return;
        }
        Err(e) => return fail(ctx, &e),
    }

    let found = Method::from_http(ctx.method())
        .and_then(|method| app.router().find(method, ctx.pathname()));

    let Some(RouteMatch { handler, params }) = found else {
        debug!(method = %ctx.method(), path = %ctx.pathname(), "no route");
        let _ = ctx.status(StatusCode::NOT_FOUND).send("Not Found");
        return;
    };

    ctx.params = params;
    match handler.call(ctx).await {
        Ok(()) if !ctx.is_finalized() => {
            warn!(method = %ctx.method(), path = %ctx.pathname(), "handler returned without responding");
        }
        Ok(()) => {}
        Err(e) => fail(ctx, &e),
    }
}

/// Runs [`dispatch`] on its own task, which owns the context.
///
/// The caller waits on the context's pending response, so a handler may
/// keep working after it has answered. A panic in a middleware or handler
/// is treated like any other failure.
pub(crate) fn spawn(app: Arc<App>, mut ctx: Context) {
    tokio::spawn(async move {
        if AssertUnwindSafe(dispatch(&app, &mut ctx)).catch_unwind().await.is_err() {
            fail(&mut ctx, &Error::handler("handler panicked"));
        }
    });
}

fn fail(ctx: &mut Context, err: &Error) {
    error!(
        method = %ctx.method(),
        path = %ctx.pathname(),
        error = %err,
        cause = %cause_chain(err),
        "unhandled failure"
    );
    if !ctx.is_finalized() {
        let _ = ctx.status(StatusCode::INTERNAL_SERVER_ERROR).send("Internal Server Error");
    }
}

fn cause_chain(err: &Error) -> String {
    let mut chain = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    if chain.is_empty() {
        "-".to_owned()
    } else {
        chain.join(": ")
    }
}
