//! Middleware layer.
//!
//! Middleware runs before routing and is the place for cross-cutting
//! concerns: body parsing, request logging, header inspection. Stages run
//! one at a time in registration order. Each stage receives the context and
//! a [`Next`] continuation; calling [`Next::run`] advances to the following
//! stage. A stage that returns without calling it stops the pipeline there,
//! typically because it already sent a response of its own.
//!
//! Built-in middleware:
//! - [`JsonBody`] parses `application/json` request bodies
//! - [`Trace`] logs one event per request with method and path

mod json;
mod trace;

use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;
use crate::handler::BoxFuture;

pub use json::JsonBody;
pub use trace::Trace;

/// A request-processing stage.
///
/// Implementations must not try to recover from an `Err` returned by
/// `next.run`: the failure belongs to the dispatcher.
pub trait Middleware: Send + Sync + 'static {
    fn handle<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Result<(), Error>>;
}

/// Every `fn(&mut Context, Next) -> BoxFuture<Result<(), Error>>` is a middleware.
impl<F> Middleware for F
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), Error>> + Send + Sync + 'static,
{
    fn handle<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Result<(), Error>> {
        (self)(ctx, next)
    }
}

/// Continuation to the rest of the pipeline.
///
/// Consumed by [`run`](Next::run), so a stage can advance at most once.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Middleware>],
}

impl Next<'_> {
    /// Runs the remaining stages. Past the last stage this marks the
    /// pipeline as complete and returns immediately.
    pub async fn run(self, ctx: &mut Context) -> Result<(), Error> {
        match self.rest.split_first() {
            Some((stage, rest)) => stage.handle(ctx, Next { rest }).await,
            None => {
                ctx.pipeline_complete = true;
                Ok(())
            }
        }
    }
}

/// How a pipeline run ended, when it did not fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Every stage advanced; the request moves on to routing.
    Completed,
    /// A stage returned without advancing.
    Halted,
}

/// The ordered middleware stages. Built during configuration, read-only
/// once the server is listening.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: impl Middleware) {
        self.stages.push(Arc::new(middleware));
    }

    pub fn len(&self) -> usize { self.stages.len() }
    pub fn is_empty(&self) -> bool { self.stages.is_empty() }

    /// Runs every stage in order over `ctx`.
    pub async fn run(&self, ctx: &mut Context) -> Result<Outcome, Error> {
        ctx.pipeline_complete = false;
        Next { rest: &self.stages }.run(ctx).await?;
        Ok(if ctx.pipeline_complete { Outcome::Completed } else { Outcome::Halted })
    }
}
