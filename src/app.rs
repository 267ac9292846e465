//! The application: a route table plus a middleware pipeline.
//!
//! Configure it once, then hand it to [`listen`](App::listen). After that it
//! is shared read-only by every request.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use bytes::Bytes;

use crate::context::Context;
use crate::dispatch;
use crate::error::{BoxError, Error};
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::{Middleware, Pipeline};
use crate::response::HttpResponse;
use crate::router::Router;
use crate::server::Server;

/// Route table and middleware pipeline, owned together.
///
/// ```rust,no_run
/// use ringmaster::{App, BoxFuture, Context, Error};
/// use ringmaster::middleware::JsonBody;
///
/// fn hello<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
///     Box::pin(async move { ctx.send("hello") })
/// }
///
/// # async fn run() -> Result<(), Error> {
/// let mut app = App::new();
/// app.use_middleware(JsonBody);
/// app.get("/", hello)?;
/// app.listen(5001).await
/// # }
/// ```
#[derive(Default)]
pub struct App {
    router: Router,
    pipeline: Pipeline,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage to the pipeline. Stages run in the order added.
    pub fn use_middleware(&mut self, middleware: impl Middleware) -> &mut Self {
        self.pipeline.push(middleware);
        self
    }

    /// Registers `handler` for `method` (one of `GET`, `POST`, `PUT`,
    /// `PATCH`, `DELETE`) and `pattern`.
    pub fn route(&mut self, method: &str, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.router.register(method, pattern, handler)?;
        Ok(self)
    }

    pub fn get(&mut self, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.on(Method::Get, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.on(Method::Post, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.on(Method::Put, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.on(Method::Patch, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.on(Method::Delete, pattern, handler)
    }

    fn on(&mut self, method: Method, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.router.insert(method, pattern, Arc::new(handler))?;
        Ok(self)
    }

    pub fn router(&self) -> &Router { &self.router }
    pub fn pipeline(&self) -> &Pipeline { &self.pipeline }

    /// Runs one request through the pipeline and router.
    ///
    /// Resolves with the response as soon as one is finalized. `None` means
    /// the request finished without any stage or handler responding.
    pub async fn respond<B>(self: Arc<Self>, req: http::Request<B>) -> Option<HttpResponse>
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (ctx, pending) = Context::new(req);
        dispatch::spawn(self, ctx);
        pending.recv().await
    }

    /// Serves on `0.0.0.0:port` until the process exits.
    pub async fn listen(self, port: u16) -> Result<(), Error> {
        self.listen_on(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))).await
    }

    pub async fn listen_on(self, addr: SocketAddr) -> Result<(), Error> {
        Server::bind(addr).await?.serve(self).await
    }
}
