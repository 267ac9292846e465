//! TCP listener and connection handling.
//!
//! One tokio task per accepted connection; hyper drives the HTTP protocol
//! on it. Each request on a connection gets its own [`Context`] and its own
//! dispatcher task. There is no shutdown path: the server runs until the
//! process exits, and a client that disconnects mid-request does not stop
//! the handler working on it.
//!
//! [`Context`]: crate::Context

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::app::App;
use crate::error::Error;
use crate::response::HttpResponse;

/// The HTTP server.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Binds a TCP listener on `addr`.
    pub async fn bind(addr: SocketAddr) -> Result<Self, Error> {
        Ok(Self { listener: TcpListener::bind(addr).await? })
    }

    /// Serves on an already bound listener.
    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listener }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections and dispatches their requests through `app`.
    ///
    /// Only returns if the listening address cannot be read back.
    pub async fn serve(self, app: App) -> Result<(), Error> {
        // Shared read-only across every connection task from here on.
        let app = Arc::new(app);

        info!(addr = %self.local_addr()?, "ringmaster listening");

        loop {
            let (stream, remote_addr) = match self.listener.accept().await {
                Ok(v) => v,
                Err(e) => {
                    error!("accept error: {e}");
                    continue;
                }
            };

            let app = Arc::clone(&app);
            let io = TokioIo::new(stream);

            tokio::spawn(async move {
                // Called once per request on the connection.
                let svc = service_fn(move |req| respond(Arc::clone(&app), req));

                if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                    .serve_connection(io, svc)
                    .await
                {
                    error!(peer = %remote_addr, "connection error: {e}");
                }
            });
        }
    }
}

/// The error type is [`Infallible`]: every failure is turned into a response
/// (404, 400, 500) before hyper sees it.
async fn respond(app: Arc<App>, req: hyper::Request<Incoming>) -> Result<HttpResponse, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match app.respond(req).await {
        Some(response) => Ok(response),
        None => {
            // A handler or middleware returned without answering. The
            // client waits until it gives up.
            warn!(%method, %path, "request finished without a response; leaving it open");
            std::future::pending().await
        }
    }
}
