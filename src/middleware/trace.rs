//! Request logging.

use std::time::Instant;

use tracing::debug;

use super::{Middleware, Next};
use crate::context::Context;
use crate::error::Error;
use crate::handler::BoxFuture;

/// Logs each request as it enters the pipeline, and the time spent in the
/// stages registered after it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn handle<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            let method = ctx.method().clone();
            let path = ctx.pathname().to_owned();
            let started = Instant::now();
            debug!(%method, %path, query = ctx.query_map().len(), "request");

            let result = next.run(ctx).await;

            debug!(
                %method,
                %path,
                elapsed = ?started.elapsed(),
                ok = result.is_ok(),
                "middleware done"
            );
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;
    use http_body_util::Empty;
    use tracing::Level;
    use tracing::instrument::WithSubscriber;

    use super::*;
    use crate::middleware::{Outcome, Pipeline};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap().lines().map(str::to_owned).collect()
        }
    }

    #[tokio::test]
    async fn logs_entry_and_completion() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut pipeline = Pipeline::new();
        pipeline.push(Trace);
        let (mut ctx, _pending) = Context::new(http::Request::get("/shows?x=1").body(Empty::<Bytes>::new()).unwrap());
        let outcome = pipeline.run(&mut ctx).with_subscriber(subscriber).await.unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert!(!ctx.is_finalized());

        let lines = captured.lines();
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert!(lines[0].contains("request"));
        assert!(lines[0].contains("method=GET"));
        assert!(lines[0].contains("path=/shows"));
        assert!(lines[0].contains("query=1"));
        assert!(lines[1].contains("middleware done"));
        assert!(lines[1].contains("elapsed="));
        assert!(lines[1].contains("ok=true"));
    }
}
