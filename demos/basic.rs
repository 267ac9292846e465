//! Minimal ringmaster example: middleware, a parameterized route, JSON bodies.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/widgets/42?verbose=1
//!   curl -X POST http://localhost:3000/widgets \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"sprocket"}'
//!   curl -X POST http://localhost:3000/widgets \
//!        -H 'content-type: application/json' \
//!        -d '{"name":'          # → 400 Invalid JSON

use http::StatusCode;
use ringmaster::middleware::{JsonBody, Next, Trace};
use ringmaster::{App, BoxFuture, Context, Error};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let mut app = App::new();
    app.use_middleware(Trace)
        .use_middleware(JsonBody)
        .use_middleware(powered_by);

    app.get("/widgets/:id", get_widget)?
        .post("/widgets", create_widget)?;

    app.listen(3000).await
}

// Middleware: inspects the request, then advances.
fn powered_by<'a>(ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        if ctx.query("verbose").is_some() {
            tracing::info!(path = %ctx.pathname(), "verbose request");
        }
        next.run(ctx).await
    })
}

// GET /widgets/:id
async fn get_widget_inner(ctx: &mut Context) -> Result<(), Error> {
    let id = ctx.param("id").unwrap_or("unknown").to_owned();
    ctx.json(&json!({ "id": id, "name": "sprocket" }))
}

fn get_widget<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(get_widget_inner(ctx))
}

// POST /widgets → 201
fn create_widget<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        let name = ctx.body().get("name").cloned().unwrap_or_else(|| json!("unnamed"));
        ctx.status(StatusCode::CREATED).json(&json!({ "id": 99, "name": name }))
    })
}
