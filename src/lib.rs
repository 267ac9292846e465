//! # ringmaster
//!
//! A small HTTP application framework, and the JSON-file CRUD service for
//! a performing company's artists and shows that runs on it.
//!
//! ## The framework
//!
//! - **Routing**: ordered per-method route lists, `:name` path parameters,
//!   first registration wins
//! - **Middleware**: a sequential pipeline; each stage advances explicitly
//!   through [`Next`](middleware::Next)
//! - **Context**: one fixed-shape struct per request carrying URL state,
//!   params, body, and the single-shot response helpers
//! - **Dispatch**: 404 for unmatched requests, and one central place where
//!   failures become a logged `500`
//!
//! What it leaves out: authentication, body-size limits, TLS, graceful
//! shutdown, request cancellation.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ringmaster::{App, BoxFuture, Context, Error};
//! use ringmaster::middleware::JsonBody;
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let mut app = App::new();
//!     app.use_middleware(JsonBody);
//!     app.get("/widgets/:id", get_widget)?
//!         .post("/widgets", create_widget)?;
//!
//!     app.listen(5001).await
//! }
//!
//! fn get_widget<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
//!     Box::pin(async move {
//!         let id = ctx.param("id").unwrap_or_default().to_owned();
//!         ctx.json(&serde_json::json!({ "id": id }))
//!     })
//! }
//!
//! fn create_widget<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
//!     Box::pin(async move {
//!         let name = ctx.body()["name"].clone();
//!         ctx.status(StatusCode::CREATED).json(&serde_json::json!({ "id": 1, "name": name }))
//!     })
//! }
//! ```

mod app;
mod context;
mod dispatch;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod middleware;
pub mod resources;
pub mod store;

pub use app::App;
pub use config::Config;
pub use context::Context;
pub use error::{BoxError, Error};
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use method::Method;
pub use request::RequestBody;
pub use response::{APPLICATION_JSON, HttpResponse, Payload, PendingResponse};
pub use router::{Route, RouteMatch, Router};
pub use server::Server;
pub use store::{JsonStore, Record};
