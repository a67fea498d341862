//! # strand
//!
//! A request router for stream-oriented servers: a path and a method go in,
//! an ordered chain of handlers runs.
//!
//! ## The model
//!
//! - **Routes** are `{param}` patterns, optionally filtered by method, kept in
//!   registration order. The first route whose pattern matches the head of
//!   the path wins. There is no specificity ranking.
//! - **Chains** are what a route maps to: handlers and nested routers. A
//!   handler passes control on with `next`, or ends the request with
//!   `complete` / `error`. A router takes whatever is left of the path and
//!   resolves it again, so routers nest to any depth.
//! - **Parameters** bound at each level accumulate on the way down; the
//!   query string is parsed once and travels with the request.
//! - **Sinks** receive every outcome: one `on_complete`, one `on_error`,
//!   supplied once at the top and threaded through every level.
//!
//! The router never writes to the stream itself. That is the job of the
//! handlers and the sinks. A small hyper-based [`Server`] is bundled as one
//! transport; anything that can produce a stream handle and a `:path` /
//! `:method` header pair can drive a [`Dispatcher`] directly.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use strand::{chain, HttpStream, Next, Request, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let users = Router::new()
//!         .get("/{id}", chain![get_user]);
//!
//!     let app = Router::new()
//!         .mount("/users", chain![auth, users]);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! fn auth(req: Request<HttpStream>, next: Next<HttpStream>) {
//!     match req.header("authorization") {
//!         Some(_) => next.next(),
//!         None => next.error("missing credentials"),
//!     }
//! }
//!
//! fn get_user(req: Request<HttpStream>, next: Next<HttpStream>) {
//!     let id = req.param("id").unwrap_or("unknown");
//!     req.stream().write(format!(r#"{{"id":"{id}"}}"#));
//!     next.complete()
//! }
//! ```

mod chain;
mod config;
mod dispatch;
mod error;
mod handler;
mod method;
mod query;
mod request;
mod resolve;
mod router;
mod server;
mod sink;
mod source;
mod stream;
mod table;

pub mod health;
pub mod path;

pub use chain::{ChainEntry, IntoChainEntry, Next};
pub use config::ServerConfig;
pub use dispatch::Dispatcher;
pub use error::{BoxError, Error, ErrorKind, RouteError};
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use path::Params;
pub use query::QueryParams;
pub use request::Request;
pub use resolve::{Resolution, resolve};
pub use router::Router;
pub use server::{Server, default_sinks, serve_with_shutdown, status_for};
pub use sink::{Completion, Failure, Sinks};
pub use source::{Headers, Source};
pub use stream::HttpStream;
pub use table::{Route, RouteKey, RouteTable};

/// Names of the pseudo-headers a transport must supply.
pub mod headers {
    pub use crate::source::{AUTHORITY, METHOD, PATH, SCHEME};
}
