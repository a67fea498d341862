//! Bundled HTTP transport and graceful shutdown.
//!
//! The router itself knows nothing about sockets. This module is one
//! transport for it: hyper accepts HTTP/1.1 and HTTP/2 connections, each
//! request is turned into headers plus an [`HttpStream`], and the
//! [`Dispatcher`] takes it from there.
//!
//! # Graceful shutdown and Kubernetes
//!
//! When Kubernetes terminates a pod it sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` (default 30 s) before sending SIGKILL.
//!
//! The server reacts by:
//! 1. Immediately stopping `listener.accept()`, so no new connections are made.
//! 2. Letting every in-flight connection task run to completion.
//! 3. Returning from [`Server::serve`], which lets `main` exit cleanly.
//!
//! A handler that never resolves its [`Next`](crate::Next) keeps its
//! connection, and therefore the drain, waiting.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Error, ErrorKind};
use crate::router::Router;
use crate::sink::{Completion, Failure, Sinks};
use crate::source::{self, Headers};
use crate::stream::{HttpResponse, HttpStream};

/// The HTTP server.
pub struct Server {
    addr: String,
}

impl Server {
    /// Configures the server to bind to `addr` (`host:port`) when
    /// [`serve`](Server::serve) is called. The address is resolved then.
    ///
    /// ```rust,no_run
    /// use strand::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::bind(config.addr())
    }

    /// Serves `router` with the [`default_sinks`].
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router<HttpStream>) -> Result<(), Error> {
        self.serve_dispatcher(Dispatcher::new(router, default_sinks())).await
    }

    /// Like [`serve`](Server::serve) with caller-supplied sinks.
    pub async fn serve_dispatcher(self, dispatcher: Dispatcher<HttpStream>) -> Result<(), Error> {
        let listener = TcpListener::bind(&self.addr).await?;
        serve_with_shutdown(listener, dispatcher, shutdown_signal()).await
    }
}

/// Accepts connections on `listener` until `shutdown` resolves, then drains
/// in-flight connections and returns.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    dispatcher: Dispatcher<HttpStream>,
    shutdown: impl Future<Output = ()>,
) -> Result<(), Error> {
    let dispatcher = Arc::new(dispatcher);

    info!(addr = %listener.local_addr()?, "strand listening");

    // JoinSet tracks every spawned connection task so we can wait for
    // them all to finish during graceful shutdown.
    let mut tasks = tokio::task::JoinSet::new();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Shutdown is checked first so a signal stops accepting at once,
            // even with connections queued.
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let dispatcher = Arc::clone(&dispatcher);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    // Called once per request on the connection.
                    let svc = service_fn(move |req| {
                        let dispatcher = Arc::clone(&dispatcher);
                        async move { handle(dispatcher, req).await }
                    });

                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the JoinSet does not grow
            // without bound on long-running servers.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}

    info!("strand stopped");
    Ok(())
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Turns one hyper request into a dispatch and waits for the stream to end.
///
/// Every failure becomes a response, so hyper never sees an error.
async fn handle(
    dispatcher: Arc<Dispatcher<HttpStream>>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<HttpResponse, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("failed to read request body: {e}");
            return Ok(status_only(StatusCode::BAD_REQUEST));
        }
    };

    let (stream, response) = HttpStream::new(body);
    dispatcher.dispatch(stream, request_headers(&parts), 0);

    Ok(response.await.unwrap_or_else(|_| {
        warn!(path = %parts.uri, "stream dropped without a response");
        status_only(StatusCode::INTERNAL_SERVER_ERROR)
    }))
}

/// Pseudo-headers first, then the regular headers (already lower-case in
/// `http`). Values that are not valid UTF-8 are skipped.
fn request_headers(parts: &http::request::Parts) -> Headers {
    let mut headers = Headers::new();
    headers.insert(source::METHOD, parts.method.as_str());
    if let Some(path) = parts.uri.path_and_query() {
        headers.insert(source::PATH, path.as_str());
    }
    if let Some(scheme) = parts.uri.scheme_str() {
        headers.insert(source::SCHEME, scheme);
    }
    if let Some(authority) = parts.uri.authority() {
        headers.insert(source::AUTHORITY, authority.as_str());
    }
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str(), value);
        }
    }
    headers
}

fn status_only(status: StatusCode) -> HttpResponse {
    let mut response = http::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

// ── Default sinks ─────────────────────────────────────────────────────────────

/// Status the default error sink answers with for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MissingPath => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ServerError | ErrorKind::Application => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Sinks that end the stream:
///
/// - on completion, with the message as the last bit of body;
/// - on error, with the error message and [`status_for`] the kind. An
///   application error keeps a status the handler already set.
pub fn default_sinks() -> Sinks<HttpStream> {
    Sinks::new(
        |done: Completion<HttpStream>| {
            done.stream.end(done.message.as_deref());
        },
        |failed: Failure<HttpStream>| {
            let kind = failed.error.kind();
            if kind != ErrorKind::Application || failed.stream.status().is_none() {
                failed.stream.respond(status_for(kind));
            }
            failed.stream.end(Some(failed.error.message()));
        },
    )
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C).
/// A signal that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
