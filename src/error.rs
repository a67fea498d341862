//! Error types.
//!
//! Two families live here:
//!
//! - [`RouteError`] travels to the `on_error` sink. Its [`ErrorKind`] is a
//!   closed classification so the sink can branch (e.g. map `NotFound` to a
//!   404) while the payload stays opaque.
//! - [`Error`] surfaces infrastructure failures of the bundled server:
//!   bad configuration, binding to an address, accepting a connection.

use std::borrow::Cow;
use std::fmt;

/// Boxed, thread-safe error payload.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a routing failure.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The inbound request carried no `:path`.
    MissingPath,
    /// Malformed routing input (empty path, no leading `/`) or a chain that
    /// ran out of entries. A bug in the integration, not in the client.
    ServerError,
    /// No route matched the path and method.
    NotFound,
    /// Raised by a handler through [`Next::error`](crate::Next::error).
    Application,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingPath => "MissingPath",
            Self::ServerError => "ServerError",
            Self::NotFound    => "NotFound",
            Self::Application => "ApplicationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure delivered to the `on_error` sink.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RouteError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxError>,
}

impl RouteError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, message: message.into(), source: None }
    }

    pub(crate) fn missing_path() -> Self {
        Self::new(ErrorKind::MissingPath, ":path missing")
    }

    pub(crate) fn not_found() -> Self {
        Self::new(ErrorKind::NotFound, "Not found")
    }

    pub(crate) fn malformed_path(path: &str) -> Self {
        Self::new(ErrorKind::ServerError, format!("malformed routing path `{path}`"))
    }

    pub(crate) fn chain_exhausted() -> Self {
        Self::new(ErrorKind::ServerError, "handler chain exhausted")
    }

    /// Wraps a handler-raised error.
    ///
    /// A `RouteError` passed in (boxed) keeps its own kind; anything else is
    /// classified as [`ErrorKind::Application`].
    pub fn application(err: impl Into<BoxError>) -> Self {
        match err.into().downcast::<RouteError>() {
            Ok(route) => *route,
            Err(other) => Self {
                kind: ErrorKind::Application,
                message: other.to_string().into(),
                source: Some(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind { self.kind }
    pub fn message(&self) -> &str { &self.message }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// The error type returned by the bundled server.
///
/// Routing failures never show up here; they go to the `on_error` sink as
/// [`RouteError`]s.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] clap::Error),
}
