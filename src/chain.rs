//! Handler chains and their execution.
//!
//! A matched route owns an ordered chain of [`ChainEntry`] values. Execution
//! walks it front to back:
//!
//! - a **handler** is called with the request and a [`Next`]; the chain only
//!   moves on if the handler calls [`Next::next`];
//! - a **router** takes over immediately with the residual path. This is
//!   terminal for the current level: entries after a router never run.
//!
//! Everything is plain synchronous recursion. A handler that wants to do
//! async work first moves its `Next` into a task and resolves it later.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::{BoxError, RouteError};
use crate::handler::{BoxedHandler, Handler};
use crate::path::Params;
use crate::query::QueryParams;
use crate::request::Request;
use crate::router::Router;
use crate::sink::Sinks;
use crate::source::Source;

/// One member of a route's chain.
pub enum ChainEntry<S> {
    Handler(BoxedHandler<S>),
    Router(Arc<Router<S>>),
}

impl<S: 'static> ChainEntry<S> {
    /// Wraps a handler function or closure.
    pub fn handler(f: impl Fn(Request<S>, Next<S>) + Send + Sync + 'static) -> Self {
        Self::Handler(f.into_boxed_handler())
    }

    /// Wraps a nested router.
    pub fn router(router: Router<S>) -> Self {
        Self::Router(Arc::new(router))
    }
}

impl<S> Clone for ChainEntry<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Handler(h) => Self::Handler(Arc::clone(h)),
            Self::Router(r) => Self::Router(Arc::clone(r)),
        }
    }
}

impl<S> fmt::Debug for ChainEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler"),
            Self::Router(r) => f.debug_tuple("Router").field(r).finish(),
        }
    }
}

impl<S> From<Router<S>> for ChainEntry<S> {
    fn from(router: Router<S>) -> Self {
        Self::Router(Arc::new(router))
    }
}

impl<S> From<Arc<Router<S>>> for ChainEntry<S> {
    fn from(router: Arc<Router<S>>) -> Self {
        Self::Router(router)
    }
}

/// Anything that can sit in a chain: handlers, routers, or ready-made
/// entries. Used by [`chain!`](crate::chain!).
pub trait IntoChainEntry<S> {
    fn into_chain_entry(self) -> ChainEntry<S>;
}

impl<S> IntoChainEntry<S> for ChainEntry<S> {
    fn into_chain_entry(self) -> ChainEntry<S> { self }
}

impl<S> IntoChainEntry<S> for Router<S> {
    fn into_chain_entry(self) -> ChainEntry<S> { ChainEntry::from(self) }
}

impl<F, S> IntoChainEntry<S> for F
where
    F: Fn(Request<S>, Next<S>) + Send + Sync + 'static,
    S: 'static,
{
    fn into_chain_entry(self) -> ChainEntry<S> {
        ChainEntry::Handler(self.into_boxed_handler())
    }
}

/// Builds a `Vec<ChainEntry<S>>` from handlers and routers, in order.
///
/// ```rust
/// use strand::{chain, Next, Request, Router};
///
/// fn auth(_req: Request<()>, next: Next<()>) { next.next() }
/// fn list(_req: Request<()>, next: Next<()>) { next.complete_with("users") }
///
/// let users = Router::new().get("/", chain![auth, list]);
/// let app = Router::new().mount("/users", chain![auth, users]);
/// # let _ = app;
/// ```
#[macro_export]
macro_rules! chain {
    ($($entry:expr),* $(,)?) => {
        vec![$($crate::IntoChainEntry::into_chain_entry($entry)),*]
    };
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// Per-request state carried from one chain step to the next.
pub(crate) struct Frame<S> {
    pub(crate) source: Arc<Source<S>>,
    pub(crate) params: Params,
    pub(crate) query: Option<Arc<QueryParams>>,
    pub(crate) residual: Arc<str>,
    pub(crate) sinks: Sinks<S>,
}

/// Runs `chain` starting at `index`.
pub(crate) fn run<S>(chain: Arc<[ChainEntry<S>]>, index: usize, frame: Frame<S>)
where
    S: Clone + Send + Sync + 'static,
{
    let Some(entry) = chain.get(index).cloned() else {
        warn!(residual = %frame.residual, "next() called with no chain entries left");
        let stream = frame.source.stream.clone();
        frame.sinks.error(RouteError::chain_exhausted(), stream);
        return;
    };

    match entry {
        ChainEntry::Router(router) => {
            let Frame { source, params, query, residual, sinks } = frame;
            router.process_inner(&residual, params, query, source, sinks);
        }
        ChainEntry::Handler(handler) => {
            let req = Request::new(Arc::clone(&frame.source), frame.params.clone(), frame.query.clone());
            handler.call(req, Next { chain, index: index + 1, frame });
        }
    }
}

/// The continuations handed to a handler.
///
/// Exactly one of [`next`](Next::next), [`complete`](Next::complete),
/// [`complete_with`](Next::complete_with) or [`error`](Next::error) should
/// be called; each consumes `self`. Dropping a `Next` without calling any
/// of them leaves the request unresolved as far as the router is concerned.
///
/// `Next` is `Send + 'static`: move it into a spawned task to finish the
/// request after asynchronous work.
pub struct Next<S> {
    chain: Arc<[ChainEntry<S>]>,
    index: usize,
    frame: Frame<S>,
}

impl<S> Next<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Hands the request to the following chain entry.
    ///
    /// With no entry left the request fails with a
    /// [`ServerError`](crate::ErrorKind::ServerError) rather than hanging.
    pub fn next(self) {
        run(self.chain, self.index, self.frame)
    }

    /// Finishes the request successfully without a message.
    pub fn complete(self) {
        self.finish(None)
    }

    /// Finishes the request successfully with a final message.
    pub fn complete_with(self, message: impl Into<String>) {
        self.finish(Some(message.into()))
    }

    /// Finishes the request with an error.
    ///
    /// A [`RouteError`] keeps its kind; any other error is reported as
    /// [`Application`](crate::ErrorKind::Application).
    pub fn error(self, err: impl Into<BoxError>) {
        let stream = self.frame.source.stream.clone();
        self.frame.sinks.error(RouteError::application(err), stream);
    }

    fn finish(self, message: Option<String>) {
        let stream = self.frame.source.stream.clone();
        self.frame.sinks.complete(message, stream);
    }
}

impl<S> Next<S> {
    /// Number of chain entries after the current handler at this level.
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.index)
    }
}
