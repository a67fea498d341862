//! Terminal collaborators: where a finished request goes.

use std::fmt;
use std::sync::Arc;

use crate::error::RouteError;

/// Handed to the `on_complete` sink when a handler calls
/// [`Next::complete`](crate::Next::complete).
#[derive(Debug)]
pub struct Completion<S> {
    pub message: Option<String>,
    pub stream: S,
}

/// Handed to the `on_error` sink for every routing or handler failure.
#[derive(Debug)]
pub struct Failure<S> {
    pub error: RouteError,
    pub stream: S,
}

type CompleteFn<S> = dyn Fn(Completion<S>) + Send + Sync + 'static;
type ErrorFn<S> = dyn Fn(Failure<S>) + Send + Sync + 'static;

/// The `on_complete` / `on_error` pair supplied at the top of a dispatch and
/// threaded unchanged through every nesting level.
///
/// Cloning is two reference-count increments.
pub struct Sinks<S> {
    on_complete: Arc<CompleteFn<S>>,
    on_error: Arc<ErrorFn<S>>,
}

impl<S> Sinks<S> {
    pub fn new(
        on_complete: impl Fn(Completion<S>) + Send + Sync + 'static,
        on_error: impl Fn(Failure<S>) + Send + Sync + 'static,
    ) -> Self {
        Self { on_complete: Arc::new(on_complete), on_error: Arc::new(on_error) }
    }

    pub fn complete(&self, message: Option<String>, stream: S) {
        (self.on_complete)(Completion { message, stream })
    }

    pub fn error(&self, error: RouteError, stream: S) {
        (self.on_error)(Failure { error, stream })
    }
}

impl<S> Clone for Sinks<S> {
    fn clone(&self) -> Self {
        Self { on_complete: Arc::clone(&self.on_complete), on_error: Arc::clone(&self.on_error) }
    }
}

impl<S> fmt::Debug for Sinks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks").finish_non_exhaustive()
    }
}
