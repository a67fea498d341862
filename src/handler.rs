//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! A route's chain holds handlers of *different* closure types side by side,
//! and Rust collections can only hold one concrete type, so each handler is
//! hidden behind a trait object (`dyn ErasedHandler<S>`).
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! fn auth(req: Request<S>, next: Next<S>) { … }   ← user writes this
//!        ↓ router.get("/", chain![auth, …])
//! auth.into_boxed_handler()                        ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(auth))                        ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler<S> = Arc<dyn ErasedHandler<S>>
//! handler.call(req, next)  at request time         ← one vtable dispatch
//! ```
//!
//! A handler does not return its outcome. It resolves the request by
//! consuming its [`Next`] through exactly one of `next`, `complete` or
//! `error`, either right away or later from a spawned task.

use std::sync::Arc;

use crate::chain::Next;
use crate::request::Request;

// ── Internal types ────────────────────────────────────────────────────────────

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler<S> {
    fn call(&self, req: Request<S>, next: Next<S>);
}

/// A type-erased handler shared by every request that reaches its route.
#[doc(hidden)]
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S> + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid chain handler.
///
/// You never implement this yourself. It is satisfied by any function or
/// closure with the signature:
///
/// ```text
/// fn name(req: Request<S>, next: Next<S>)
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it.
pub trait Handler<S>: private::Sealed<S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<S>;
}

mod private {
    pub trait Sealed<S> {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, S> private::Sealed<S> for F
where
    F: Fn(Request<S>, Next<S>) + Send + Sync + 'static,
{
}

impl<F, S> Handler<S> for F
where
    F: Fn(Request<S>, Next<S>) + Send + Sync + 'static,
    S: 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<S> {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, S> ErasedHandler<S> for FnHandler<F>
where
    F: Fn(Request<S>, Next<S>) + Send + Sync,
{
    fn call(&self, req: Request<S>, next: Next<S>) {
        (self.0)(req, next)
    }
}
