//! Built-in Kubernetes health-check handlers.
//!
//! | Probe | Question |
//! |---|---|
//! | **Liveness** | Is the process alive? Failure → restart. |
//! | **Readiness** | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Register them like any other chain entry:
//!
//! ```rust,no_run
//! use strand::{chain, health, HttpStream, Router};
//!
//! let app: Router<HttpStream> = Router::new()
//!     .get("/healthz", chain![health::liveness::<HttpStream>])
//!     .get("/readyz", chain![health::readiness::<HttpStream>]);
//! ```
//!
//! Replace `readiness` with your own handler if traffic must wait on
//! dependencies (database connections, downstream services, etc.).

use crate::{Next, Request};

/// Always completes with `"ok"`. If the router can run a handler at all,
/// the process is alive.
pub fn liveness<S>(_req: Request<S>, next: Next<S>)
where
    S: Clone + Send + Sync + 'static,
{
    next.complete_with("ok")
}

/// Completes with `"ready"`.
pub fn readiness<S>(_req: Request<S>, next: Next<S>)
where
    S: Clone + Send + Sync + 'static,
{
    next.complete_with("ready")
}
