//! Composable request router.
//!
//! A router is a route table plus registration sugar. Routes are scanned in
//! registration order; the first pattern that structurally matches the path
//! (and whose method filter, if any, accepts the request) wins. No radix
//! tree, no specificity ranking.
//!
//! A router is itself a valid chain entry, so routers nest to any depth:
//! the parent matches a prefix, and the child resolves whatever is left.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::chain::{self, ChainEntry, Frame};
use crate::method::Method;
use crate::path::Params;
use crate::query::QueryParams;
use crate::resolve::resolve;
use crate::sink::Sinks;
use crate::source::Source;
use crate::table::{RouteKey, RouteTable};

/// The application router.
///
/// Build it once at startup and treat it as read-only afterwards; it is
/// shared by every in-flight request. Each registration call returns `self`
/// so registrations chain naturally.
///
/// ```rust
/// use strand::{chain, Next, Request, Router};
///
/// fn get_user(req: Request<()>, next: Next<()>) {
///     let id = req.param("id").unwrap_or("unknown").to_owned();
///     next.complete_with(id)
/// }
///
/// let users = Router::new().get("/{id}", chain![get_user]);
/// let app = Router::new().mount("/users", chain![users]);
/// # let _ = app;
/// ```
pub struct Router<S> {
    table: RouteTable<S>,
}

impl<S> Router<S> {
    pub fn new() -> Self {
        Self { table: RouteTable::new() }
    }

    /// Registers `chain` under `pattern` for one method. Returns `self` for
    /// chaining.
    ///
    /// Registering the same pattern and method again replaces the earlier
    /// chain.
    pub fn on(self, method: Method, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.add(Some(method), pattern, chain)
    }

    /// Registers `chain` under `pattern` for every method.
    ///
    /// The usual way to nest a router: `mount("/users", chain![users])`
    /// sends `/users/42` to `users` as `/42`.
    pub fn mount(self, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.add(None, pattern, chain)
    }

    pub fn get(self, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.on(Method::Get, pattern, chain)
    }

    pub fn post(self, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.on(Method::Post, pattern, chain)
    }

    pub fn put(self, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.on(Method::Put, pattern, chain)
    }

    pub fn patch(self, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.on(Method::Patch, pattern, chain)
    }

    pub fn delete(self, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.on(Method::Delete, pattern, chain)
    }

    fn add(mut self, method: Option<Method>, pattern: &str, chain: Vec<ChainEntry<S>>) -> Self {
        self.table.insert(RouteKey::new(pattern, method), chain);
        self
    }

    pub fn table(&self) -> &RouteTable<S> {
        &self.table
    }
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Resolves `current_path` against this router and runs the matched
    /// chain.
    ///
    /// `params` are the bindings inherited from outer levels; the ones bound
    /// here are merged on top. Every outcome, including "no route" and
    /// malformed input, is reported through `sinks`.
    pub fn process(&self, current_path: &str, params: Params, sinks: &Sinks<S>, source: Arc<Source<S>>) {
        self.process_inner(current_path, params, None, source, sinks.clone());
    }

    pub(crate) fn process_inner(
        &self,
        current_path: &str,
        mut params: Params,
        query: Option<Arc<QueryParams>>,
        source: Arc<Source<S>>,
        sinks: Sinks<S>,
    ) {
        let method = source.method();

        let resolution = match resolve(current_path, &self.table, method) {
            Ok(resolution) => resolution,
            Err(err) => {
                debug!(path = current_path, kind = %err.kind(), "route resolution failed");
                let stream = source.stream.clone();
                sinks.error(err, stream);
                return;
            }
        };

        debug!(
            path = current_path,
            route = %resolution.route.key,
            residual = %resolution.residual,
            "route resolved"
        );

        params.extend(resolution.params);
        let query = resolution.query.map(Arc::new).or(query);
        let frame = Frame {
            source,
            params,
            query,
            residual: Arc::from(resolution.residual),
            sinks,
        };

        chain::run(Arc::clone(&resolution.route.chain), 0, frame);
    }
}

impl<S> Default for Router<S> {
    fn default() -> Self { Self::new() }
}

impl<S> fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.table).finish()
    }
}
