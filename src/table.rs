//! The route table: an insertion-ordered list of route keys and their chains.
//!
//! Order is load-bearing. The resolver scans front to back and the first
//! structural match wins, so this is a `Vec` of pairs rather than a map.

use std::fmt;
use std::sync::Arc;

use crate::chain::ChainEntry;
use crate::method::Method;

/// A route pattern plus an optional method filter.
///
/// `method: None` matches every method; that is how a router is mounted
/// under a path prefix.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RouteKey {
    pub pattern: String,
    pub method: Option<Method>,
}

impl RouteKey {
    pub fn new(pattern: impl Into<String>, method: Option<Method>) -> Self {
        Self { pattern: pattern.into(), method }
    }

    /// True when the key has no method filter or its filter equals `method`.
    pub fn accepts(&self, method: Option<Method>) -> bool {
        match self.method {
            None => true,
            Some(want) => method == Some(want),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            Some(m) => write!(f, "{m} {}", self.pattern),
            None => write!(f, "* {}", self.pattern),
        }
    }
}

/// One registered route.
pub struct Route<S> {
    pub key: RouteKey,
    pub chain: Arc<[ChainEntry<S>]>,
}

/// Routes in registration order.
pub struct RouteTable<S> {
    routes: Vec<Route<S>>,
}

impl<S> RouteTable<S> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Stores `chain` under `key`.
    ///
    /// An identical key already present has its chain replaced where it
    /// stands, keeping its scan position. Distinct patterns or methods
    /// coexist.
    pub fn insert(&mut self, key: RouteKey, chain: Vec<ChainEntry<S>>) {
        let chain: Arc<[ChainEntry<S>]> = chain.into();
        match self.routes.iter_mut().find(|route| route.key == key) {
            Some(route) => route.chain = chain,
            None => self.routes.push(Route { key, chain }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route<S>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize { self.routes.len() }
    pub fn is_empty(&self) -> bool { self.routes.is_empty() }
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self { Self::new() }
}

impl<S> fmt::Debug for RouteTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter().map(|r| &r.key)).finish()
    }
}
