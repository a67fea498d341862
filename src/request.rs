//! What a handler sees of the incoming request.

use std::sync::Arc;

use crate::path::Params;
use crate::query::QueryParams;
use crate::source::{Headers, Source};

/// One step's view of the request: the shared [`Source`], the path
/// parameters bound so far, and the query string if the path had one.
pub struct Request<S> {
    pub(crate) source: Arc<Source<S>>,
    pub(crate) params: Params,
    pub(crate) query: Option<Arc<QueryParams>>,
}

impl<S> Request<S> {
    pub(crate) fn new(
        source: Arc<Source<S>>,
        params: Params,
        query: Option<Arc<QueryParams>>,
    ) -> Self {
        Self { source, params, query }
    }

    pub fn source(&self) -> &Source<S> { &self.source }
    pub fn stream(&self) -> &S { &self.source.stream }
    pub fn headers(&self) -> &Headers { &self.source.headers }
    pub fn flags(&self) -> u32 { self.source.flags }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.source.headers.get(name)
    }

    /// The raw `:method` value.
    pub fn method(&self) -> Option<&str> {
        self.source.method_str()
    }

    /// The full `:path` as received, query string included.
    pub fn path(&self) -> Option<&str> {
        self.source.path()
    }

    /// Returns a named path parameter.
    ///
    /// For `/users/{id}` mounted under `/orgs/{org}`, a request to
    /// `/orgs/acme/users/42` sees both `param("org")` and `param("id")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &Params { &self.params }

    /// Query parameters, present only when the path contained a `?`.
    pub fn query(&self) -> Option<&QueryParams> {
        self.query.as_deref()
    }

    /// Shortcut for `query()?.get(key)`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.as_deref()?.get(key)
    }
}
