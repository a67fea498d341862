//! The inbound request as the transport hands it over.

use crate::method::Method;

/// Pseudo-header carrying the request method.
pub const METHOD: &str = ":method";
/// Pseudo-header carrying the request path, query string included.
pub const PATH: &str = ":path";
pub const SCHEME: &str = ":scheme";
pub const AUTHORITY: &str = ":authority";

/// Request header list, names compared case-insensitively.
///
/// A plain list rather than a map: pseudo-headers such as `:path` are not
/// valid names for [`http::HeaderMap`], and header counts are small.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a header. Returns `self` for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Case-insensitive lookup; the first entry wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One inbound request: the transport's stream handle, its headers and its
/// flags.
///
/// The router never touches `stream` beyond cloning it into the
/// [`Completion`](crate::Completion) / [`Failure`](crate::Failure) handed to
/// the sinks; writing to it is the handlers' and the sinks' business.
#[derive(Debug)]
pub struct Source<S> {
    pub stream: S,
    pub headers: Headers,
    pub flags: u32,
}

impl<S> Source<S> {
    pub fn new(stream: S, headers: Headers, flags: u32) -> Self {
        Self { stream, headers, flags }
    }

    /// The raw `:method` value, if present.
    pub fn method_str(&self) -> Option<&str> {
        self.headers.get(METHOD)
    }

    /// The `:method` value if it is a known [`Method`].
    pub fn method(&self) -> Option<Method> {
        self.method_str()?.parse().ok()
    }

    /// The raw `:path` value, query string included.
    pub fn path(&self) -> Option<&str> {
        self.headers.get(PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let headers = Headers::new()
            .with(":method", "GET")
            .with("Content-Type", "text/plain");
        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get(":METHOD"), Some("GET"));
        assert_eq!(headers.get("accept"), None);
    }

    #[test]
    fn unknown_method_is_none() {
        let source = Source::new((), Headers::new().with(METHOD, "PURGE"), 0);
        assert_eq!(source.method_str(), Some("PURGE"));
        assert_eq!(source.method(), None);

        let source = Source::new((), Headers::new().with(METHOD, "POST"), 0);
        assert_eq!(source.method(), Some(Method::Post));
    }
}
