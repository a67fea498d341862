//! Route resolution: find the first route that fits, bind its parameters and
//! work out what is left of the path for the next level down.

use tracing::error;

use crate::error::RouteError;
use crate::method::Method;
use crate::path::{self, Params};
use crate::query::QueryParams;
use crate::table::{Route, RouteTable};

/// Outcome of a successful resolution.
pub struct Resolution<'t, S> {
    /// The matched route, borrowed from the table.
    pub route: &'t Route<S>,
    /// Parameters bound by the matched pattern at this level only.
    pub params: Params,
    /// Parsed query string, if the path carried a `?`.
    pub query: Option<QueryParams>,
    /// What a nested router receives as its own path. Always starts with `/`.
    pub residual: String,
}

/// Resolves `path` against `table` for a request with `method`.
///
/// - An empty `path`, or one not starting with `/`, is a
///   [`ServerError`](crate::ErrorKind::ServerError): the caller handed over
///   something that was never a request path.
/// - A `?` splits off the query string; only the part before it is matched.
/// - Routes are scanned in registration order and the first whose pattern
///   structurally matches and whose method filter accepts `method` wins.
///   Nothing matching is [`NotFound`](crate::ErrorKind::NotFound).
///
/// Resolution never mutates the table; the same inputs always select the
/// same route with the same bindings.
pub fn resolve<'t, S>(
    path: &str,
    table: &'t RouteTable<S>,
    method: Option<Method>,
) -> Result<Resolution<'t, S>, RouteError> {
    if !path.starts_with('/') {
        error!(path, "malformed routing path: expected a leading `/`");
        return Err(RouteError::malformed_path(path));
    }

    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(QueryParams::parse(query))),
        None => (path, None),
    };

    let incoming = path::segments(path);

    let route = table
        .iter()
        .find(|route| {
            let pattern = path::segments(&route.key.pattern);
            path::matches(&incoming, &pattern) && route.key.accepts(method)
        })
        .ok_or_else(RouteError::not_found)?;

    let pattern = path::segments(&route.key.pattern);
    let params = path::extract(&incoming, &pattern);

    let consumed = path::consumed(path, pattern.len());
    let residual = if consumed >= path.len() {
        "/".to_owned()
    } else {
        path[consumed..].to_owned()
    };

    Ok(Resolution { route, params, query, residual })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainEntry;
    use crate::error::ErrorKind;
    use crate::table::RouteKey;

    fn table(keys: &[(&str, Option<Method>)]) -> RouteTable<()> {
        let mut table = RouteTable::new();
        for (pattern, method) in keys {
            table.insert(RouteKey::new(*pattern, *method), vec![ChainEntry::handler(|_, _| {})]);
        }
        table
    }

    fn kind<T>(res: Result<T, RouteError>) -> Option<ErrorKind> {
        res.err().map(|e| e.kind())
    }

    #[test]
    fn binds_parameters_for_matching_method() {
        let t = table(&[("/users/{id}", Some(Method::Get))]);

        let res = resolve("/users/42", &t, Some(Method::Get)).unwrap();
        assert_eq!(res.route.key.pattern, "/users/{id}");
        assert_eq!(res.params.get("id").map(String::as_str), Some("42"));
        assert_eq!(res.residual, "/");

        assert_eq!(kind(resolve("/users/42", &t, Some(Method::Post))), Some(ErrorKind::NotFound));
    }

    #[test]
    fn prefix_mount_leaves_residual() {
        let t = table(&[("/parent-users", None)]);
        let res = resolve("/parent-users/anything", &t, Some(Method::Delete)).unwrap();
        assert_eq!(res.residual, "/anything");
        assert!(res.params.is_empty());
    }

    #[test]
    fn residual_accounts_for_bound_values() {
        let t = table(&[("/orgs/{org}", None)]);
        let res = resolve("/orgs/acme-corp/users/7", &t, None).unwrap();
        assert_eq!(res.residual, "/users/7");
        assert_eq!(res.params["org"], "acme-corp");
    }

    #[test]
    fn exact_match_residual_is_root() {
        let t = table(&[("/users", None)]);
        assert_eq!(resolve("/users", &t, None).unwrap().residual, "/");
        assert_eq!(resolve("/users/", &t, None).unwrap().residual, "/");
    }

    #[test]
    fn splits_off_query_string() {
        let t = table(&[("/users", Some(Method::Get))]);
        let res = resolve("/users?userId=1234", &t, Some(Method::Get)).unwrap();
        assert_eq!(res.route.key.pattern, "/users");
        assert_eq!(res.residual, "/");
        let query = res.query.unwrap();
        assert_eq!(query.get("userId"), Some("1234"));

        assert!(resolve("/users", &t, Some(Method::Get)).unwrap().query.is_none());
    }

    #[test]
    fn malformed_input_is_a_server_error() {
        let t = table(&[("/users", None)]);
        assert_eq!(kind(resolve("", &t, None)), Some(ErrorKind::ServerError));
        assert_eq!(kind(resolve("users", &t, None)), Some(ErrorKind::ServerError));
        assert_eq!(kind(resolve("", &RouteTable::<()>::new(), None)), Some(ErrorKind::ServerError));
    }

    #[test]
    fn first_registered_wins() {
        let t = table(&[("/users", None), ("/users/{id}", Some(Method::Get))]);
        let res = resolve("/users/42", &t, Some(Method::Get)).unwrap();
        assert_eq!(res.route.key.pattern, "/users");
        assert_eq!(res.residual, "/42");
    }

    #[test]
    fn misregistered_patterns_never_match() {
        let t = table(&[("", None), ("users", None)]);
        assert_eq!(kind(resolve("/users", &t, Some(Method::Get))), Some(ErrorKind::NotFound));
    }

    #[test]
    fn unknown_method_only_matches_unfiltered_keys() {
        let t = table(&[("/users", Some(Method::Get)), ("/users", None)]);
        let res = resolve("/users", &t, None).unwrap();
        assert_eq!(res.route.key.method, None);
    }

    #[test]
    fn resolution_is_repeatable() {
        let t = table(&[("/a/{x}", None), ("/a/{y}", None)]);
        for _ in 0..3 {
            let res = resolve("/a/1/b", &t, None).unwrap();
            assert_eq!(res.route.key.pattern, "/a/{x}");
            assert_eq!(res.params["x"], "1");
            assert_eq!(res.residual, "/b");
        }
        assert_eq!(t.len(), 2);
    }
}
