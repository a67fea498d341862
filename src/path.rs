//! Segment matching and path-parameter extraction.
//!
//! A route pattern such as `/users/{userId}/addresses/{addressId}` is split on
//! `/` into segments. A segment is a *parameter* only when it both starts with
//! `{` and ends with `}` with a non-empty name between them; anything else
//! (`{foo`, `foo}`, `fo{o}`, `{}`) is a literal and is compared byte for byte.
//!
//! Both functions here only look at the first `pattern.len()` incoming
//! segments. Whether a longer incoming path is acceptable is decided by the
//! resolver, not by the matcher.

use std::collections::HashMap;

/// Bound path parameters, name → raw segment value.
///
/// Accumulated across nesting levels; an inner binding overwrites an outer
/// one with the same name.
pub type Params = HashMap<String, String>;

/// Splits a path into segments, dropping the empty element before the
/// leading `/`.
///
/// `"/users/42"` → `["users", "42"]`, `"/"` → `[""]`. A string without a
/// leading separator yields no segments at all, so a pattern registered as
/// `"users"` (or `""`) can never match.
pub fn segments(path: &str) -> Vec<&str> {
    match path.strip_prefix('/') {
        Some(rest) => rest.split('/').collect(),
        None => Vec::new(),
    }
}

/// Returns the parameter name if `segment` is a `{name}` placeholder.
/// `{}` has no name and is not a placeholder.
pub fn param_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')?
        .strip_suffix('}')
        .filter(|name| !name.is_empty())
}

/// Structural match of `pattern` against the head of `incoming`.
///
/// False when either side is empty or when the pattern has more segments
/// than the request supplied. Literal comparison is case-sensitive.
pub fn matches(incoming: &[&str], pattern: &[&str]) -> bool {
    if incoming.is_empty() || pattern.is_empty() || pattern.len() > incoming.len() {
        return false;
    }

    pattern
        .iter()
        .zip(incoming)
        .all(|(want, got)| param_name(want).is_some() || want == got)
}

/// Binds every `{name}` segment of `pattern` to the incoming segment at the
/// same index. Incoming segments past the end of the pattern are ignored.
pub fn extract(incoming: &[&str], pattern: &[&str]) -> Params {
    pattern
        .iter()
        .zip(incoming)
        .filter_map(|(want, got)| param_name(want).map(|name| (name.to_owned(), (*got).to_owned())))
        .collect()
}

/// Byte length of the prefix of `path` covered by its first `count`
/// segments, leading separator included.
///
/// `consumed("/users/42/orders", 2)` is `9` (`"/users/42"`).
pub(crate) fn consumed(path: &str, count: usize) -> usize {
    segments(path)
        .iter()
        .take(count)
        .map(|segment| segment.len() + 1)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separator() {
        assert_eq!(segments("/users/42"), ["users", "42"]);
        assert_eq!(segments("/"), [""]);
        assert_eq!(segments("/users/"), ["users", ""]);
        assert!(segments("users").is_empty());
        assert!(segments("").is_empty());
    }

    #[test]
    fn empty_sides_never_match() {
        assert!(!matches(&[], &["users", "{id}"]));
        assert!(!matches(&["users", "1234"], &[]));
        assert!(!matches(&[], &[]));
    }

    #[test]
    fn pattern_longer_than_request_fails() {
        assert!(!matches(&["users"], &["users", "{id}"]));
    }

    #[test]
    fn exact_and_prefix_matches() {
        assert!(matches(&["users"], &["users"]));
        assert!(matches(&["users", "1234", "addresses", "4321"], &["users"]));
        assert!(matches(&["users", "1234", "addresses", "4321"], &["users", "{userId}"]));
        assert!(matches(
            &["users", "1234", "addresses", "4321"],
            &["users", "{userId}", "addresses", "{addressId}"],
        ));
    }

    #[test]
    fn mismatched_literals_fail() {
        let incoming = ["users", "1234", "addresses", "4321"];
        assert!(!matches(&incoming, &["companies"]));
        assert!(!matches(&incoming, &["companies", "{companyId}"]));
        assert!(!matches(&incoming, &["users", "{userId}", "friends"]));
        assert!(!matches(&incoming, &["users", "{userId}", "friends", "{friendId}"]));
        assert!(!matches(&["Users"], &["users"]));
    }

    #[test]
    fn malformed_placeholders_are_literals() {
        assert!(!matches(&["users", "1234"], &["users", "{userId"]));
        assert!(!matches(&["users", "1234"], &["users", "userId}"]));
        assert!(!matches(&["users", "1234"], &["users", "u{serId}"]));
        assert!(matches(&["users", "{userId"], &["users", "{userId"]));
    }

    #[test]
    fn empty_braces_are_a_literal() {
        assert_eq!(param_name("{}"), None);
        assert!(!matches(&["users", "1234"], &["users", "{}"]));
        assert!(matches(&["users", "{}"], &["users", "{}"]));
        assert!(extract(&["users", "{}"], &["users", "{}"]).is_empty());
    }

    #[test]
    fn extracts_bound_parameters() {
        let params = extract(&["users", "1234"], &["users", "{userId}"]);
        assert_eq!(params.len(), 1);
        assert_eq!(params["userId"], "1234");

        let params = extract(
            &["users", "1234", "address", "4321", "author", "8744"],
            &["users", "{userId}", "address", "{addressId}"],
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params["userId"], "1234");
        assert_eq!(params["addressId"], "4321");
    }

    #[test]
    fn no_placeholders_no_bindings() {
        assert!(extract(&["users", "1234"], &["users"]).is_empty());
        assert!(extract(&["users", "1234"], &["users", "{userId"]).is_empty());
        assert!(extract(&["users", "1234"], &["users", "userId}"]).is_empty());
        assert!(extract(&["users", "1234"], &["users", "u{serId}"]).is_empty());
    }

    #[test]
    fn consumed_counts_separators() {
        assert_eq!(consumed("/users/42/orders", 2), 9);
        assert_eq!(consumed("/users", 1), 6);
        assert_eq!(consumed("/", 1), 1);
    }
}
