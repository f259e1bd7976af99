// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL parameter extraction
//!
//! Turns any URL-like string into a [`ParameterSet`]. Parsing never fails:
//! anything that does not resolve to a URL yields an empty set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

/// Query and hash parameters extracted from one URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Decoded query-string parameters
    pub search: BTreeMap<String, String>,
    /// Decoded `#key=value&...` fragment parameters
    pub hash: BTreeMap<String, String>,
    /// Normalized URL, absent when the input did not parse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl ParameterSet {
    /// An empty parameter set with no href
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if the input parsed to a URL
    pub fn is_resolved(&self) -> bool {
        self.href.is_some()
    }

    /// Look up a query parameter
    pub fn search_param(&self, key: &str) -> Option<&str> {
        self.search.get(key).map(String::as_str)
    }

    /// Look up a hash parameter
    pub fn hash_param(&self, key: &str) -> Option<&str> {
        self.hash.get(key).map(String::as_str)
    }
}

/// Parse a URL-like string relative to `base`
pub fn parse_params(input: &str, base: Option<&Url>) -> ParameterSet {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ParameterSet::empty();
    }

    let url = match resolve(trimmed, base) {
        Some(url) => url,
        None => return ParameterSet::empty(),
    };

    let search = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let hash = url.fragment().map(parse_hash).unwrap_or_default();

    ParameterSet {
        search,
        hash,
        href: Some(url.to_string()),
    }
}

/// Resolve a URL-like string, optionally against a base
pub(crate) fn resolve(input: &str, base: Option<&Url>) -> Option<Url> {
    Url::options().base_url(base).parse(input).ok()
}

/// Parse a fragment as an `&`-joined list of `key=value` pairs
///
/// `+` is literal here, unlike in a query string.
pub fn parse_hash(fragment: &str) -> BTreeMap<String, String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    if fragment.is_empty() {
        return BTreeMap::new();
    }

    let escaped = fragment.replace('+', "%2B");
    form_urlencoded::parse(escaped.as_bytes())
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://app.example/dir/page.html").unwrap()
    }

    #[test]
    fn test_empty_and_malformed_inputs() {
        for input in ["", "   ", "http://", "https://[::1", "::not a url::"] {
            let params = parse_params(input, None);
            assert!(params.search.is_empty(), "input {:?}", input);
            assert!(params.hash.is_empty(), "input {:?}", input);
            assert!(params.href.is_none(), "input {:?}", input);
        }
    }

    #[test]
    fn test_relative_without_base_is_empty() {
        let params = parse_params("loader.js?a=1", None);
        assert_eq!(params, ParameterSet::empty());
    }

    #[test]
    fn test_relative_with_base() {
        let b = base();
        let params = parse_params("../js/loader.js?a=1", Some(&b));
        assert_eq!(params.href.as_deref(), Some("https://app.example/js/loader.js?a=1"));
        assert_eq!(params.search_param("a"), Some("1"));
    }

    #[test]
    fn test_duplicate_query_keys_last_wins() {
        let params = parse_params("https://cdn.example/a.js?k=1&other=x&k=2&k=3", None);
        assert_eq!(params.search_param("k"), Some("3"));
        assert_eq!(params.search_param("other"), Some("x"));
        assert_eq!(params.search.len(), 2);
    }

    #[test]
    fn test_query_decoding() {
        let params = parse_params("https://cdn.example/a.js?msg=hello%20world&plus=a+b", None);
        assert_eq!(params.search_param("msg"), Some("hello world"));
        assert_eq!(params.search_param("plus"), Some("a b"));
    }

    #[test]
    fn test_hash_parameters() {
        let params = parse_params("https://app.example/#x=1&flag&=orphan&&name=J%C3%BCrgen", None);
        assert_eq!(params.hash_param("x"), Some("1"));
        assert_eq!(params.hash_param("flag"), Some(""));
        assert_eq!(params.hash_param("name"), Some("Jürgen"));
        assert!(!params.hash.contains_key(""));
        assert_eq!(params.hash.len(), 3);
    }

    #[test]
    fn test_bare_hash_is_empty() {
        let params = parse_params("https://app.example/page#", None);
        assert!(params.hash.is_empty());
        assert!(params.is_resolved());
    }

    #[test]
    fn test_hash_keeps_plus_literal() {
        let hash = parse_hash("#q=a+b&k=1&k=2");
        assert_eq!(hash.get("q").map(String::as_str), Some("a+b"));
        assert_eq!(hash.get("k").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_hash_value_keeps_later_equals_signs() {
        let hash = parse_hash("#a=b=c&token=x==");
        assert_eq!(hash.get("a").map(String::as_str), Some("b=c"));
        assert_eq!(hash.get("token").map(String::as_str), Some("x=="));
    }

    #[test]
    fn test_malformed_percent_escape_is_lossy() {
        let hash = parse_hash("bad=%E0%A4%A&ok=1");
        assert!(hash.contains_key("bad"));
        assert_eq!(hash.get("ok").map(String::as_str), Some("1"));
    }
}
