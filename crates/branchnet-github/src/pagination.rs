//! `Link` header pagination.

use regex::Regex;
use std::sync::LazyLock;

static NEXT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("invalid regex")
});

/// Extracts the `rel="next"` URL from a `Link` header value.
#[must_use]
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .find_map(|part| NEXT_LINK_RE.captures(part))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_link() {
        let header = r#"<https://api.github.com/repositories/1/forks?page=2>; rel="next", <https://api.github.com/repositories/1/forks?page=5>; rel="last""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://api.github.com/repositories/1/forks?page=2")
        );
    }

    #[test]
    fn test_next_link_not_first() {
        let header = r#"<https://x/?page=1>; rel="prev", <https://x/?page=3>; rel="next""#;
        assert_eq!(next_page_url(header).as_deref(), Some("https://x/?page=3"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let header = r#"<https://x/?page=1>; rel="first", <https://x/?page=2>; rel="prev""#;
        assert!(next_page_url(header).is_none());
    }

    #[test]
    fn test_empty_header() {
        assert!(next_page_url("").is_none());
    }
}
