use url::Url;

/// Heuristic repair of a free-text URL into `http://www.` form.
///
/// Only URLs that still lack `http://` after the `www.` fix produce a
/// candidate; anything already carrying `http://` yields no result and the
/// caller keeps the original value.
pub fn normalize_url(raw: &str) -> Option<String> {
    let with_host = if raw.contains("www.") {
        raw.to_string()
    } else {
        format!("www.{}", raw)
    };
    if with_host.contains("http://") {
        return None;
    }
    Some(format!("http://{}", with_host))
}

/// Generic well-formedness check: the string parses as an absolute URL with a
/// host. Used by audit mode only, it never gates the pipeline.
pub fn is_well_formed(raw: &str) -> bool {
    Url::parse(raw).map(|url| url.has_host()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_gets_scheme_and_www() {
        assert_eq!(
            normalize_url("example.com").as_deref(),
            Some("http://www.example.com")
        );
    }

    #[test]
    fn www_domain_without_scheme_gets_scheme() {
        assert_eq!(
            normalize_url("www.example.com").as_deref(),
            Some("http://www.example.com")
        );
    }

    #[test]
    fn url_with_scheme_produces_no_candidate() {
        assert_eq!(normalize_url("http://example.com"), None);
        assert_eq!(normalize_url("http://www.example.com"), None);
    }

    #[test]
    fn well_formedness_requires_scheme_and_host() {
        assert!(is_well_formed("http://www.example.com"));
        assert!(is_well_formed("https://example.com/path"));
        assert!(!is_well_formed("www.example.com"));
        assert!(!is_well_formed("example.com"));
        assert!(!is_well_formed("mailto:user@example.com"));
    }
}
