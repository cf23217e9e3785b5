//! URL canonicalization and domain equivalence.
//!
//! Normalization is deliberately shallow: a default scheme is added, the
//! fragment is dropped and trailing slashes are trimmed. Percent-encoding,
//! query strings and path case are left untouched, so `/About` and `/about`
//! are distinct pages.

use url::Url;

/// Schemes that carry no authority and are written without `//`.
const OPAQUE_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:", "sms:", "about:"];

/// Returns true when `url` already starts with a scheme.
///
/// A bare `host:port` is not treated as a scheme.
pub fn has_scheme(url: &str) -> bool {
    if let Some(end) = url.find("://") {
        let scheme = &url[..end];
        let mut chars = scheme.chars();
        return matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    }

    let lower = url.to_ascii_lowercase();
    OPAQUE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Canonicalizes a URL for visited-set membership and page keys.
pub fn normalize_url(url: &str) -> String {
    let mut normalized = if has_scheme(url) {
        url.to_string()
    } else {
        format!("https://{}", url)
    };

    if let Some(pos) = normalized.find('#') {
        normalized.truncate(pos);
    }

    let trimmed = normalized.trim_end_matches('/').len();
    normalized.truncate(trimmed);

    normalized
}

/// Strips a literal leading `www.`; every other subdomain stays distinct.
pub fn base_domain(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// The authority of a URL without userinfo: host plus explicit port.
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Checks whether `candidate` lives on the same base domain as `seed_host`.
pub fn is_internal(candidate: &str, seed_host: &str) -> bool {
    Url::parse(candidate)
        .ok()
        .and_then(|url| host_key(&url))
        .map(|host| base_domain(&host) == base_domain(seed_host))
        .unwrap_or(false)
}

/// Extract the path component from a URL, `/` for the root.
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() { "/".to_string() } else { path }
        })
        .unwrap_or_else(|| url.to_string())
}
