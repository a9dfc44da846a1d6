//! The canonical preview record and its derivation helpers.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use super::assets::PreviewAssets;

/// Description used whenever no metadata could be retrieved at all.
pub const FALLBACK_DESCRIPTION: &str = "Preview not available";

/// Description used for HTML pages that carry no description of any kind.
pub const NO_DESCRIPTION: &str = "No description available";

/// Last-resort host pattern for inputs the URL parser rejects.
static RAW_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?([^/]+)").expect("static regex is valid")
});

/// A fully populated preview for one URL.
///
/// Every field is always present. Only `image` may be empty (`None`), and
/// renderers are expected to handle that without branching on other fields.
/// Records are immutable once cached; handlers build a new one per
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRecord {
    /// The URL this record describes; the cache key.
    pub url: String,
    /// Hostname of `url`, used as the display fallback.
    pub domain: String,
    pub title: String,
    pub description: String,
    /// Absolute image URL, never a `data:` URI.
    pub image: Option<String>,
    /// Favicon URL derived from `domain`; never fetched.
    pub favicon: String,
}

impl PreviewRecord {
    /// Domain-only record used when nothing better is available.
    ///
    /// Title is the domain, description is [`FALLBACK_DESCRIPTION`] and
    /// there is no image.
    pub fn fallback(url: &str, assets: &PreviewAssets) -> Self {
        let domain = extract_domain(url);
        Self {
            url: url.to_string(),
            title: domain.clone(),
            description: FALLBACK_DESCRIPTION.to_string(),
            image: None,
            favicon: assets.favicon_for(&domain),
            domain,
        }
    }
}

/// Derive the display domain of a URL.
///
/// Parsed URLs yield their hostname (lowercased by the parser, empty for
/// host-less schemes such as `mailto:`). Inputs that fail to parse fall back
/// to whatever precedes the first `/` after an optional `http(s)://` prefix,
/// and finally to the raw input itself.
pub fn extract_domain(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
        Err(_) => RAW_HOST
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| url.to_string()),
    }
}

/// Last non-empty path segment of a URL string, as written.
pub(crate) fn file_name(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_from_parsed_url() {
        assert_eq!(extract_domain("https://Example.COM/a/b?q=1"), "example.com");
        assert_eq!(extract_domain("http://sub.example.org:8080/"), "sub.example.org");
    }

    #[test]
    fn domain_from_unparseable_input_is_raw_input() {
        assert_eq!(extract_domain("not a url"), "not a url");
    }

    #[test]
    fn domain_from_scheme_less_path() {
        assert_eq!(extract_domain("example.com/path/page"), "example.com");
    }

    #[test]
    fn domain_of_empty_input_is_empty() {
        assert_eq!(extract_domain(""), "");
    }

    #[test]
    fn file_name_uses_last_segment() {
        assert_eq!(file_name("https://x.org/docs/report.pdf"), Some("report.pdf"));
        assert_eq!(file_name("https://x.org/docs/"), None);
    }

    #[test]
    fn fallback_is_fully_populated() {
        let record = PreviewRecord::fallback("https://example.com/x", &PreviewAssets::default());
        assert_eq!(record.url, "https://example.com/x");
        assert_eq!(record.domain, "example.com");
        assert_eq!(record.title, "example.com");
        assert_eq!(record.description, FALLBACK_DESCRIPTION);
        assert!(record.image.is_none());
        assert_eq!(
            record.favicon,
            "https://www.google.com/s2/favicons?domain=example.com"
        );
    }
}
