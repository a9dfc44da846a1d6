//! Pattern-based metadata extraction from raw HTML.
//!
//! This is not an HTML parser. Extraction is a single pass of regular
//! expressions over the raw markup: `<meta>` and `<img>` tags are located,
//! their attributes split out, and the fields picked by priority. Attribute
//! order and tag/attribute case do not matter; malformed or deeply nested
//! markup may produce misses, which the caller turns into defaults.
//!
//! # Priority (first match wins, per field)
//!
//! | field | sources |
//! |---|---|
//! | title | `og:title` → `twitter:title` → `<title>` |
//! | description | `og:description` → `twitter:description` → `description` → body text snippet |
//! | image | `og:image` → `twitter:image` → first `<img src>` that is not a `data:` URI |
//!
//! All values are trimmed and have common character references decoded.
//! Image URLs are resolved against the page URL.

mod entities;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use entities::decode_entities;

/// Maximum length, in characters, of a description taken from body text.
pub const BODY_SNIPPET_CHARS: usize = 200;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("static regex is valid"));

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("static regex is valid"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("static regex is valid")
});

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>([^<]+)</title\s*>").expect("static regex is valid")
});

static BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|\z)").expect("static regex is valid")
});

static NON_TEXT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style|noscript|template)\b[^>]*>.*?</(?:script|style|noscript|template)\s*>")
        .expect("static regex is valid")
});

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

/// Fields extracted from one document. `None` means no source matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute when the base URL allowed resolution.
    pub image: Option<String>,
}

/// A `<meta>` tag reduced to its key (`property` or `name`) and `content`.
struct MetaTag {
    key: String,
    content: String,
}

/// Extract title, description and image from raw markup.
///
/// `base_url` is the page's own URL and is only used to resolve image
/// URLs. Never fails: anything not found is `None`.
///
/// ```rust
/// let html = r#"<head><meta content="Hello" property="og:title"></head>"#;
/// let meta = linkpeek::extract::parse_metadata(html, "https://example.com/");
/// assert_eq!(meta.title.as_deref(), Some("Hello"));
/// ```
pub fn parse_metadata(raw_html: &str, base_url: &str) -> PageMetadata {
    let metas = meta_tags(raw_html);

    let title = meta_content(&metas, &["og:title", "twitter:title"]).or_else(|| title_text(raw_html));

    let description = meta_content(
        &metas,
        &["og:description", "twitter:description", "description"],
    )
    .or_else(|| body_snippet(raw_html));

    let image = meta_content_where(&metas, &["og:image", "twitter:image"], |src| {
        !is_data_uri(src)
    })
    .or_else(|| first_img_src(raw_html))
    .map(|src| resolve_url(&src, base_url));

    PageMetadata {
        title,
        description,
        image,
    }
}

/// Resolve `url` against `base`.
///
/// Returns `url` unchanged when either string cannot be resolved.
pub fn resolve_url(url: &str, base: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(url))
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|_| url.to_string())
}

fn meta_tags(html: &str) -> Vec<MetaTag> {
    META_TAG
        .find_iter(html)
        .filter_map(|tag| {
            let mut key = None;
            let mut content = None;
            for (name, value) in attributes(tag.as_str()) {
                match name.as_str() {
                    "property" | "name" if key.is_none() => key = Some(value.to_ascii_lowercase()),
                    "content" => content = Some(value),
                    _ => {}
                }
            }
            Some(MetaTag {
                key: key?,
                content: content?,
            })
        })
        .collect()
}

/// First non-empty `content` among `keys`, in key priority order.
fn meta_content(metas: &[MetaTag], keys: &[&str]) -> Option<String> {
    meta_content_where(metas, keys, |_| true)
}

/// Like [`meta_content`], but a value rejected by `accept` falls through to
/// the next tag or key.
fn meta_content_where(
    metas: &[MetaTag],
    keys: &[&str],
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    keys.iter().find_map(|key| {
        metas
            .iter()
            .filter(|meta| meta.key == *key)
            .find_map(|meta| clean(&meta.content).filter(|value| accept(value.as_str())))
    })
}

fn title_text(html: &str) -> Option<String> {
    TITLE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| clean(m.as_str()))
}

/// Tag-stripped, whitespace-collapsed start of the `<body>`.
///
/// The text is trimmed before the cut, not after, so a snippet cut at a
/// space keeps it.
fn body_snippet(html: &str) -> Option<String> {
    let body = BODY.captures(html)?.get(1)?.as_str();
    let body = NON_TEXT_BLOCK.replace_all(body, " ");
    let text = ANY_TAG.replace_all(&body, " ");
    let text = decode_entities(&text);
    let text = WHITESPACE.replace_all(&text, " ");
    let snippet: String = text.trim().chars().take(BODY_SNIPPET_CHARS).collect();
    (!snippet.is_empty()).then_some(snippet)
}

fn first_img_src(html: &str) -> Option<String> {
    IMG_TAG.find_iter(html).find_map(|tag| {
        attributes(tag.as_str())
            .find(|(name, _)| name == "src")
            .and_then(|(_, src)| clean(&src))
            .filter(|src| !is_data_uri(src))
    })
}

/// Lowercased attribute names with their raw values.
fn attributes(tag: &str) -> impl Iterator<Item = (String, String)> + '_ {
    ATTRIBUTE.captures_iter(tag).map(|caps| {
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        (name, value)
    })
}

/// Decode and trim; empty results count as absent.
fn clean(raw: &str) -> Option<String> {
    let value = decode_entities(raw);
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn is_data_uri(src: &str) -> bool {
    src.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}
