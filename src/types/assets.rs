//! Static asset URLs baked into preview records.

use serde::Deserialize;

/// Placeholder substituted with the domain in [`PreviewAssets::favicon_template`].
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

fn default_favicon_template() -> String {
    "https://www.google.com/s2/favicons?domain={domain}".to_string()
}

fn default_pdf_icon() -> String {
    "https://ssl.gstatic.com/docs/doclist/images/mediatype/icon_3_pdf_x64.png".to_string()
}

fn default_video_icon() -> String {
    "https://ssl.gstatic.com/docs/doclist/images/mediatype/icon_1_video_x64.png".to_string()
}

/// Templated asset URLs used by the category handlers.
///
/// ```rust
/// # use linkpeek::PreviewAssets;
/// let assets = PreviewAssets::default();
/// assert_eq!(
///     assets.favicon_for("example.com"),
///     "https://www.google.com/s2/favicons?domain=example.com"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreviewAssets {
    /// Favicon-by-domain service URL with a `{domain}` placeholder.
    #[serde(default = "default_favicon_template")]
    pub favicon_template: String,
    /// Image shown for PDF documents.
    #[serde(default = "default_pdf_icon")]
    pub pdf_icon: String,
    /// Image shown for video files.
    #[serde(default = "default_video_icon")]
    pub video_icon: String,
}

impl Default for PreviewAssets {
    fn default() -> Self {
        Self {
            favicon_template: default_favicon_template(),
            pdf_icon: default_pdf_icon(),
            video_icon: default_video_icon(),
        }
    }
}

impl PreviewAssets {
    /// Favicon URL for `domain`. Deterministic, never fetched.
    pub fn favicon_for(&self, domain: &str) -> String {
        if self.favicon_template.contains(DOMAIN_PLACEHOLDER) {
            self.favicon_template.replace(DOMAIN_PLACEHOLDER, domain)
        } else {
            format!("{}{domain}", self.favicon_template)
        }
    }
}
