//! Content categories and the content-type lists that select them.

use std::fmt;

use serde::Deserialize;

/// Content type assumed when the probe fails or reports nothing.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Broad kind of resource behind a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    Image,
    Pdf,
    Video,
    /// Everything else, including failed probes.
    Html,
}

impl ContentCategory {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Image => "image",
            ContentCategory::Pdf => "pdf",
            ContentCategory::Video => "video",
            ContentCategory::Html => "html",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_image_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/gif", "image/webp", "image/svg+xml"]
        .map(String::from)
        .to_vec()
}

fn default_pdf_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

fn default_video_types() -> Vec<String> {
    ["video/mp4", "video/webm", "video/ogg"]
        .map(String::from)
        .to_vec()
}

/// Content-type substrings per category.
///
/// A declared content type belongs to a category when it contains any of
/// that category's entries. Categories are tried in the order image, PDF,
/// video; anything unmatched is HTML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentTypes {
    #[serde(default = "default_image_types")]
    pub image: Vec<String>,
    #[serde(default = "default_pdf_types")]
    pub pdf: Vec<String>,
    #[serde(default = "default_video_types")]
    pub video: Vec<String>,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            image: default_image_types(),
            pdf: default_pdf_types(),
            video: default_video_types(),
        }
    }
}

impl ContentTypes {
    /// Classify a declared content type.
    ///
    /// Matching is case-insensitive, so `Image/PNG; charset=binary` is an
    /// image.
    pub fn classify(&self, content_type: &str) -> ContentCategory {
        let content_type = content_type.to_ascii_lowercase();
        let matches = |list: &[String]| {
            list.iter()
                .any(|known| content_type.contains(&known.to_ascii_lowercase()))
        };

        if matches(&self.image) {
            ContentCategory::Image
        } else if matches(&self.pdf) {
            ContentCategory::Pdf
        } else if matches(&self.video) {
            ContentCategory::Video
        } else {
            ContentCategory::Html
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_types() {
        let types = ContentTypes::default();
        assert_eq!(types.classify("image/png"), ContentCategory::Image);
        assert_eq!(types.classify("application/pdf"), ContentCategory::Pdf);
        assert_eq!(types.classify("video/webm"), ContentCategory::Video);
        assert_eq!(types.classify("text/html; charset=utf-8"), ContentCategory::Html);
    }

    #[test]
    fn classify_unknown_and_empty_as_html() {
        let types = ContentTypes::default();
        assert_eq!(types.classify(""), ContentCategory::Html);
        assert_eq!(types.classify("application/json"), ContentCategory::Html);
        assert_eq!(types.classify("audio/mpeg"), ContentCategory::Html);
    }

    #[test]
    fn classify_uses_substring_and_ignores_case() {
        let types = ContentTypes::default();
        assert_eq!(types.classify("Image/JPEG;q=0.9"), ContentCategory::Image);
    }

    #[test]
    fn image_wins_over_later_categories() {
        let types = ContentTypes {
            image: vec!["x/".into()],
            pdf: vec!["x/".into()],
            video: vec!["x/".into()],
        };
        assert_eq!(types.classify("x/y"), ContentCategory::Image);
    }
}
