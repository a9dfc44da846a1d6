//! Rendering collaborator seam and the display model it consumes.
//!
//! Drawing the card is left to a [`Renderer`] implementation supplied by the
//! embedding surface. This module only prepares what such an implementation
//! needs: a [`PreviewCard`] with display-ready text, and the card origin
//! computed by [`place_card`].

use crate::types::PreviewRecord;

/// Maximum displayed title length, in characters.
pub const MAX_TITLE_CHARS: usize = 80;

/// Maximum displayed description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 150;

/// Gap between the cursor and the card, in pixels.
pub const CURSOR_OFFSET: (f64, f64) = (10.0, 10.0);

/// Pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

impl CursorPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Draws preview cards. Implementations must cope with any field of the
/// record being empty.
///
/// `at` is the card's top-left corner when the dispatcher was given a
/// placement (see `ClientDispatcher::placement`). Otherwise it is the raw
/// cursor, and the implementation positions the card itself with
/// [`place_card`].
pub trait Renderer: Send + Sync {
    /// Show `card` at `at`.
    fn show(&self, card: &PreviewCard, at: CursorPosition);

    /// Follow the pointer while the card is visible.
    fn move_to(&self, at: CursorPosition);

    /// Hide the card.
    fn hide(&self);
}

/// Display-ready text for one preview card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCard {
    pub title: String,
    pub description: String,
    pub domain: String,
    pub url: String,
    pub image: Option<String>,
    /// `None` when the record's favicon is empty.
    pub favicon: Option<String>,
}

impl PreviewCard {
    /// Build the card for `record`, truncating long text and substituting
    /// the domain for empty fields.
    pub fn from_record(record: &PreviewRecord) -> Self {
        let title = if record.title.is_empty() {
            record.domain.as_str()
        } else {
            record.title.as_str()
        };
        let description = if record.description.is_empty() {
            format!("Content from {}", record.domain)
        } else {
            record.description.clone()
        };

        Self {
            title: truncate_text(title, MAX_TITLE_CHARS),
            description: truncate_text(&description, MAX_DESCRIPTION_CHARS),
            domain: record.domain.clone(),
            url: record.url.clone(),
            image: record.image.clone().filter(|image| !image.is_empty()),
            favicon: Some(record.favicon.clone()).filter(|favicon| !favicon.is_empty()),
        }
    }
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Top-left corner for a card of size `card` shown at `cursor`.
///
/// The card sits below and to the right of the cursor; on each axis where
/// it would overflow `viewport`, it flips to the other side of the cursor.
pub fn place_card(cursor: CursorPosition, card: Size, viewport: Size) -> CursorPosition {
    let (offset_x, offset_y) = CURSOR_OFFSET;

    let mut x = cursor.x + offset_x;
    if x + card.width > viewport.width {
        x = cursor.x - card.width - offset_x;
    }

    let mut y = cursor.y + offset_y;
    if y + card.height > viewport.height {
        y = cursor.y - card.height - offset_y;
    }

    CursorPosition { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: Size = Size {
        width: 320.0,
        height: 180.0,
    };
    const VIEWPORT: Size = Size {
        width: 1280.0,
        height: 800.0,
    };

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_text("short", 80), "short");
        assert_eq!(truncate_text("", 80), "");
    }

    #[test]
    fn long_text_is_cut_to_limit_with_ellipsis() {
        let text = "x".repeat(100);
        let cut = truncate_text(&text, 80);
        assert_eq!(cut.chars().count(), 80);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let text = "ü".repeat(10);
        assert_eq!(truncate_text(&text, 5), "üü...");
    }

    #[test]
    fn card_below_right_of_cursor() {
        let at = place_card(CursorPosition::new(100.0, 100.0), CARD, VIEWPORT);
        assert_eq!(at, CursorPosition::new(110.0, 110.0));
    }

    #[test]
    fn card_flips_near_right_and_bottom_edges() {
        let at = place_card(CursorPosition::new(1200.0, 750.0), CARD, VIEWPORT);
        assert_eq!(at, CursorPosition::new(1200.0 - 320.0 - 10.0, 750.0 - 180.0 - 10.0));
    }

    #[test]
    fn empty_fields_are_substituted() {
        let record = PreviewRecord {
            url: "https://example.com/".into(),
            domain: "example.com".into(),
            title: String::new(),
            description: String::new(),
            image: Some(String::new()),
            favicon: String::new(),
        };
        let card = PreviewCard::from_record(&record);
        assert_eq!(card.title, "example.com");
        assert_eq!(card.description, "Content from example.com");
        assert_eq!(card.image, None);
        assert_eq!(card.favicon, None);
    }
}
