//! User-facing settings shared between the settings surface and clients.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default delay between hover start and showing a preview.
pub const DEFAULT_HOVER_DELAY_MS: u64 = 500;

fn default_enabled() -> bool {
    true
}

fn default_hover_delay() -> u64 {
    DEFAULT_HOVER_DELAY_MS
}

/// The `{enabled, hoverDelay}` settings record.
///
/// The delay serializes as `hoverDelay` to match the `settingsChanged` wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// When false, hovers never enter the preview pipeline.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Hover delay in milliseconds.
    #[serde(
        rename = "hoverDelay",
        alias = "hover_delay_ms",
        default = "default_hover_delay"
    )]
    pub hover_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            hover_delay_ms: default_hover_delay(),
        }
    }
}

impl Settings {
    /// Hover delay as a [`Duration`].
    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_delay_ms)
    }
}
