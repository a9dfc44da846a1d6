//! Shared settings record with change notification.
//!
//! A settings surface writes through [`SettingsStore`]; every client holds a
//! [`tokio::sync::watch::Receiver`] from [`SettingsStore::subscribe`] and
//! reads the latest value when it schedules a hover. Updates therefore apply
//! to subsequent hovers only, never to a timer that is already running.

use tokio::sync::watch;
use tracing::debug;

use crate::types::{ClientMessage, Settings};

/// Owner of the current [`Settings`].
#[derive(Debug)]
pub struct SettingsStore {
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current settings.
    pub fn get(&self) -> Settings {
        *self.tx.borrow()
    }

    /// Replace the settings and notify subscribers if anything changed.
    pub fn set(&self, settings: Settings) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == settings {
                false
            } else {
                *current = settings;
                true
            }
        });
        if changed {
            debug!(
                enabled = settings.enabled,
                hover_delay_ms = settings.hover_delay_ms,
                "settings changed"
            );
        }
    }

    /// Toggle previews on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.set(Settings {
            enabled,
            ..self.get()
        });
    }

    /// Change the hover delay in milliseconds.
    pub fn set_hover_delay_ms(&self, hover_delay_ms: u64) {
        self.set(Settings {
            hover_delay_ms,
            ..self.get()
        });
    }

    /// Apply a `settingsChanged` message.
    pub fn apply(&self, message: ClientMessage) {
        match message {
            ClientMessage::SettingsChanged { settings } => self.set(settings),
        }
    }

    /// Receiver that always observes the latest settings.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_see_updates() {
        let store = SettingsStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set_hover_delay_ms(1200);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().hover_delay_ms, 1200);
        assert!(rx.borrow().enabled);
    }

    #[test]
    fn identical_update_does_not_notify() {
        let store = SettingsStore::default();
        let rx = store.subscribe();
        store.set(Settings::default());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn settings_changed_message_applies() {
        let store = SettingsStore::default();
        let message: ClientMessage = serde_json::from_str(
            r#"{"action":"settingsChanged","settings":{"enabled":false,"hoverDelay":900}}"#,
        )
        .unwrap();
        store.apply(message);
        assert_eq!(
            store.get(),
            Settings {
                enabled: false,
                hover_delay_ms: 900
            }
        );
    }
}
