//! Client-side dispatcher.
//!
//! [`ClientDispatcher`] lives in the page context. It turns pointer events
//! into preview requests, keeps a secondary cache in front of the
//! [`PreviewChannel`] and hands finished cards to a [`Renderer`].
//!
//! # Hover flow
//!
//! Every hover-enter and hover-exit bumps a generation counter. A hover
//! schedules a task that sleeps for the current hover delay, then fetches,
//! then shows the card. The task re-checks the generation after each step
//! and stops as soon as it is stale, so a newer hover (or an exit) always
//! wins. A fetch that is already in flight is never cancelled: its record
//! still lands in the client cache, it is just not shown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{DEFAULT_CLIENT_CAPACITY, PreviewCache};
use crate::channel::PreviewChannel;
use crate::config::Config;
use crate::render::{CursorPosition, PreviewCard, Renderer, Size, place_card};
use crate::types::{PreviewAssets, PreviewRecord, PreviewRequest, Settings};

/// Scope label of a client cache.
pub(crate) const CLIENT_SCOPE: &str = "client";

/// Card and viewport sizes used to turn the cursor into a card origin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    card: Size,
    viewport: Size,
}

#[derive(Debug, Default)]
struct HoverState {
    generation: u64,
    link: Option<String>,
    visible: bool,
    position: CursorPosition,
}

/// Page-context preview dispatcher.
pub struct ClientDispatcher {
    channel: Arc<dyn PreviewChannel>,
    cache: PreviewCache,
    settings: watch::Receiver<Settings>,
    assets: PreviewAssets,
    renderer: Arc<dyn Renderer>,
    placement: Option<Placement>,
    hover: Mutex<HoverState>,
}

impl ClientDispatcher {
    /// Create a dispatcher with a default-sized client cache.
    ///
    /// `settings` is read at the start of every hover, so updates published
    /// by a [`SettingsStore`](crate::settings::SettingsStore) apply to the
    /// next hover.
    pub fn new(
        channel: Arc<dyn PreviewChannel>,
        renderer: Arc<dyn Renderer>,
        settings: watch::Receiver<Settings>,
    ) -> Self {
        Self {
            channel,
            cache: PreviewCache::new(CLIENT_SCOPE, DEFAULT_CLIENT_CAPACITY),
            settings,
            assets: PreviewAssets::default(),
            renderer,
            placement: None,
            hover: Mutex::new(HoverState::default()),
        }
    }

    /// Create a dispatcher sized and styled by `config`.
    pub fn from_config(
        channel: Arc<dyn PreviewChannel>,
        renderer: Arc<dyn Renderer>,
        settings: watch::Receiver<Settings>,
        config: &Config,
    ) -> Self {
        Self::new(channel, renderer, settings)
            .cache_capacity(config.client.cache_capacity)
            .assets(config.assets.clone())
    }

    /// Resize the client cache. Drops anything already cached.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = PreviewCache::new(CLIENT_SCOPE, capacity);
        self
    }

    /// Assets used for locally synthesized fallback records.
    pub fn assets(mut self, assets: PreviewAssets) -> Self {
        self.assets = assets;
        self
    }

    /// Position cards with [`place_card`] for a `card`-sized card in
    /// `viewport`.
    ///
    /// Without a placement the renderer receives the raw cursor position.
    pub fn placement(mut self, card: Size, viewport: Size) -> Self {
        self.placement = Some(Placement { card, viewport });
        self
    }

    /// The client cache.
    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    /// Settings as of now.
    pub fn settings(&self) -> Settings {
        *self.settings.borrow()
    }

    /// Whether a card is currently shown.
    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    /// Link under the pointer, if any.
    pub fn hovered_link(&self) -> Option<String> {
        self.lock().link.clone()
    }

    /// Preview for `url`, from the client cache or the resolver.
    ///
    /// Never fails. When the exchange with the resolver breaks down, a
    /// local fallback record is returned and not cached, so the next hover
    /// asks again.
    pub async fn get_preview(&self, url: &str) -> PreviewRecord {
        if let Some(hit) = self.cache.get(url) {
            return hit;
        }

        match self.channel.send(PreviewRequest::fetch(url)).await {
            Ok(response) => {
                if let Some(error) = &response.error {
                    debug!(url, error = %error, "resolver answered with a fallback");
                }
                self.cache.put(url, response.data.clone());
                response.data
            }
            Err(e) => {
                warn!(url, error = %e, "preview request failed, using local fallback");
                PreviewRecord::fallback(url, &self.assets)
            }
        }
    }

    /// Pointer entered `link` at `at`.
    ///
    /// Returns the scheduled show task, or `None` when previews are
    /// disabled or the link cannot be previewed (`javascript:` links and
    /// unparseable URLs). Dropping the handle does not cancel the task.
    pub fn hover_enter(self: &Arc<Self>, link: &str, at: CursorPosition) -> Option<JoinHandle<()>> {
        let settings = self.settings();
        if !settings.enabled {
            return None;
        }
        if !is_previewable(link) {
            debug!(link, "ignoring link without a previewable target");
            return None;
        }

        let generation = {
            let mut hover = self.lock();
            hover.generation += 1;
            hover.link = Some(link.to_string());
            hover.position = at;
            hover.generation
        };

        let dispatcher = Arc::clone(self);
        let link = link.to_string();
        let delay = settings.hover_delay();
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !dispatcher.is_current(generation) {
                return;
            }

            let record = dispatcher.get_preview(&link).await;

            let mut hover = dispatcher.lock();
            if hover.generation != generation {
                debug!(link = %link, "hover ended before the preview arrived");
                return;
            }
            let card = PreviewCard::from_record(&record);
            dispatcher.renderer.show(&card, dispatcher.origin(hover.position));
            hover.visible = true;
        }))
    }

    /// Pointer left the hovered link.
    ///
    /// Cancels any pending show and hides a visible card.
    pub fn hover_exit(&self) {
        let mut hover = self.lock();
        hover.generation += 1;
        hover.link = None;
        if hover.visible {
            hover.visible = false;
            self.renderer.hide();
        }
    }

    /// Pointer moved while over a link.
    pub fn pointer_move(&self, at: CursorPosition) {
        let mut hover = self.lock();
        hover.position = at;
        if hover.visible {
            self.renderer.move_to(self.origin(at));
        }
    }

    fn origin(&self, cursor: CursorPosition) -> CursorPosition {
        match self.placement {
            Some(Placement { card, viewport }) => place_card(cursor, card, viewport),
            None => cursor,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn lock(&self) -> MutexGuard<'_, HoverState> {
        self.hover.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ClientDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientDispatcher")
            .field("cache", &self.cache)
            .field("settings", &self.settings())
            .field("placement", &self.placement)
            .field("hover", &*self.lock())
            .finish()
    }
}

/// Whether hovering `link` should produce a preview.
pub fn is_previewable(link: &str) -> bool {
    let link = link.trim();
    if link.is_empty()
        || link
            .get(..11)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
    {
        return false;
    }
    Url::parse(link).is_ok()
}
