//! Builder for configuring resolver instances

use std::sync::Arc;
use std::time::Duration;

use super::Resolver;
use crate::Result;
use crate::cache::{CacheConfig, PreviewCache};
use crate::config::Config;
use crate::fetch::{
    ContentProbe, DEFAULT_RELAY_URL, DEFAULT_REQUEST_TIMEOUT, HttpProbe, MarkupRelay, RelayClient,
};
use crate::types::{ContentTypes, PreviewAssets};

/// Scope label of the resolver's cache.
pub(crate) const RESOLVER_SCOPE: &str = "resolver";

/// Builder for configuring resolver instances.
///
/// Probe and relay default to the reqwest-backed [`HttpProbe`] and
/// [`RelayClient`].
pub struct ResolverBuilder {
    probe: Option<Arc<dyn ContentProbe>>,
    relay: Option<Arc<dyn MarkupRelay>>,
    relay_url: String,
    request_timeout: Duration,
    cache: Option<PreviewCache>,
    cache_config: CacheConfig,
    content_types: ContentTypes,
    assets: PreviewAssets,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            probe: None,
            relay: None,
            relay_url: DEFAULT_RELAY_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache: None,
            cache_config: CacheConfig::default(),
            content_types: ContentTypes::default(),
            assets: PreviewAssets::default(),
        }
    }

    /// Start from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .relay_url(&config.resolver.relay_url)
            .request_timeout(Duration::from_secs(config.resolver.request_timeout_secs))
            .cache_config(CacheConfig::new().capacity(config.resolver.cache_capacity))
            .content_types(config.content_types.clone())
            .assets(config.assets.clone())
    }

    /// Use a custom content-type probe.
    pub fn probe(mut self, probe: impl ContentProbe + 'static) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Use a custom markup relay.
    pub fn relay(mut self, relay: impl MarkupRelay + 'static) -> Self {
        self.relay = Some(Arc::new(relay));
        self
    }

    /// Endpoint of the default relay client. Ignored when [`relay`](Self::relay) is set.
    pub fn relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = url.into();
        self
    }

    /// Transport timeout of the default HTTP clients.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Inject a pre-built cache. Takes precedence over [`cache_config`](Self::cache_config).
    pub fn cache(mut self, cache: PreviewCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Configure the cache built for this resolver.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Content-type lists used for classification.
    pub fn content_types(mut self, content_types: ContentTypes) -> Self {
        self.content_types = content_types;
        self
    }

    /// Favicon template and category icons.
    pub fn assets(mut self, assets: PreviewAssets) -> Self {
        self.assets = assets;
        self
    }

    pub fn build(self) -> Result<Resolver> {
        let probe: Arc<dyn ContentProbe> = match self.probe {
            Some(probe) => probe,
            None => Arc::new(HttpProbe::new(self.request_timeout)?),
        };
        let relay: Arc<dyn MarkupRelay> = match self.relay {
            Some(relay) => relay,
            None => Arc::new(RelayClient::new(self.relay_url, self.request_timeout)?),
        };
        let cache = self
            .cache
            .unwrap_or_else(|| PreviewCache::with_config(RESOLVER_SCOPE, &self.cache_config));

        Ok(Resolver::new(
            probe,
            relay,
            cache,
            self.content_types,
            self.assets,
        ))
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
