//! The resolver: classifies a URL, dispatches to a category handler and owns
//! the authoritative preview cache.
//!
//! # Pipeline
//!
//! 1. Cache lookup by exact URL string.
//! 2. URL validation. An unparseable URL short-circuits to a fallback
//!    record without any network call (and is not cached).
//! 3. Content-type probe. Failures are absorbed and treated as HTML.
//! 4. Dispatch on [`ContentCategory`]: image, PDF and video records are
//!    built from templates; HTML goes through the relay and the extractor.
//! 5. The record is stored in the cache and returned.
//!
//! [`Resolver::classify_and_resolve`] never fails; every error becomes a
//! fully populated fallback record.
//!
//! Concurrent requests for the same URL are not de-duplicated: each runs
//! the full pipeline and the last to finish overwrites the cached record
//! in place.

mod builder;

pub use builder::ResolverBuilder;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};
use url::Url;

use crate::cache::PreviewCache;
use crate::extract::parse_metadata;
use crate::fetch::{ContentProbe, MarkupRelay};
use crate::telemetry;
use crate::types::{
    ContentCategory, ContentTypes, HTML_CONTENT_TYPE, NO_DESCRIPTION, PreviewAssets,
    PreviewRecord, PreviewRequest, PreviewResponse, extract_domain, file_name,
};
use crate::{LinkPeekError, Result};

/// A record plus whether it had to fall back to domain-only data.
struct Resolution {
    record: PreviewRecord,
    degraded: bool,
}

impl Resolution {
    fn complete(record: PreviewRecord) -> Self {
        Self {
            record,
            degraded: false,
        }
    }

    fn degraded(record: PreviewRecord) -> Self {
        Self {
            record,
            degraded: true,
        }
    }
}

/// Cross-origin-capable preview resolver.
///
/// ```rust,no_run
/// # async fn run() -> linkpeek::Result<()> {
/// let resolver = linkpeek::Resolver::builder().build()?;
/// let record = resolver.classify_and_resolve("https://www.rust-lang.org/").await;
/// println!("{}: {}", record.title, record.description);
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    probe: Arc<dyn ContentProbe>,
    relay: Arc<dyn MarkupRelay>,
    cache: PreviewCache,
    content_types: ContentTypes,
    assets: PreviewAssets,
}

impl Resolver {
    /// Create a new builder for configuring the resolver.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub(crate) fn new(
        probe: Arc<dyn ContentProbe>,
        relay: Arc<dyn MarkupRelay>,
        cache: PreviewCache,
        content_types: ContentTypes,
        assets: PreviewAssets,
    ) -> Self {
        Self {
            probe,
            relay,
            cache,
            content_types,
            assets,
        }
    }

    /// The authoritative cache.
    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    /// Asset URLs used in generated records.
    pub fn assets(&self) -> &PreviewAssets {
        &self.assets
    }

    /// Resolve `url` to a preview record, never failing.
    ///
    /// Any error is logged and replaced by [`PreviewRecord::fallback`].
    #[instrument(skip(self), fields(operation = "classify_and_resolve"))]
    pub async fn classify_and_resolve(&self, url: &str) -> PreviewRecord {
        match self.try_resolve(url).await {
            Ok(record) => record,
            Err(e) => {
                warn!(url, error = %e, "preview resolution failed, using fallback");
                PreviewRecord::fallback(url, &self.assets)
            }
        }
    }

    /// Resolve `url`, reporting an invalid URL as an error.
    ///
    /// Transport failures are still absorbed (probe → HTML, relay →
    /// domain-only record); only problems that prevent any resolution are
    /// returned.
    pub async fn try_resolve(&self, url: &str) -> Result<PreviewRecord> {
        if let Some(hit) = self.cache.get(url) {
            return Ok(hit);
        }

        let parsed =
            Url::parse(url).map_err(|e| LinkPeekError::InvalidUrl(format!("{url}: {e}")))?;

        let started = Instant::now();
        let category = self.classify(&parsed).await;
        debug!(url, %category, "dispatching preview");

        let resolution = match category {
            ContentCategory::Image => Resolution::complete(self.image_preview(url)),
            ContentCategory::Pdf => Resolution::complete(self.pdf_preview(url)),
            ContentCategory::Video => Resolution::complete(self.video_preview(url)),
            ContentCategory::Html => self.html_preview(url, &parsed).await,
        };

        let status = if resolution.degraded { "fallback" } else { "ok" };
        metrics::counter!(telemetry::RESOLUTIONS_TOTAL,
            "category" => category.as_str(),
            "status" => status)
        .increment(1);
        metrics::histogram!(telemetry::RESOLUTION_DURATION_SECONDS,
            "category" => category.as_str())
        .record(started.elapsed().as_secs_f64());

        self.cache.put(url, resolution.record.clone());
        Ok(resolution.record)
    }

    /// Determine the content category of `url` from its declared content type.
    ///
    /// A failed probe counts as HTML, as does a missing content type.
    pub async fn classify(&self, url: &Url) -> ContentCategory {
        let content_type = match self.probe.content_type(url).await {
            Ok(content_type) => content_type.unwrap_or_default(),
            Err(e) => {
                debug!(
                    url = %url,
                    probe = self.probe.name(),
                    error = %e,
                    "content-type probe failed, assuming HTML"
                );
                metrics::counter!(telemetry::PROBE_FAILURES_TOTAL).increment(1);
                HTML_CONTENT_TYPE.to_string()
            }
        };
        self.content_types.classify(&content_type)
    }

    /// Build and cache the preview for an HTML page.
    ///
    /// Relay failures degrade to a domain-only record, which is cached too.
    /// An invalid URL yields an uncached fallback without network access.
    pub async fn extract_html_preview(&self, url: &str) -> PreviewRecord {
        let Ok(parsed) = Url::parse(url) else {
            return PreviewRecord::fallback(url, &self.assets);
        };
        let record = self.html_preview(url, &parsed).await.record;
        self.cache.put(url, record.clone());
        record
    }

    /// Answer one cross-context request.
    ///
    /// `data` is always populated; `error` carries the reason a fallback
    /// was substituted.
    pub async fn handle(&self, request: PreviewRequest) -> PreviewResponse {
        match request {
            PreviewRequest::FetchPreview { url } => match self.try_resolve(&url).await {
                Ok(record) => PreviewResponse::ok(record),
                Err(e) => {
                    warn!(url = %url, error = %e, "fetchPreview failed, answering with fallback");
                    let fallback = PreviewRecord::fallback(&url, &self.assets);
                    PreviewResponse::with_error(fallback, e.to_string())
                }
            },
        }
    }

    fn image_preview(&self, url: &str) -> PreviewRecord {
        let domain = extract_domain(url);
        PreviewRecord {
            url: url.to_string(),
            title: "Image".to_string(),
            description: format!("Image from {domain}"),
            image: Some(url.to_string()),
            favicon: self.assets.favicon_for(&domain),
            domain,
        }
    }

    fn pdf_preview(&self, url: &str) -> PreviewRecord {
        let domain = extract_domain(url);
        let name = file_name(url).unwrap_or("document.pdf");
        PreviewRecord {
            url: url.to_string(),
            title: format!("PDF: {name}"),
            description: format!("PDF document from {domain}"),
            image: Some(self.assets.pdf_icon.clone()),
            favicon: self.assets.favicon_for(&domain),
            domain,
        }
    }

    fn video_preview(&self, url: &str) -> PreviewRecord {
        let domain = extract_domain(url);
        let name = file_name(url).unwrap_or("video");
        PreviewRecord {
            url: url.to_string(),
            title: format!("Video: {name}"),
            description: format!("Video from {domain}"),
            image: Some(self.assets.video_icon.clone()),
            favicon: self.assets.favicon_for(&domain),
            domain,
        }
    }

    async fn html_preview(&self, url: &str, parsed: &Url) -> Resolution {
        let markup = match self.relay.fetch_markup(parsed).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(
                    url,
                    relay = self.relay.name(),
                    error = %e,
                    "relay fetch failed, using domain-only preview"
                );
                metrics::counter!(telemetry::RELAY_FAILURES_TOTAL).increment(1);
                return Resolution::degraded(PreviewRecord::fallback(url, &self.assets));
            }
        };

        let metadata = parse_metadata(&markup, url);
        let domain = extract_domain(url);
        Resolution::complete(PreviewRecord {
            url: url.to_string(),
            title: metadata.title.unwrap_or_else(|| domain.clone()),
            description: metadata
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            image: metadata.image,
            favicon: self.assets.favicon_for(&domain),
            domain,
        })
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("probe", &self.probe.name())
            .field("relay", &self.relay.name())
            .field("cache", &self.cache)
            .finish()
    }
}
