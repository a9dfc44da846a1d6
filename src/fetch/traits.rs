//! Network seams used by the resolver.
//!
//! The resolver talks to the network through two narrow traits so the
//! transport can be swapped (or mocked) without touching classification or
//! extraction:
//!
//! - [`ContentProbe`]: header-only request that reports the declared
//!   content type of a URL.
//! - [`MarkupRelay`]: server-side fetch proxy that returns a page's raw
//!   markup, sidestepping cross-origin body-read restrictions.
//!
//! # Failure semantics
//!
//! Both traits return `Err` for transport problems. The resolver absorbs
//! every such error: a failed probe means "assume HTML", a failed relay
//! means "domain-only record". Implementations should therefore not retry
//! or synthesize defaults themselves.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// Reports the declared content type of a URL without transferring a body.
#[async_trait]
pub trait ContentProbe: Send + Sync {
    /// Probe name for logging/debugging.
    fn name(&self) -> &str;

    /// Declared content type, or `None` when the response carries none
    /// (or it is not observable).
    async fn content_type(&self, url: &Url) -> Result<Option<String>>;
}

/// Retrieves the raw markup of a page through a relay.
#[async_trait]
pub trait MarkupRelay: Send + Sync {
    /// Relay name for logging/debugging.
    fn name(&self) -> &str;

    /// Raw HTML of `url`.
    ///
    /// Returns an error when the relay is unreachable, answers with a
    /// non-success status, or returns no content.
    async fn fetch_markup(&self, url: &Url) -> Result<String>;
}
