//! linkpeek - hover previews for hyperlinks
//!
//! Given a URL, linkpeek works out what kind of content it points to,
//! retrieves descriptive metadata despite cross-origin restrictions and
//! normalizes it into an always-populated [`PreviewRecord`], cached in
//! memory with a bounded FIFO-on-overflow policy.
//!
//! Two roles cooperate over an asynchronous request/response channel:
//!
//! - [`Resolver`]: probes content types, fetches markup through a relay,
//!   extracts metadata and owns the authoritative cache.
//! - [`ClientDispatcher`]: turns hover events into requests, keeps a
//!   secondary cache and drives a [`Renderer`](render::Renderer).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use linkpeek::{PreviewChannel, PreviewRequest, Resolver, spawn_resolver};
//!
//! #[tokio::main]
//! async fn main() -> linkpeek::Result<()> {
//!     let resolver = Arc::new(Resolver::builder().build()?);
//!     let (handle, _task) = spawn_resolver(resolver, 64);
//!
//!     let response = handle
//!         .send(PreviewRequest::fetch("https://www.rust-lang.org/"))
//!         .await?;
//!     println!("{}: {}", response.data.title, response.data.description);
//!     Ok(())
//! }
//! ```
//!
//! # Extraction only
//!
//! ```rust
//! let html = r#"<head><meta property="og:title" content="Hello"></head>"#;
//! let metadata = linkpeek::extract::parse_metadata(html, "https://example.com/");
//! assert_eq!(metadata.title.as_deref(), Some("Hello"));
//! ```

pub mod cache;
pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod render;
pub mod resolver;
pub mod settings;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, PreviewCache};
pub use channel::{PreviewChannel, ResolverHandle, spawn_resolver};
pub use client::ClientDispatcher;
pub use config::Config;
pub use error::{LinkPeekError, Result};
pub use fetch::{ContentProbe, HttpProbe, MarkupRelay, RelayClient};
pub use resolver::{Resolver, ResolverBuilder};
pub use settings::SettingsStore;

pub use types::{
    ClientMessage, ContentCategory, ContentTypes, PreviewAssets, PreviewRecord, PreviewRequest,
    PreviewResponse, Settings,
};
