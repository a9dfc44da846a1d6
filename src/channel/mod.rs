//! Cross-context request/response channel.
//!
//! A client never calls the resolver directly; it sends a
//! [`PreviewRequest`] over a [`PreviewChannel`] and awaits exactly one
//! [`PreviewResponse`]. The trait is transport-agnostic:
//!
//! - [`ResolverHandle`]: in-process channel backed by a tokio `mpsc` queue
//!   and a `oneshot` reply per request, served by [`spawn_resolver`].
//! - `Resolver` itself implements [`PreviewChannel`] for callers that share
//!   its context.
//!
//! Errors from [`PreviewChannel::send`] mean the exchange itself failed
//! (closed channel, dropped reply, undecodable payload). A resolver-side
//! failure is never an error here; it arrives as fallback `data` with an
//! advisory `error` string.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::resolver::Resolver;
use crate::types::{PreviewRequest, PreviewResponse};
use crate::{LinkPeekError, Result};

/// Default number of requests queued before senders wait.
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// Asynchronous request/response exchange with a resolver.
#[async_trait]
pub trait PreviewChannel: Send + Sync {
    /// Send one request and wait for its single response.
    async fn send(&self, request: PreviewRequest) -> Result<PreviewResponse>;
}

#[async_trait]
impl PreviewChannel for Resolver {
    async fn send(&self, request: PreviewRequest) -> Result<PreviewResponse> {
        Ok(self.handle(request).await)
    }
}

#[async_trait]
impl<T: PreviewChannel + ?Sized> PreviewChannel for Arc<T> {
    async fn send(&self, request: PreviewRequest) -> Result<PreviewResponse> {
        (**self).send(request).await
    }
}

/// A queued request with its reply slot.
struct Envelope {
    request: PreviewRequest,
    reply: oneshot::Sender<PreviewResponse>,
}

/// Client end of an in-process resolver channel. Cheap to clone.
#[derive(Clone)]
pub struct ResolverHandle {
    tx: mpsc::Sender<Envelope>,
}

#[async_trait]
impl PreviewChannel for ResolverHandle {
    async fn send(&self, request: PreviewRequest) -> Result<PreviewResponse> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| LinkPeekError::ChannelClosed)?;
        response.await.map_err(|_| LinkPeekError::NoResponse)
    }
}

/// Serve `resolver` on a new channel.
///
/// Each request is handled on its own task, so a slow resolution never
/// holds up other requests. The serving task ends once every
/// [`ResolverHandle`] has been dropped.
///
/// # Panics
///
/// Requires a tokio runtime context (called within an async fn).
pub fn spawn_resolver(resolver: Arc<Resolver>, buffer: usize) -> (ResolverHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Envelope>(buffer.max(1));

    let task = tokio::spawn(async move {
        while let Some(Envelope { request, reply }) = rx.recv().await {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move {
                let response = resolver.handle(request).await;
                if reply.send(response).is_err() {
                    debug!("requester went away before the preview was ready");
                }
            });
        }
        debug!("resolver channel closed");
    });

    (ResolverHandle { tx }, task)
}

/// Decode a response received as JSON.
///
/// Used by transports that carry the protocol as text; a payload without
/// `data` is a protocol failure.
pub fn decode_response(payload: &str) -> Result<PreviewResponse> {
    Ok(serde_json::from_str(payload)?)
}
