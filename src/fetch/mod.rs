//! Network access: content-type probing and markup relaying.

pub mod http;
pub mod traits;

pub use http::{DEFAULT_RELAY_URL, DEFAULT_REQUEST_TIMEOUT, HttpProbe, RelayClient, http_client};
pub use traits::{ContentProbe, MarkupRelay};
