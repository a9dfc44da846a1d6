//! Public types for the linkpeek API.

mod assets;
mod category;
mod message;
mod record;
mod settings;

pub use assets::PreviewAssets;
pub use category::{ContentCategory, ContentTypes, HTML_CONTENT_TYPE};
pub use message::{ClientMessage, PreviewRequest, PreviewResponse};
pub use record::{FALLBACK_DESCRIPTION, NO_DESCRIPTION, PreviewRecord, extract_domain};
pub use settings::{DEFAULT_HOVER_DELAY_MS, Settings};

pub(crate) use record::file_name;
