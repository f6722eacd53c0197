//! The response-extraction and pagination engine.
//!
//! Pages and internal API responses are loosely typed JSON trees. The submodules here project
//! them as [`serde_json::Value`] rather than deserializing into fixed structs, because the
//! upstream shape shifts between renderers and over time.

pub mod cache;
mod client;
pub mod continuation;
pub mod decode;
pub mod locate;
mod paginate;
pub mod text;
mod types;

pub use cache::{CachedSession, SessionCache};
pub use client::Client;
pub(crate) use client::Endpoint;
pub use continuation::{continuation_token, next_token};
pub use decode::{decode_item, decode_items};
pub use locate::{ParsedResponse, error_alert, find_key};
pub(crate) use paginate::{decode_page, flatten_entries};
pub use types::{Author, Item, ItemKind, PageResult, SessionContext, Thumbnail};
