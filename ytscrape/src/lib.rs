//! Playlist and search scraping for YouTube.
//!
//! The data lives in JSON trees that are either embedded in HTML pages (`ytInitialData`) or
//! returned by the internal `youtubei/v1` API. A [`Client`] fetches those, decodes the list
//! entries into [`Item`]s, and follows continuation tokens until the requested number of
//! items has been collected.
//!
//! ```no_run
//! # async fn run() -> ytscrape::Result<()> {
//! use ytscrape::{Client, ClientConfig, PlaylistOptions};
//!
//! let client = Client::new(ClientConfig::default())?;
//! let playlist = client
//!     .get_playlist("PLpas7-jjCh0Z7-t9yqhg3ibXTgeZhtH-G", &PlaylistOptions::default())
//!     .await?;
//! for item in &playlist.items {
//!     println!("{} {}", item.id, item.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dump;
pub mod error;
pub mod innertube;
pub mod playlist;
pub mod search;
pub mod transport;

pub use config::{ClientConfig, Locale, PlaylistOptions, SearchOptions};
pub use error::{Error, Result, TransportError};
pub use innertube::{Author, Client, Item, ItemKind, Thumbnail};
pub use playlist::{Playlist, PlaylistRef, parse_playlist_ref, validate_id};
pub use search::{SearchQuery, SearchResult, parse_search_query};
pub use transport::{ReqwestTransport, Transport};
