//! Playlist lookup: resolving links to playlist IDs and scraping playlist pages.

use crate::config::{DEFAULT_CLIENT_VERSION, PlaylistOptions};
use crate::dump::write_dump;
use crate::error::{Error, Result};
use crate::innertube::decode::{PLAYLIST_URL, thumbnails, video_owner};
use crate::innertube::text::{number, text};
use crate::innertube::{
    Author, Client, Endpoint, Item, ItemKind, ParsedResponse, SessionContext, Thumbnail,
    decode_page, error_alert, flatten_entries,
};
use crate::transport::Transport;
use regex::Regex;
use reqwest::Url;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::LazyLock;
use tracing::instrument;

static PLAYLIST_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(FL|PL|UU|LL)[a-zA-Z0-9_-]{16,41}$")
        .expect("Should be able to parse the playlist id regex")
});
static ALBUM_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^OLAK5uy_[a-zA-Z0-9_-]{33}$").expect("Should be able to parse the album id regex")
});
static CHANNEL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^UC[a-zA-Z0-9_-]{22,32}$").expect("Should be able to parse the channel id regex")
});
static MIX_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^RD[a-zA-Z0-9_-]+$").expect("Should be able to parse the mix id regex")
});
static CHANNEL_ON_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"channel_id=UC([\w-]{22,32})""#)
        .expect("Should be able to parse the channel page regex")
});

const KNOWN_HOSTS: [&str; 3] = ["www.youtube.com", "youtube.com", "music.youtube.com"];

/// What a playlist link or ID points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistRef {
    /// A playlist ID that can be fetched directly.
    Id(String),
    /// A `user/<name>` or `c/<name>` channel page whose uploads playlist must be looked up.
    ChannelPage(String),
}

fn is_playlist_id(s: &str) -> bool {
    PLAYLIST_ID.is_match(s) || ALBUM_ID.is_match(s)
}

fn uploads_of(channel_id: &str) -> String {
    format!("UU{}", &channel_id[2..])
}

/// Classifies a playlist ID, channel ID, or youtube link without touching the network.
pub fn parse_playlist_ref(link_or_id: &str) -> Result<PlaylistRef> {
    let link_or_id = link_or_id.trim();
    if link_or_id.is_empty() {
        return Err(Error::input("the link or id has to be a non-empty string"));
    }
    if is_playlist_id(link_or_id) {
        return Ok(PlaylistRef::Id(link_or_id.to_string()));
    }
    if CHANNEL_ID.is_match(link_or_id) {
        return Ok(PlaylistRef::Id(uploads_of(link_or_id)));
    }
    if MIX_ID.is_match(link_or_id) {
        return Err(Error::input("mixes not supported"));
    }

    let not_found = || Error::input(format!("unable to find a id in \"{link_or_id}\""));
    let url = Url::parse(link_or_id).map_err(|_| not_found())?;
    if !url.host_str().is_some_and(|host| KNOWN_HOSTS.contains(&host)) {
        return Err(Error::input("not a known youtube link"));
    }

    if let Some((_, list)) = url.query_pairs().find(|(k, _)| k == "list") {
        if is_playlist_id(&list) {
            return Ok(PlaylistRef::Id(list.into_owned()));
        }
        if list.starts_with("RD") {
            return Err(Error::input("mixes not supported"));
        }
        return Err(Error::input("invalid or unknown list query in url"));
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    let [.., kind, id] = segments.as_slice() else {
        return Err(not_found());
    };
    match *kind {
        "channel" if CHANNEL_ID.is_match(id) => Ok(PlaylistRef::Id(uploads_of(id))),
        "user" | "c" => Ok(PlaylistRef::ChannelPage(format!("{kind}/{id}"))),
        _ => Err(not_found()),
    }
}

/// Whether `link_or_id` looks like something [`Client::get_playlist`] can handle.
pub fn validate_id(link_or_id: &str) -> bool {
    parse_playlist_ref(link_or_id).is_ok()
}

/// A scraped playlist.
#[derive(Debug, Serialize)]
pub struct Playlist {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    /// The widest thumbnail of the playlist header.
    pub thumbnail: Option<Thumbnail>,
    pub total_items: u64,
    pub views: Option<u64>,
    pub last_updated: String,
    pub owner: Option<Author>,
    pub items: Vec<Item>,
    /// Set when a continuation page failed; `items` holds what was fetched before it.
    #[serde(skip)]
    pub interrupted: Option<Error>,
}

impl<T: Transport> Client<T> {
    /// Turns a playlist link, playlist ID, or channel reference into a playlist ID.
    ///
    /// Channel IDs map to their uploads playlist. `user/` and `c/` links need one page fetch to
    /// learn the channel ID.
    #[instrument(skip(self))]
    pub async fn resolve_playlist_id(&self, link_or_id: &str) -> Result<String> {
        let path = match parse_playlist_ref(link_or_id)? {
            PlaylistRef::Id(id) => return Ok(id),
            PlaylistRef::ChannelPage(path) => path,
        };

        let body = self.get_text(self.endpoint(&path)?).await?;
        let channel = CHANNEL_ON_PAGE
            .captures(&body)
            .map(|c| format!("UU{}", &c[1]))
            .ok_or_else(|| Error::shape(format!("unable to resolve the ref: {path}")))?;
        tracing::debug!(%path, playlist_id = %channel, "resolved channel page");
        Ok(channel)
    }

    /// Fetches a playlist's metadata and up to `opts.limit` of its videos.
    ///
    /// The first page comes from the playlist page itself (or a browse request when the page
    /// has no embedded data); the rest is fetched through continuation tokens. If a
    /// continuation request fails, the items gathered so far are returned with the error in
    /// [`Playlist::interrupted`].
    ///
    /// # Errors
    ///
    /// * [`Error::Input`] for links and IDs that do not name a playlist, including mixes
    /// * [`Error::UpstreamAlert`] when the page reports an error (private or deleted lists)
    /// * [`Error::UpstreamShape`] for an unknown or empty playlist
    /// * [`Error::ExhaustedRetries`] when no attempt yielded data
    #[instrument(skip(self, opts), fields(limit = opts.limit))]
    pub async fn get_playlist(&self, link_or_id: &str, opts: &PlaylistOptions) -> Result<Playlist> {
        let id = self.resolve_playlist_id(link_or_id).await?;
        let limit = opts.effective_limit();
        let attempts = self.config.attempts.max(1);

        let mut last_body = String::new();
        for attempt in 1..=attempts {
            let body = self.get_text(self.playlist_page_url(&id, opts)?).await?;
            let mut parsed = ParsedResponse::from_html(&body);
            let context = SessionContext::new(
                parsed
                    .client_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CLIENT_VERSION.to_string()),
                opts.locale.clone().unwrap_or_default(),
                opts.utc_offset_minutes.unwrap_or(0),
            );

            if parsed.initial_data.is_none() {
                parsed.initial_data = self.browse_playlist(&id, &parsed, &context).await;
            }

            if let Some(data) = parsed.initial_data.take() {
                return self
                    .playlist_from_data(id, &data, parsed.api_key.as_deref(), &context, limit)
                    .await;
            }

            tracing::warn!(attempt, attempts, "playlist response had no initial data");
            last_body = body;
        }

        let dump = match &self.config.dump_dir {
            Some(dir) => write_dump(dir, &last_body).await,
            None => None,
        };
        Err(Error::ExhaustedRetries { attempts, dump })
    }

    fn playlist_page_url(&self, id: &str, opts: &PlaylistOptions) -> Result<Url> {
        let mut url = self.endpoint("playlist")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("list", id);
            if let Some(locale) = &opts.locale {
                query.append_pair("gl", &locale.gl);
                query.append_pair("hl", &locale.hl);
            }
        }
        Ok(url)
    }

    /// Asks the browse endpoint directly. Failure is not fatal; the caller retries.
    async fn browse_playlist(
        &self,
        id: &str,
        parsed: &ParsedResponse,
        context: &SessionContext,
    ) -> Option<Value> {
        if parsed.api_key.is_none() {
            tracing::warn!("playlist page carried no api key, browsing without one");
        }
        let url = self
            .api_url(Endpoint::Browse, parsed.api_key.as_deref())
            .ok()?;
        let body = json!({ "context": context.to_json(), "browseId": format!("VL{id}") });
        match self.post_json(url, &body).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(error = %e, "browse fallback failed");
                None
            }
        }
    }

    async fn playlist_from_data(
        &self,
        id: String,
        data: &Value,
        api_key: Option<&str>,
        context: &SessionContext,
        limit: usize,
    ) -> Result<Playlist> {
        if data.get("contents").is_none() {
            if let Some(alert) = error_alert(data) {
                return Err(Error::UpstreamAlert(alert));
            }
        }

        let sidebar = data
            .pointer("/sidebar/playlistSidebarRenderer/items")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::shape("unknown playlist"))?;
        let info = sidebar
            .iter()
            .find_map(|i| i.get("playlistSidebarPrimaryInfoRenderer"))
            .ok_or_else(|| Error::shape("unknown playlist"))?;
        let owner = sidebar
            .iter()
            .find_map(|i| {
                i.pointer("/playlistSidebarSecondaryInfoRenderer/videoOwner/videoOwnerRenderer")
            })
            .and_then(video_owner);

        let stats = info
            .get("stats")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let (views, last_updated) = match stats {
            [_, views, updated, ..] => (Some(number(Some(views))), text(Some(updated))),
            _ => (None, String::new()),
        };

        let thumbnail = ["playlistVideoThumbnailRenderer", "playlistCustomThumbnailRenderer"]
            .iter()
            .find_map(|key| info.get("thumbnailRenderer")?.get(*key))
            .and_then(|r| thumbnails(r.pointer("/thumbnail/thumbnails")).into_iter().next());

        let video_list = playlist_video_list(data).ok_or_else(|| Error::shape("empty playlist"))?;
        let entries = flatten_entries(video_list);
        let first = decode_page(&entries, limit, Some(ItemKind::Video));
        tracing::debug!(
            returned_items = first.items.len(),
            has_continuation = first.continuation.is_some(),
            "decoded first playlist page"
        );

        let walk = self
            .walk(
                self.api_url(Endpoint::Browse, api_key)?,
                context,
                first,
                limit,
                Some(ItemKind::Video),
            )
            .await;

        Ok(Playlist {
            url: format!("{PLAYLIST_URL}{id}"),
            id,
            title: text(info.get("title")),
            description: text(info.get("description")),
            thumbnail,
            total_items: stats.first().map(|s| number(Some(s))).unwrap_or(0),
            views,
            last_updated,
            owner,
            items: walk.items,
            interrupted: walk.error,
        })
    }
}

fn playlist_video_list(data: &Value) -> Option<&Vec<Value>> {
    data.pointer("/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents")?
        .as_array()?
        .iter()
        .find_map(|s| s.get("itemSectionRenderer"))?
        .get("contents")?
        .as_array()?
        .iter()
        .find_map(|c| c.get("playlistVideoListRenderer"))?
        .get("contents")?
        .as_array()
}
