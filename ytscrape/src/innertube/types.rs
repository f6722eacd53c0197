//! Records produced by the decoder and the context object sent with every API request.

use crate::config::Locale;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// The kind of a decoded list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Video,
    Playlist,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Video => "video",
            ItemKind::Playlist => "playlist",
        })
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(ItemKind::Video),
            "playlist" => Ok(ItemKind::Playlist),
            other => Err(format!("unknown item kind `{other}`")),
        }
    }
}

/// An image variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u64,
    pub height: u64,
}

/// The channel an item belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub channel_id: String,
    pub url: String,
    /// Ordered by descending width.
    pub avatars: Vec<Thumbnail>,
    pub best_avatar: Option<Thumbnail>,
    pub verified: bool,
    pub badges: Vec<String>,
}

/// One decoded video or playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub id: String,
    pub url: String,
    pub title: String,
    /// Position within a playlist, when the page reports one.
    pub index: Option<u64>,
    pub duration: String,
    pub length_seconds: Option<u64>,
    /// Ordered by descending width.
    pub thumbnails: Vec<Thumbnail>,
    pub best_thumbnail: Option<Thumbnail>,
    pub description: String,
    pub author: Option<Author>,
    pub badges: Vec<String>,
    pub is_live: bool,
    pub is_upcoming: bool,
    pub is_premiere: bool,
    pub is_playable: bool,
    pub views: Option<u64>,
    pub published: String,
    /// Number of videos, for playlist items.
    pub video_count: Option<u64>,
}

impl Item {
    pub(crate) fn new(kind: ItemKind, id: String, url: String) -> Self {
        Self {
            kind,
            id,
            url,
            title: String::new(),
            index: None,
            duration: String::new(),
            length_seconds: None,
            thumbnails: Vec::new(),
            best_thumbnail: None,
            description: String::new(),
            author: None,
            badges: Vec::new(),
            is_live: false,
            is_upcoming: false,
            is_premiere: false,
            is_playable: true,
            views: None,
            published: String::new(),
            video_count: None,
        }
    }
}

/// Items decoded from one page plus the token for the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub continuation: Option<String>,
}

/// The client identification sent with every internal API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub client_name: String,
    pub client_version: String,
    pub locale: Locale,
    pub utc_offset_minutes: i32,
    pub safe_search: Option<bool>,
}

impl SessionContext {
    pub fn new(client_version: impl Into<String>, locale: Locale, utc_offset_minutes: i32) -> Self {
        Self {
            client_name: "WEB".to_string(),
            client_version: client_version.into(),
            locale,
            utc_offset_minutes,
            safe_search: None,
        }
    }

    pub fn with_safe_search(mut self, safe_search: bool) -> Self {
        self.safe_search = Some(safe_search);
        self
    }

    /// The `context` object of a request body.
    pub fn to_json(&self) -> Value {
        let mut context = json!({
            "client": {
                "clientName": self.client_name,
                "clientVersion": self.client_version,
                "gl": self.locale.gl,
                "hl": self.locale.hl,
                "utcOffsetMinutes": self.utc_offset_minutes,
            },
            "user": {},
            "request": {},
        });
        if let Some(safe_search) = self.safe_search {
            context["user"]["enableSafetyMode"] = Value::Bool(safe_search);
        }
        context
    }
}
