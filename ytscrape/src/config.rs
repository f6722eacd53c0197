//! Client-wide configuration and per-call options.

use crate::innertube::ItemKind;
use reqwest::Url;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

pub(crate) static YOUTUBE_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://www.youtube.com/").expect("Should be able to parse the YouTube base URL")
});

/// The origin serves reduced markup without the embedded data to non-browser agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Skips the cookie consent interstitial in regions that show one.
pub const CONSENT_COOKIE: &str = "SOCS=CAI";

/// Used when a page does not reveal its own client version.
pub const DEFAULT_CLIENT_VERSION: &str = "2.20240606.06.00";

pub const DEFAULT_PLAYLIST_LIMIT: usize = 100;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Settings shared by every request a [`Client`](crate::Client) makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin for page and API requests. Canonical item URLs always point at youtube.com.
    pub base_url: Url,
    /// Per-request timeout. A long pagination chain has no aggregate deadline.
    pub timeout: Duration,
    /// Top-level attempts before giving up on a response without initial data.
    pub attempts: u32,
    pub user_agent: String,
    pub consent_cookie: Option<String>,
    /// Where raw bodies are saved when all attempts fail. `None` disables dumping.
    pub dump_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: YOUTUBE_BASE_URL.clone(),
            timeout: Duration::from_secs(30),
            attempts: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            consent_cookie: Some(CONSENT_COOKIE.to_string()),
            dump_dir: Some(PathBuf::from("dumps")),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_dump_dir(mut self, dump_dir: Option<PathBuf>) -> Self {
        self.dump_dir = dump_dir;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Region (`gl`) and interface language (`hl`) sent with requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub gl: String,
    pub hl: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            gl: "US".to_string(),
            hl: "en".to_string(),
        }
    }
}

/// Options for [`Client::get_playlist`](crate::Client::get_playlist).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistOptions {
    /// Maximum number of items to collect; `0` means the default of 100.
    pub limit: usize,
    /// Appended to the page request when set.
    pub locale: Option<Locale>,
    pub utc_offset_minutes: Option<i32>,
}

impl Default for PlaylistOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PLAYLIST_LIMIT,
            locale: None,
            utc_offset_minutes: None,
        }
    }
}

impl PlaylistOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub(crate) fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_PLAYLIST_LIMIT
        } else {
            self.limit
        }
    }
}

/// Options for [`Client::search`](crate::Client::search).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Only items of this kind are returned.
    pub kind: ItemKind,
    /// Maximum number of items to collect; `0` means the default of 10.
    pub limit: usize,
    /// Asks for restricted results. Always forces a fresh session fetch.
    pub safe_search: bool,
    pub locale: Locale,
    pub utc_offset_minutes: i32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            kind: ItemKind::Video,
            limit: DEFAULT_SEARCH_LIMIT,
            safe_search: false,
            locale: Locale::default(),
            utc_offset_minutes: -300,
        }
    }
}

impl SearchOptions {
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_safe_search(mut self, safe_search: bool) -> Self {
        self.safe_search = safe_search;
        self
    }

    pub(crate) fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_SEARCH_LIMIT
        } else {
            self.limit
        }
    }
}
