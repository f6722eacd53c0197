//! The scraping client and the request helpers shared by playlist and search.

use super::cache::SessionCache;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::{ReqwestTransport, Transport};
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;

/// The internal API endpoints that are posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Browse,
    Search,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Browse => "youtubei/v1/browse",
            Endpoint::Search => "youtubei/v1/search",
        }
    }
}

/// Scraping client for playlists and search results.
///
/// Cloning is cheap for the default transport, and clones share the search session cache.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestTransport> {
    pub(crate) transport: T,
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) cache: Arc<SessionCache>,
}

impl Client<ReqwestTransport> {
    /// Creates a client that talks HTTP through [`reqwest`].
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config).map_err(|source| Error::Transport {
            url: config.base_url.to_string(),
            source,
        })?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client on top of any [`Transport`].
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            cache: Arc::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The search session cache shared by this client and its clones.
    pub fn session_cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Resolves `path` against the configured base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| Error::input(format!("cannot build url for {path}: {e}")))
    }

    pub(crate) fn api_url(&self, endpoint: Endpoint, key: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint(endpoint.path())?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = key {
                query.append_pair("key", key);
            }
            if endpoint == Endpoint::Search {
                query.append_pair("prettyPrint", "false");
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    pub(crate) async fn get_text(&self, url: Url) -> Result<String> {
        let label = url.to_string();
        self.transport
            .get_text(url)
            .await
            .map_err(|source| Error::Transport { url: label, source })
    }

    pub(crate) async fn post_json(&self, url: Url, body: &Value) -> Result<Value> {
        let label = url.to_string();
        self.transport
            .post_json(url, body)
            .await
            .map_err(|source| Error::Transport { url: label, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::ScriptedTransport;

    fn client() -> Client<ScriptedTransport> {
        Client::with_transport(ScriptedTransport::default(), ClientConfig::default())
    }

    #[test]
    fn api_urls() {
        let client = client();
        assert_eq!(
            client.api_url(Endpoint::Browse, Some("AIzaKey")).unwrap().as_str(),
            "https://www.youtube.com/youtubei/v1/browse?key=AIzaKey"
        );
        assert_eq!(
            client.api_url(Endpoint::Browse, None).unwrap().as_str(),
            "https://www.youtube.com/youtubei/v1/browse"
        );
        assert_eq!(
            client.api_url(Endpoint::Search, None).unwrap().as_str(),
            "https://www.youtube.com/youtubei/v1/search?prettyPrint=false"
        );
    }

    #[test]
    fn endpoints_follow_base_url() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let client = Client::with_transport(
            ScriptedTransport::default(),
            ClientConfig::default().with_base_url(base),
        );
        assert_eq!(
            client.endpoint("playlist").unwrap().as_str(),
            "http://127.0.0.1:8080/playlist"
        );
    }
}
