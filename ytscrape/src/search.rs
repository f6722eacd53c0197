//! Search result scraping.

use crate::config::{DEFAULT_CLIENT_VERSION, SearchOptions, YOUTUBE_BASE_URL};
use crate::dump::write_dump;
use crate::error::{Error, Result};
use crate::innertube::{
    CachedSession, Client, Endpoint, Item, ItemKind, ParsedResponse, SessionContext, decode_page,
    find_key, flatten_entries,
};
use crate::transport::Transport;
use reqwest::Url;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

/// Filter blob that restricts results to playlists.
const DEFAULT_PLAYLIST_PARAMS: &str = "EgIQAw==";

/// A search query, possibly unpacked from a filter link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    /// The `sp` filter of a `/results` link.
    pub params: Option<String>,
}

/// Accepts a plain query or a `https://www.youtube.com/results?search_query=..&sp=..` link.
pub fn parse_search_query(input: &str) -> Result<SearchQuery> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::input("search string is mandatory"));
    }

    let plain = || SearchQuery {
        query: input.to_string(),
        params: None,
    };
    if !input.starts_with(YOUTUBE_BASE_URL.as_str()) {
        return Ok(plain());
    }
    let Ok(url) = Url::parse(input) else {
        return Ok(plain());
    };
    if url.path() != "/results" {
        return Ok(plain());
    }

    let find = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };
    let params = find("sp");
    match find("search_query") {
        Some(query) => Ok(SearchQuery { query, params }),
        None if params.is_some() => Err(Error::input(
            "filter links have to include a 'search_query' query",
        )),
        None => Ok(plain()),
    }
}

/// Scraped search results.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub query: String,
    /// The upstream's estimate of the total hit count.
    pub estimated_results: u64,
    pub items: Vec<Item>,
    /// Set when a continuation page failed; `items` holds what was fetched before it.
    #[serde(skip)]
    pub interrupted: Option<Error>,
}

/// The playlist filter in the percent-encoded form it has in page markup.
fn default_playlist_params() -> String {
    form_urlencoded::byte_serialize(DEFAULT_PLAYLIST_PARAMS.as_bytes()).collect()
}

/// Percent-decodes a filter blob scraped from page markup.
fn decode_params(raw: &str) -> String {
    form_urlencoded::parse(format!("p={raw}").as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

impl<T: Transport> Client<T> {
    /// Searches for videos or playlists.
    ///
    /// The results page is fetched once and the client version and playlist filter found on
    /// it are cached, so later searches on the same client (safe-search excepted) go straight
    /// to the search API. Results beyond the first page are fetched through continuation
    /// tokens until `opts.limit` items are collected.
    #[instrument(skip(self, opts), fields(kind = %opts.kind, limit = opts.limit, safe_search = opts.safe_search))]
    pub async fn search(&self, query: &str, opts: &SearchOptions) -> Result<SearchResult> {
        let query = parse_search_query(query)?;
        let limit = opts.effective_limit();
        let attempts = self.config.attempts.max(1);

        let mut last_body = String::new();
        for attempt in 1..=attempts {
            if attempt > 1 {
                self.cache.invalidate();
                tracing::warn!(attempt, attempts, "retrying search with a fresh session");
            }

            let (mut data, session) = match self.cache.reusable(opts.safe_search) {
                Some(session) => {
                    tracing::debug!(client_version = %session.client_version, "reusing cached search session");
                    (None, session)
                }
                None => {
                    let body = self.get_text(self.results_url(&query, opts)?).await?;
                    let page = ParsedResponse::from_html(&body);
                    let session = CachedSession {
                        client_version: page
                            .client_version
                            .unwrap_or_else(|| DEFAULT_CLIENT_VERSION.to_string()),
                        playlist_params: page
                            .playlist_params
                            .unwrap_or_else(default_playlist_params),
                    };
                    self.cache
                        .store(session.client_version.clone(), session.playlist_params.clone());
                    last_body = body;
                    (page.initial_data, session)
                }
            };

            let mut context = SessionContext::new(
                session.client_version.clone(),
                opts.locale.clone(),
                opts.utc_offset_minutes,
            );
            if opts.safe_search {
                context = context.with_safe_search(true);
            }

            if opts.kind == ItemKind::Playlist || opts.safe_search || data.is_none() {
                let body = search_body(&query, &context, opts.kind, &session);
                match self.post_json(self.api_url(Endpoint::Search, None)?, &body).await {
                    Ok(response) => data = Some(response),
                    Err(e) => tracing::warn!(attempt, error = %e, "search request failed"),
                }
            }

            if let Some(data) = data {
                return self
                    .search_from_data(query.query, &data, &context, opts.kind, limit)
                    .await;
            }
        }

        let dump = match &self.config.dump_dir {
            Some(dir) if !last_body.is_empty() => write_dump(dir, &last_body).await,
            _ => None,
        };
        Err(Error::ExhaustedRetries { attempts, dump })
    }

    fn results_url(&self, query: &SearchQuery, opts: &SearchOptions) -> Result<Url> {
        let mut url = self.endpoint("results")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("search_query", &query.query);
            pairs.append_pair("gl", &opts.locale.gl);
            pairs.append_pair("hl", &opts.locale.hl);
            if let Some(sp) = &query.params {
                pairs.append_pair("sp", sp);
            }
        }
        Ok(url)
    }

    async fn search_from_data(
        &self,
        query: String,
        data: &Value,
        context: &SessionContext,
        kind: ItemKind,
        limit: usize,
    ) -> Result<SearchResult> {
        let sections = data
            .pointer("/contents/twoColumnSearchResultsRenderer")
            .or_else(|| find_key(data, "twoColumnSearchResultsRenderer"))
            .and_then(|r| r.pointer("/primaryContents/sectionListRenderer/contents"))
            .or_else(|| data.pointer("/contents/sectionListRenderer/contents"))
            .and_then(Value::as_array)
            .ok_or_else(|| Error::shape("invalid response format"))?;

        let entries = flatten_entries(sections);
        let first = decode_page(&entries, limit, Some(kind));
        tracing::debug!(
            returned_items = first.items.len(),
            has_continuation = first.continuation.is_some(),
            "decoded first search page"
        );

        let estimated_results = data
            .get("estimatedResults")
            .and_then(|v| v.as_str().and_then(|s| s.parse().ok()).or_else(|| v.as_u64()))
            .unwrap_or(0);

        let walk = self
            .walk(
                self.api_url(Endpoint::Search, None)?,
                context,
                first,
                limit,
                Some(kind),
            )
            .await;

        Ok(SearchResult {
            query,
            estimated_results,
            items: walk.items,
            interrupted: walk.error,
        })
    }
}

fn search_body(
    query: &SearchQuery,
    context: &SessionContext,
    kind: ItemKind,
    session: &CachedSession,
) -> Value {
    let mut body = json!({ "context": context.to_json(), "query": query.query });
    let params = query.params.clone().or_else(|| {
        (kind == ItemKind::Playlist).then(|| {
            Some(decode_params(&session.playlist_params))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PLAYLIST_PARAMS.to_string())
        })
    });
    if let Some(params) = params {
        body["params"] = Value::String(params);
    }
    body
}
