//! Pulling the embedded data out of page bodies.

use super::continuation::depth_first;
use super::text::text;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const INITIAL_DATA_MARKERS: [&str; 2] = ["var ytInitialData = ", "window[\"ytInitialData\"] = "];
const API_KEY_MARKER: &str = "\"INNERTUBE_API_KEY\":\"";
const CLIENT_VERSION_MARKERS: [&str; 3] = [
    "\"INNERTUBE_CONTEXT_CLIENT_VERSION\":\"",
    "innertube_context_client_version\":\"",
    "\"clientVersion\":\"",
];

static PLAYLIST_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""params":"([^"]+)"},"tooltip":"Search for Playlist""#)
        .expect("Should be able to parse the playlist params regex")
});

/// What could be recovered from one response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    /// The initial-data tree, when the page embedded one.
    pub initial_data: Option<Value>,
    pub api_key: Option<String>,
    pub client_version: Option<String>,
    /// The filter blob behind the "Search for Playlist" chip, still URL-encoded.
    pub playlist_params: Option<String>,
}

impl ParsedResponse {
    /// Scans an HTML page.
    pub fn from_html(body: &str) -> Self {
        let initial_data = INITIAL_DATA_MARKERS
            .iter()
            .find_map(|marker| initial_data_after(body, marker));

        let client_version = initial_data
            .as_ref()
            .and_then(tracked_client_version)
            .or_else(|| {
                CLIENT_VERSION_MARKERS
                    .iter()
                    .find_map(|marker| quoted_after(body, marker))
            });

        Self {
            api_key: quoted_after(body, API_KEY_MARKER),
            client_version,
            playlist_params: PLAYLIST_PARAMS
                .captures(body)
                .map(|c| c[1].to_string()),
            initial_data,
        }
    }

    /// Wraps an API response, which is the data tree itself.
    pub fn from_json(value: Value) -> Self {
        Self {
            client_version: tracked_client_version(&value),
            initial_data: Some(value),
            ..Self::default()
        }
    }
}

/// Returns the string that follows `marker` up to the next quote.
fn quoted_after(body: &str, marker: &str) -> Option<String> {
    let start = body.find(marker)? + marker.len();
    let len = body[start..].find('"')?;
    let value = &body[start..start + len];
    (!value.is_empty()).then(|| value.to_string())
}

/// Tries every occurrence of `marker` in body order. Pages sometimes carry an early
/// placeholder assignment before the real one.
fn initial_data_after(body: &str, marker: &str) -> Option<Value> {
    body.match_indices(marker)
        .find_map(|(at, _)| initial_data_at(&body[at + marker.len()..]))
}

fn initial_data_at(rest: &str) -> Option<Value> {
    let object = |literal: &str| {
        serde_json::from_str::<Value>(literal)
            .ok()
            .filter(Value::is_object)
    };

    if let Some(value) = rest.find(";</script>").and_then(|end| object(&rest[..end])) {
        return Some(value);
    }
    if let Some(value) = rest.find("};").and_then(|end| object(&rest[..=end])) {
        return Some(value);
    }

    // trailing script text follows the literal
    let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
    match values.next() {
        Some(Ok(value)) if value.is_object() => Some(value),
        _ => None,
    }
}

/// The `cver` entry of `responseContext.serviceTrackingParams`.
fn tracked_client_version(data: &Value) -> Option<String> {
    data.pointer("/responseContext/serviceTrackingParams")?
        .as_array()?
        .iter()
        .filter_map(|service| service.get("params")?.as_array())
        .flatten()
        .find(|param| param.get("key").and_then(Value::as_str) == Some("cver"))
        .and_then(|param| param.get("value")?.as_str())
        .map(str::to_string)
}

/// The text of the first `ERROR` alert in a response.
pub fn error_alert(data: &Value) -> Option<String> {
    data.get("alerts")?
        .as_array()?
        .iter()
        .filter_map(|alert| alert.get("alertRenderer"))
        .find(|alert| alert.get("type").and_then(Value::as_str) == Some("ERROR"))
        .map(|alert| text(alert.get("text")))
}

/// Finds the first value stored under `key` anywhere below `root`.
pub fn find_key<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    depth_first(root, |node| node.get(key).filter(|v| v.is_object()))
}
