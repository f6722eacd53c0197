//! Walking continuation tokens.

use super::client::Client;
use super::continuation::next_token;
use super::decode::decode_items;
use super::types::{ItemKind, PageResult, SessionContext};
use super::Item;
use crate::error::Error;
use crate::transport::Transport;
use reqwest::Url;
use serde_json::{Value, json};
use tracing::instrument;

const APPEND_ACTION_KEYS: [&str; 2] = ["onResponseReceivedActions", "onResponseReceivedCommands"];

/// Mutable state of one pagination run.
#[derive(Debug)]
struct FetchState {
    remaining: usize,
    items: Vec<Item>,
    token: Option<String>,
    context: Value,
}

/// Items gathered by a walk, plus the error that cut it short, if any.
#[derive(Debug)]
pub(crate) struct Walk {
    pub(crate) items: Vec<Item>,
    pub(crate) error: Option<Error>,
}

/// Replaces each `itemSectionRenderer` with its contents.
pub(crate) fn flatten_entries(entries: &[Value]) -> Vec<&Value> {
    let mut flat = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry
            .pointer("/itemSectionRenderer/contents")
            .and_then(Value::as_array)
        {
            Some(contents) => flat.extend(contents),
            None => flat.push(entry),
        }
    }
    flat
}

/// The appended items of a continuation response.
pub(crate) fn continuation_entries(response: &Value) -> Vec<&Value> {
    APPEND_ACTION_KEYS
        .iter()
        .find_map(|key| {
            response
                .get(*key)?
                .pointer("/0/appendContinuationItemsAction/continuationItems")?
                .as_array()
        })
        .map(|entries| flatten_entries(entries))
        .unwrap_or_default()
}

/// Decodes at most `budget` raw entries and finds the next token among all of them.
pub(crate) fn decode_page(entries: &[&Value], budget: usize, kind: Option<ItemKind>) -> PageResult {
    PageResult {
        items: decode_items(entries.iter().copied().take(budget), kind),
        continuation: next_token(entries.iter().copied()),
    }
}

impl<T: Transport> Client<T> {
    /// Follows continuation tokens from `first` until `limit` items are collected or the
    /// chain ends.
    ///
    /// A failed page ends the walk; what was gathered so far is kept.
    #[instrument(skip(self, endpoint, context, first), fields(endpoint = %endpoint))]
    pub(crate) async fn walk(
        &self,
        endpoint: Url,
        context: &SessionContext,
        first: PageResult,
        limit: usize,
        kind: Option<ItemKind>,
    ) -> Walk {
        let mut state = FetchState {
            remaining: limit.saturating_sub(first.items.len()),
            items: first.items,
            token: first.continuation,
            context: context.to_json(),
        };

        loop {
            let Some(token) = state.token.take() else {
                break;
            };
            if state.remaining < 1 {
                break;
            }

            let body = json!({ "context": state.context, "continuation": token });
            let response = match self.post_json(endpoint.clone(), &body).await {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(
                        collected = state.items.len(),
                        error = %error,
                        "continuation request failed, returning partial results"
                    );
                    return Walk {
                        items: state.items,
                        error: Some(error),
                    };
                }
            };

            let entries = continuation_entries(&response);
            let page = decode_page(&entries, state.remaining, kind);
            state.remaining = state.remaining.saturating_sub(page.items.len());
            tracing::debug!(
                returned_items = page.items.len(),
                remaining = state.remaining,
                has_continuation = page.continuation.is_some(),
                "fetched continuation page"
            );
            state.items.extend(page.items);
            state.token = page.continuation;
        }

        Walk {
            items: state.items,
            error: None,
        }
    }
}
