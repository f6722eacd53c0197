//! Session fields shared between consecutive searches.
//!
//! A results page reveals the client version and the playlist filter params. Later searches can
//! send these straight to the API and skip the page fetch.

use parking_lot::RwLock;

/// Session fields recovered from a search page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedSession {
    pub client_version: String,
    pub playlist_params: String,
}

impl CachedSession {
    fn is_complete(&self) -> bool {
        !self.client_version.is_empty() && !self.playlist_params.is_empty()
    }
}

/// Lets consecutive searches skip the results-page fetch.
///
/// Owned by a [`Client`](crate::Client) and shared between its clones.
#[derive(Debug, Default)]
pub struct SessionCache {
    inner: RwLock<CachedSession>,
}

impl SessionCache {
    /// Returns the cached session if it may be used for this call.
    ///
    /// Safe-search calls never reuse a session.
    pub fn reusable(&self, safe_search: bool) -> Option<CachedSession> {
        if safe_search {
            return None;
        }
        let session = self.inner.read();
        session.is_complete().then(|| session.clone())
    }

    /// Replaces both fields.
    pub fn store(&self, client_version: String, playlist_params: String) {
        let mut session = self.inner.write();
        *session = CachedSession {
            client_version,
            playlist_params,
        };
    }

    pub fn invalidate(&self) {
        let mut session = self.inner.write();
        *session = CachedSession::default();
    }

    pub fn snapshot(&self) -> CachedSession {
        self.inner.read().clone()
    }
}
