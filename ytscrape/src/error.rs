//! Error types for extraction and pagination.
//!
//! Errors fall into five groups:
//!
//! - [`Error::Input`]: the caller handed us something we cannot work with (empty query,
//!   foreign host, mix playlist, ...). Never retried.
//! - [`Error::UpstreamShape`]: the response parsed, but a structural key we depend on is
//!   missing and there is no fallback for it.
//! - [`Error::UpstreamAlert`]: the response itself carries an error alert; the alert text is
//!   surfaced verbatim.
//! - [`Error::Transport`]: the HTTP collaborator failed (network, status, or body decode).
//! - [`Error::ExhaustedRetries`]: the initial data never showed up, even after retrying.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type returned by all client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The ID, URL, or query supplied by the caller is unusable.
    #[error("{0}")]
    Input(String),

    /// A required part of the upstream JSON is absent.
    #[error("unexpected response shape: {0}")]
    UpstreamShape(String),

    /// The upstream response reported an error alert.
    #[error("{0}")]
    UpstreamAlert(String),

    /// A request could not be completed.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    /// No initial data could be recovered after every attempt.
    ///
    /// When a dump directory is configured, `dump` points at the raw body of the last
    /// attempt.
    #[error("unsupported response: no initial data after {attempts} attempts")]
    ExhaustedRetries {
        attempts: u32,
        dump: Option<PathBuf>,
    },
}

impl Error {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::UpstreamShape(message.into())
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            Self::ExhaustedRetries { .. } => true,
            Self::Input(_) | Self::UpstreamShape(_) | Self::UpstreamAlert(_) => false,
        }
    }
}

/// Failures reported by a [`Transport`](crate::transport::Transport).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: http::StatusCode },

    #[error("response body is not valid JSON")]
    Decode(#[from] serde_json::Error),

    #[error("invalid header value")]
    Header(#[from] http::header::InvalidHeaderValue),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status } => status.is_server_error() || status.as_u16() == 429,
            Self::Decode(_) => true,
            Self::Header(_) => false,
        }
    }
}
