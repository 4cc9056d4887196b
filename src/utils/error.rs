//! Error types for the cekfakta crawler
//!
//! Each layer gets its own enum: fetching, markup parsing and the crawl run
//! itself. The unified [`crate::error::Error`] wraps all of them.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection refused, reset, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connect or read timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-success status that is not retried
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// Retries exhausted on a transient failure
    #[error("Maximum retry attempts exceeded after {attempts} attempts (last: {last})")]
    MaxRetriesExceeded { attempts: u32, last: String },

    /// Response landed on an anti-bot checkpoint page
    #[error("Blocked by checkpoint page: {url}")]
    Checkpoint { url: String },

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Identity header value that HTTP cannot carry
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl FetchError {
    /// Whether the failure is transient and worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Whether the failure came from bot defenses
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Checkpoint { .. })
    }
}

/// Errors that can occur during parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    /// No content container and no inline payload
    #[error("Content not found in article")]
    ContentNotFound,

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Listing container without a usable link
    #[error("Article container has no permalink")]
    MissingPermalink,

    /// Inline metadata block that could not be decoded
    #[error("Invalid inline payload: {0}")]
    InvalidPayload(String),
}

/// Run-level crawler errors
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// Fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Connectivity probe failed or was blocked; nothing was crawled
    #[error("Connectivity probe to {url} failed: {source}")]
    ProbeFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Listing phase produced no stubs
    #[error("No articles found across {pages} listing pages")]
    NoArticlesFound { pages: u32 },
}
