//! HTTP session with retry, connection pooling and checkpoint detection
//!
//! This module provides the shared HTTP session used by both crawl phases:
//! - Browser identity headers
//! - Connect and read timeouts
//! - Retry with exponential backoff on transient statuses and network errors
//! - Detection of anti-bot checkpoint redirects
//! - Charset-aware body decoding

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use reqwest::{header::CONTENT_TYPE, Client, Response};

use crate::config::Config;
use crate::crawler::headers::{build_browser_headers, site_referer};
use crate::utils::error::FetchError;
use crate::utils::retry::{retry_if, RetryPolicy};

/// Substring of a final URL that marks an anti-bot interstitial
pub const CHECKPOINT_MARKER: &str = "checkpoint";

/// Whether a response URL points at a checkpoint page
pub fn is_checkpoint_url(url: &str) -> bool {
    url.to_ascii_lowercase().contains(CHECKPOINT_MARKER)
}

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// URL after redirects
    pub final_url: String,

    /// HTTP status
    pub status: u16,

    /// Decoded body
    pub body: String,
}

/// Anything that can turn a URL into page markup
///
/// The orchestrator is generic over this so tests can script responses.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Build the shared HTTP session for a run
///
/// # Errors
///
/// Returns `FetchError::InvalidHeader` if the configured identity headers are
/// not valid header values, or `FetchError::Http` if the client cannot be
/// built.
pub fn create_session(config: &Config) -> Result<HttpFetcher, FetchError> {
    let referer = config
        .site
        .source
        .sends_referer()
        .then(|| site_referer(config.base_url()))
        .flatten();

    let headers = build_browser_headers(
        &config.http.user_agent,
        &config.http.accept_language,
        referer.as_deref(),
    )
    .map_err(|e| FetchError::InvalidHeader(e.to_string()))?;

    let client = Client::builder()
        .default_headers(headers)
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.read_timeout())
        .pool_max_idle_per_host(config.crawl.concurrency)
        .gzip(true)
        .cookie_store(true)
        .build()?;

    Ok(HttpFetcher::new(client, config.retry_policy()))
}

/// reqwest-backed fetcher shared read-only by every task in a phase
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client with pooled connections and identity headers
    client: Client,

    /// When and how long to back off
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn should_retry(&self, error: &FetchError) -> bool {
        match error {
            FetchError::Status(status) => self.retry.should_retry_status(*status),
            other => other.is_retryable(),
        }
    }

    /// One request without retries
    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e)
            }
        })?;

        let final_url = response.url().to_string();
        if is_checkpoint_url(&final_url) {
            return Err(FetchError::Checkpoint { url: final_url });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = decode_response(response).await?;

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        match retry_if(&self.retry, || self.fetch_once(url), |e| self.should_retry(e)).await {
            Ok(page) => Ok(page),
            Err((error, attempts)) if attempts > 1 && self.should_retry(&error) => {
                Err(FetchError::MaxRetriesExceeded {
                    attempts,
                    last: error.to_string(),
                })
            }
            Err((error, _)) => Err(error),
        }
    }
}

/// Read and decode a response body
async fn decode_response(response: Response) -> Result<String, FetchError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    if !content_type.is_empty() && !is_textual(&content_type) {
        return Err(FetchError::Decode(format!(
            "unexpected content type: {content_type}"
        )));
    }

    let bytes = response.bytes().await?;
    Ok(decode_bytes(&bytes, &content_type))
}

fn is_textual(content_type: &str) -> bool {
    content_type.starts_with("text/")
        || content_type.contains("html")
        || content_type.contains("xml")
        || content_type.contains("json")
}

/// Decode bytes using the declared charset, then UTF-8, then Windows-1252
///
/// # Examples
///
/// ```
/// use cekfakta::crawler::fetcher::decode_bytes;
///
/// assert_eq!(decode_bytes("Berita bohong".as_bytes(), "text/html"), "Berita bohong");
/// assert_eq!(decode_bytes(b"caf\xe9", "text/html; charset=iso-8859-1"), "café");
/// ```
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> String {
    let declared = content_type
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("charset="))
        .next()
        .and_then(|label| Encoding::for_label(label.trim_matches('"').as_bytes()));

    if let Some(encoding) = declared {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return text.into_owned();
        }
    }

    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}
