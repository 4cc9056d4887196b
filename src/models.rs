// Core data structures for the cekfakta crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Serialized form of a field that could not be extracted
pub const ABSENT_MARKER: &str = "N/A";

/// Fact-check site being crawled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    TurnBackHoax,
    Kompas,
}

impl Source {
    /// Stable identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TurnBackHoax => "turnbackhoax",
            Self::Kompas => "kompas",
        }
    }

    /// Human-readable site name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TurnBackHoax => "TurnBackHoax",
            Self::Kompas => "Kompas Cek Fakta",
        }
    }

    /// Production listing root
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::TurnBackHoax => "https://turnbackhoax.id",
            Self::Kompas => "https://www.kompas.com/cekfakta/data-dan-fakta",
        }
    }

    /// Default prefix for output files
    pub fn default_file_prefix(&self) -> &'static str {
        match self {
            Self::TurnBackHoax => "turnbackhoax_data",
            Self::Kompas => "kompas_cekfakta_data",
        }
    }

    /// URL of listing page `page` (1-based) under `base`
    pub fn listing_url(&self, base: &str, page: u32) -> String {
        let base = base.trim_end_matches('/');
        match self {
            Self::TurnBackHoax => format!("{base}/page/{page}/"),
            Self::Kompas if page <= 1 => base.to_string(),
            Self::Kompas => format!("{base}/{page}"),
        }
    }

    /// URL requested by the connectivity probe
    pub fn probe_url(&self, base: &str) -> String {
        match self {
            Self::TurnBackHoax => format!("{}/", base.trim_end_matches('/')),
            Self::Kompas => self.listing_url(base, 1),
        }
    }

    /// Whether requests carry the site origin as `Referer`
    pub fn sends_referer(&self) -> bool {
        matches!(self, Self::Kompas)
    }

    /// All supported sources
    pub fn all() -> Vec<Self> {
        vec![Self::TurnBackHoax, Self::Kompas]
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "turnbackhoax" | "tbh" | "turnbackhoax.id" => Ok(Self::TurnBackHoax),
            "kompas" | "cekfakta" | "kompas.com" => Ok(Self::Kompas),
            other => Err(format!(
                "unknown source '{other}' (expected one of: turnbackhoax, kompas)"
            )),
        }
    }
}

/// Article discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStub {
    pub title: String,
    /// Site-native date with month names translated to Indonesian
    pub timestamp_raw: Option<String>,
    pub author: Option<String>,
    /// Absolute permalink
    pub url: String,
}

/// Fields extracted from an article page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArticleDetail {
    pub full_text: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    /// Set when fetching or parsing failed; every other field is then absent
    pub error: Option<String>,
}

impl ArticleDetail {
    /// Detail for an article that could not be fetched or parsed
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Merged record written to the output files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub timestamp: Option<String>,
    pub author: Option<String>,
    pub full_text: Option<String>,
    pub tags: Vec<String>,
    pub detail_error: Option<String>,
    /// False until the detail phase has merged into this record
    pub detail_merged: bool,
}

impl ArticleRecord {
    /// Phase-one record; detail fields unset
    pub fn from_stub(stub: ArticleStub) -> Self {
        Self {
            url: stub.url,
            title: stub.title,
            timestamp: stub.timestamp_raw,
            author: stub.author,
            full_text: None,
            tags: Vec::new(),
            detail_error: None,
            detail_merged: false,
        }
    }

    /// Fold a detail into the record.
    ///
    /// The detail's author wins when present. A missing listing timestamp is
    /// backfilled from the detail's date.
    pub fn merge_detail(&mut self, detail: ArticleDetail) {
        let ArticleDetail {
            full_text,
            date,
            author,
            tags,
            error,
        } = detail;

        self.full_text = full_text;
        self.tags = tags;
        self.detail_error = error;
        if author.is_some() {
            self.author = author;
        }
        if self.timestamp.is_none() {
            self.timestamp = date;
        }
        self.detail_merged = true;
    }

    pub fn has_full_text(&self) -> bool {
        self.full_text.is_some()
    }

    /// Row in output column order: Title, Timestamp, FullText, Tags, Author, Url
    pub fn to_row(&self) -> [String; 6] {
        let or_absent = |v: &Option<String>| v.clone().unwrap_or_else(|| ABSENT_MARKER.to_string());
        let tags = if self.tags.is_empty() {
            ABSENT_MARKER.to_string()
        } else {
            self.tags.join(", ")
        };

        [
            self.title.clone(),
            or_absent(&self.timestamp),
            or_absent(&self.full_text),
            tags,
            or_absent(&self.author),
            self.url.clone(),
        ]
    }
}

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub pages_requested: u32,
    pub pages_failed: u32,
    pub stubs_found: usize,
    pub duplicate_urls: usize,
    pub details_ok: usize,
    pub details_failed: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStats {
    /// Share of detail fetches that succeeded (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.details_ok + self.details_failed;
        if total == 0 {
            return 1.0;
        }
        self.details_ok as f64 / total as f64
    }

    /// Wall-clock duration, once finished
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        Some(self.finished_at? - self.started_at?)
    }
}
