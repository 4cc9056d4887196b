//! Chunked CSV output and failure manifest
//!
//! Records are written in the order they are given, split into files of at
//! most `chunk_size` rows. Every file carries the header row, so each chunk
//! is self-contained. URLs of records without full text go to a separate
//! manifest, one per line, for re-processing.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::models::ArticleRecord;

/// Output column order
pub const COLUMNS: [&str; 6] = ["Title", "Timestamp", "FullText", "Tags", "Author", "Url"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Files produced by one [`ResultSink::persist`] call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistOutcome {
    /// Chunk files in write order
    pub artifacts: Vec<PathBuf>,

    /// Rows written per chunk, same order as `artifacts`
    pub rows_per_artifact: Vec<usize>,

    /// URLs of records without full text
    pub failed_urls: Vec<String>,

    /// Manifest path, when there were failures
    pub manifest: Option<PathBuf>,
}

impl PersistOutcome {
    pub fn rows_written(&self) -> usize {
        self.rows_per_artifact.iter().sum()
    }
}

/// Writes records as CSV chunks
#[derive(Debug, Clone)]
pub struct ResultSink {
    output_dir: PathBuf,
    file_prefix: String,
    chunk_size: usize,
    skip_missing_text: bool,
}

impl ResultSink {
    /// Create a sink writing into `output_dir`
    ///
    /// A `chunk_size` of zero is treated as one.
    pub fn new(output_dir: &Path, file_prefix: &str, chunk_size: usize) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            file_prefix: file_prefix.to_string(),
            chunk_size: chunk_size.max(1),
            skip_missing_text: false,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.dir, &config.file_prefix, config.chunk_size)
            .skip_missing_text(config.skip_missing_text)
    }

    /// Leave records without full text out of the chunk files
    #[must_use]
    pub fn skip_missing_text(mut self, skip: bool) -> Self {
        self.skip_missing_text = skip;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of chunk `index` (1-based)
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_part_{index}.csv", self.file_prefix))
    }

    /// Path of the failure manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_failed_urls.txt", self.file_prefix))
    }

    /// Write all chunks and, if needed, the failure manifest
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory or a file cannot be written.
    pub fn persist(&self, records: &[ArticleRecord]) -> Result<PersistOutcome> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;

        let failed_urls: Vec<String> = records
            .iter()
            .filter(|r| !r.has_full_text())
            .map(|r| r.url.clone())
            .collect();

        let rows: Vec<&ArticleRecord> = records
            .iter()
            .filter(|r| !self.skip_missing_text || r.has_full_text())
            .collect();

        let mut outcome = PersistOutcome::default();
        for (i, chunk) in rows.chunks(self.chunk_size).enumerate() {
            let path = self.chunk_path(i + 1);
            write_chunk(&path, chunk)?;
            tracing::info!(path = %path.display(), rows = chunk.len(), "Wrote chunk");
            outcome.artifacts.push(path);
            outcome.rows_per_artifact.push(chunk.len());
        }

        if !failed_urls.is_empty() {
            let path = self.manifest_path();
            write_manifest(&path, &failed_urls)?;
            tracing::info!(
                path = %path.display(),
                urls = failed_urls.len(),
                "Wrote failure manifest"
            );
            outcome.manifest = Some(path);
        }

        outcome.failed_urls = failed_urls;
        Ok(outcome)
    }
}

fn write_chunk(path: &Path, records: &[&ArticleRecord]) -> Result<()> {
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(file);

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_manifest(path: &Path, urls: &[String]) -> Result<()> {
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    for url in urls {
        writeln!(file, "{url}")?;
    }
    file.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
