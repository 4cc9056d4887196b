//! Output file tests: chunk layout, CSV encoding, failure manifest

use cekfakta::config::Config;
use cekfakta::models::{ArticleDetail, ArticleRecord, ArticleStub, Source};
use cekfakta::storage::{ResultSink, COLUMNS};
use tempfile::TempDir;

fn record(url: &str, full_text: Option<&str>) -> ArticleRecord {
    let mut record = ArticleRecord::from_stub(ArticleStub {
        title: "[HOAKS] Judul dengan \"kutipan\", koma".to_string(),
        timestamp_raw: None,
        author: Some("Tim Cek Fakta".to_string()),
        url: url.to_string(),
    });
    record.merge_detail(ArticleDetail {
        full_text: full_text.map(str::to_string),
        date: Some("Kompas.com - 05/08/2025, 10:15 WIB".to_string()),
        author: None,
        tags: vec!["hoaks".to_string(), "video".to_string()],
        error: None,
    });
    record
}

fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_kompas_defaults_skip_missing_text() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::for_source(Source::Kompas);
    config.output.dir = dir.path().to_path_buf();

    let records = vec![
        record("https://www.kompas.com/cekfakta/read/1", Some("Isi satu")),
        record("https://www.kompas.com/cekfakta/read/2", None),
        record("https://www.kompas.com/cekfakta/read/3", Some("Isi tiga")),
    ];

    let outcome = ResultSink::from_config(&config.output).persist(&records).unwrap();

    assert_eq!(outcome.artifacts, vec![dir.path().join("kompas_cekfakta_data_part_1.csv")]);
    assert_eq!(outcome.rows_written(), 2);
    assert_eq!(
        outcome.manifest,
        Some(dir.path().join("kompas_cekfakta_data_failed_urls.txt"))
    );

    let manifest = std::fs::read_to_string(outcome.manifest.unwrap()).unwrap();
    assert_eq!(manifest, "https://www.kompas.com/cekfakta/read/2\n");
}

#[test]
fn test_fields_survive_csv_encoding() {
    let dir = TempDir::new().unwrap();
    let text = "Paragraf pertama, dengan \"kutipan\".\n\nParagraf kedua.";
    let records = vec![record("https://www.kompas.com/cekfakta/read/9", Some(text))];

    let outcome = ResultSink::new(dir.path(), "uji", 10).persist(&records).unwrap();
    let rows = read_rows(&outcome.artifacts[0]);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0].trim_start_matches('\u{FEFF}'), COLUMNS[0]);
    assert_eq!(&rows[0][1..], &COLUMNS[1..]);

    let row = &rows[1];
    assert_eq!(row[0], "[HOAKS] Judul dengan \"kutipan\", koma");
    assert_eq!(
        row[1], "Kompas.com - 05/08/2025, 10:15 WIB",
        "missing listing timestamp is backfilled from the article"
    );
    assert_eq!(row[2], text);
    assert_eq!(row[3], "hoaks, video");
    assert_eq!(row[4], "Tim Cek Fakta");
    assert_eq!(row[5], "https://www.kompas.com/cekfakta/read/9");
}

#[test]
fn test_output_dir_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("hasil").join("2025");

    let outcome = ResultSink::new(&nested, "tbh", 10)
        .persist(&[record("https://turnbackhoax.id/1/", Some("Isi"))])
        .unwrap();

    assert!(nested.is_dir());
    assert!(outcome.artifacts[0].starts_with(&nested));
}

#[test]
fn test_rerun_overwrites_previous_chunks() {
    let dir = TempDir::new().unwrap();
    let sink = ResultSink::new(dir.path(), "tbh", 1);

    let first: Vec<_> = (0..3)
        .map(|i| record(&format!("https://turnbackhoax.id/{i}/"), Some("lama")))
        .collect();
    sink.persist(&first).unwrap();

    let second = vec![record("https://turnbackhoax.id/baru/", Some("baru"))];
    let outcome = sink.persist(&second).unwrap();

    assert_eq!(outcome.artifacts, vec![sink.chunk_path(1)]);
    let rows = read_rows(&sink.chunk_path(1));
    assert_eq!(rows[1][2], "baru");
}
