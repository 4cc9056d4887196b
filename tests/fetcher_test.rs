//! Integration tests for the HTTP session using wiremock
//!
//! These tests validate retry, checkpoint and header behavior against mock
//! servers.

mod common;

use cekfakta::crawler::{create_session, PageFetcher};
use cekfakta::error::FetchError;
use cekfakta::models::Source;
use common::test_config;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test successful fetch from mock server
#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;
    let html = "<html><body><h1>Cek Fakta</h1><p>Isi artikel.</p></body></html>";

    Mock::given(method("GET"))
        .and(path("/2025/08/05/artikel/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=UTF-8")
                .set_body_string(html),
        )
        .mount(&mock_server)
        .await;

    let fetcher = create_session(&test_config(Source::TurnBackHoax, &mock_server.uri())).unwrap();
    let url = format!("{}/2025/08/05/artikel/", mock_server.uri());
    let page = fetcher.fetch(&url).await.expect("fetch should succeed");

    assert_eq!(page.status, 200);
    assert_eq!(page.url, url);
    assert_eq!(page.final_url, url);
    assert!(page.body.contains("Isi artikel."));
}

/// Test that transient statuses trigger retries
#[tokio::test]
async fn test_server_error_retry() {
    let mock_server = MockServer::start().await;

    // Return 503 twice, then succeed
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_session(&test_config(Source::TurnBackHoax, &mock_server.uri())).unwrap();
    let result = fetcher.fetch(&format!("{}/flaky", mock_server.uri())).await;

    assert!(result.is_ok(), "Should succeed after retries: {:?}", result.err());
}

/// Test 404 does not retry
#[tokio::test]
async fn test_404_no_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // Should only be called once (no retry)
        .mount(&mock_server)
        .await;

    let fetcher = create_session(&test_config(Source::TurnBackHoax, &mock_server.uri())).unwrap();
    let result = fetcher.fetch(&format!("{}/notfound", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::Status(404))));
}

/// Test max retries exceeded
#[tokio::test]
async fn test_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    // max_retries = 2 in the test config: 1 attempt + 2 retries
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = create_session(&test_config(Source::TurnBackHoax, &mock_server.uri())).unwrap();
    let result = fetcher.fetch(&format!("{}/down", mock_server.uri())).await;

    match result {
        Err(FetchError::MaxRetriesExceeded { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert!(last.contains("502"));
        }
        other => panic!("expected MaxRetriesExceeded, got {other:?}"),
    }
}

/// Test redirect to a checkpoint page is reported as blocked
#[tokio::test]
async fn test_checkpoint_redirect_detected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cekfakta/data-dan-fakta"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/checkpoint?continue=cekfakta"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/checkpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Verifikasi browser"))
        .mount(&mock_server)
        .await;

    let base = format!("{}/cekfakta/data-dan-fakta", mock_server.uri());
    let fetcher = create_session(&test_config(Source::Kompas, &base)).unwrap();
    let result = fetcher.fetch(&base).await;

    match result {
        Err(FetchError::Checkpoint { url }) => assert!(url.contains("/checkpoint")),
        other => panic!("expected Checkpoint, got {other:?}"),
    }
}

/// Test identity headers, and the Referer only for the site that needs it
#[tokio::test]
async fn test_browser_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let kompas = create_session(&test_config(Source::Kompas, &mock_server.uri())).unwrap();
    kompas
        .fetch(&format!("{}/kompas", mock_server.uri()))
        .await
        .expect("kompas fetch");

    let tbh = create_session(&test_config(Source::TurnBackHoax, &mock_server.uri())).unwrap();
    tbh.fetch(&format!("{}/tbh", mock_server.uri()))
        .await
        .expect("tbh fetch");

    let requests = mock_server.received_requests().await.unwrap();
    let header_of = |req_path: &str, name: &str| {
        requests
            .iter()
            .find(|r| r.url.path() == req_path)
            .and_then(|r| r.headers.get(name))
            .map(|v| v.to_str().unwrap().to_string())
    };

    assert_eq!(
        header_of("/kompas", "referer"),
        Some(format!("{}/", mock_server.uri()))
    );
    assert_eq!(
        header_of("/kompas", "accept-language").as_deref(),
        Some("id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7")
    );
    assert!(header_of("/kompas", "user-agent").unwrap().starts_with("Mozilla/5.0"));
    assert!(header_of("/tbh", "referer").is_none());
}

/// Test non-text responses are rejected
#[tokio::test]
async fn test_binary_content_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF]),
        )
        .mount(&mock_server)
        .await;

    let fetcher = create_session(&test_config(Source::TurnBackHoax, &mock_server.uri())).unwrap();
    let result = fetcher.fetch(&format!("{}/image.jpg", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

/// Test malformed URLs fail before any request
#[tokio::test]
async fn test_invalid_url() {
    let fetcher = create_session(&test_config(Source::TurnBackHoax, "http://127.0.0.1:1")).unwrap();
    let result = fetcher.fetch("not a url").await;

    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
}
