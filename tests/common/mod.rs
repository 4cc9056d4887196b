//! Common test utilities

use cekfakta::config::Config;
use cekfakta::models::Source;

/// Config pointed at a mock server, with pacing and backoff disabled
pub fn test_config(source: Source, base_url: &str) -> Config {
    let mut config = Config::for_source(source);
    config.site.base_url = Some(base_url.to_string());
    config.crawl.delay_min_secs = 0.0;
    config.crawl.delay_max_secs = 0.0;
    config.http.backoff_factor = 0.0;
    config.http.max_retries = 2;
    config.http.connect_timeout_secs = 2;
    config.http.read_timeout_secs = 5;
    config
}

/// TurnBackHoax listing page linking to `urls`
#[allow(dead_code)]
pub fn tbh_listing_html(urls: &[String]) -> String {
    let items: String = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            format!(
                r#"<article class="mh-loop-item">
                    <h3 class="entry-title mh-loop-title"><a href="{url}">[SALAH] Artikel {i}</a></h3>
                    <div class="mh-loop-meta">
                        <span class="mh-meta-date updated">August {day}, 2025</span>
                        <span class="mh-meta-author author vcard"><a href="/author/tim-cek-fakta/">Tim Cek Fakta</a></span>
                    </div>
                </article>"#,
                day = i + 1,
            )
        })
        .collect();

    format!(r#"<html><body><div class="mh-loop">{items}</div></body></html>"#)
}

/// TurnBackHoax article page with a body and one category tag
#[allow(dead_code)]
pub fn tbh_article_html(body: &str) -> String {
    format!(
        r#"<html><body>
        <article>
            <span class="entry-meta-date updated">August 5, 2025</span>
            <span class="entry-meta-author"><a href="/author/moch/">Moch. Marcellodiansyah</a></span>
            <span class="entry-meta-categories"><a href="/category/salah/">Salah</a></span>
            <div class="entry-content">
                <p>{body}</p>
                <p>Penjelasan lengkap ada di bawah.</p>
            </div>
        </article>
        </body></html>"#
    )
}

/// Kompas cekfakta listing with one headline per URL
#[allow(dead_code)]
pub fn kompas_listing_html(urls: &[String]) -> String {
    let items: String = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            format!(
                r#"<div class="cekfakta-list">
                    <a class="cekfakta-list-link" href="{url}">
                        <h3 class="cekfakta-list-title">[HOAKS] Kabar {i}</h3>
                    </a>
                    <p class="cekfakta-text-date">4 Agustus 2025</p>
                </div>"#
            )
        })
        .collect();

    format!("<html><body>{items}</body></html>")
}
