use anyhow::{Context, Result};

use cekfakta::config::Config;
use cekfakta::crawler::{create_session, Orchestrator, PageFetcher};
use cekfakta::error::CrawlErrorExt;
use cekfakta::models::Source;
use cekfakta::storage::ResultSink;

pub async fn crawl(config: Config) -> Result<()> {
    let source = config.site.source;
    println!("Starting {} crawl", source.display_name());
    println!("==========================");
    println!("  Listing root: {}", config.base_url());
    println!("  Pages: {}", config.crawl.max_pages);
    println!("  Concurrency: {}", config.crawl.concurrency);
    println!(
        "  Delay: {:.1}-{:.1}s",
        config.crawl.delay_min_secs, config.crawl.delay_max_secs
    );

    let fetcher = create_session(&config).context("Failed to create HTTP session")?;
    let sink = ResultSink::from_config(&config.output);

    let mut orchestrator = Orchestrator::new(config, fetcher);
    let report = match orchestrator.run(&sink).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(
                category = %e.category(),
                recoverable = e.is_recoverable(),
                error = %e,
                "Crawl aborted"
            );
            return Err(e.into());
        }
    };

    let stats = &report.stats;
    println!("\nCrawl Summary");
    println!("=============");
    println!(
        "Listing pages: {} ({} failed)",
        stats.pages_requested, stats.pages_failed
    );
    println!(
        "Articles found: {} ({} duplicate URLs)",
        stats.stubs_found, stats.duplicate_urls
    );
    println!("Details fetched: {}", stats.details_ok);
    println!("Details failed: {}", stats.details_failed);
    println!("Without full text: {}", report.failed_urls.len());
    println!("Success rate: {:.1}%", stats.success_rate() * 100.0);
    if let Some(elapsed) = stats.elapsed() {
        println!("Elapsed: {}s", elapsed.num_seconds());
    }

    if let Some(outcome) = &report.persisted {
        println!("\nOutput: {}", sink.output_dir().display());
        println!("------");
        for (path, rows) in outcome.artifacts.iter().zip(&outcome.rows_per_artifact) {
            println!("  {} ({rows} rows)", path.display());
        }
        if let Some(manifest) = &outcome.manifest {
            println!("  {} ({} URLs)", manifest.display(), outcome.failed_urls.len());
        }
    }

    for failure in &report.failed_pages {
        println!("  Page {} failed: {}", failure.page, failure.error);
    }

    Ok(())
}

pub async fn probe(config: Config) -> Result<()> {
    let source = config.site.source;
    let url = source.probe_url(config.base_url());
    let fetcher = create_session(&config).context("Failed to create HTTP session")?;

    println!("Probing {} at {url}", source.display_name());
    match fetcher.fetch(&url).await {
        Ok(page) => {
            println!("  Status: {}", page.status);
            println!("  Final URL: {}", page.final_url);
            println!("  Body: {} bytes", page.body.len());
            println!("Site is reachable");
            Ok(())
        }
        Err(e) => {
            println!("  Failed ({}): {e}", e.category());
            if e.is_blocked() {
                println!("  The site is serving a bot check; try again later or from another network");
            }
            Err(e.into())
        }
    }
}

pub fn sources() {
    println!("Supported sources");
    println!("=================");
    for source in Source::all() {
        let defaults = Config::for_source(source);
        println!("\n{} ({})", source.display_name(), source.as_str());
        println!("  Listing root: {}", source.default_base_url());
        println!("  Pages: {}", defaults.crawl.max_pages);
        println!("  Concurrency: {}", defaults.crawl.concurrency);
        println!(
            "  Delay: {:.1}-{:.1}s",
            defaults.crawl.delay_min_secs, defaults.crawl.delay_max_secs
        );
        println!("  Retries: {}", defaults.http.max_retries);
        println!("  Output prefix: {}", defaults.output.file_prefix);
    }
}
