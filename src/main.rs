use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cekfakta::config::Config;
use cekfakta::models::Source;

mod commands;

#[derive(Parser)]
#[command(
    name = "cekfakta",
    version,
    about = "Crawler for Indonesian fact-check articles (turnbackhoax.id, kompas.com cekfakta)",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a site and write CSV chunks
    Crawl {
        /// Site to crawl (turnbackhoax, kompas)
        #[arg(short, long)]
        source: Option<Source>,

        /// Number of listing pages to fetch
        #[arg(short, long)]
        pages: Option<u32>,

        /// Maximum in-flight requests per phase
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rows per CSV file
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Listing root to crawl instead of the site default
        #[arg(long)]
        base_url: Option<String>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write records without full text to the CSV files too
        #[arg(long, default_value = "false")]
        keep_missing_text: bool,
    },

    /// Check that a site is reachable and not serving a checkpoint page
    Probe {
        /// Site to probe (turnbackhoax, kompas)
        #[arg(short, long)]
        source: Option<Source>,

        /// Listing root to probe instead of the site default
        #[arg(long)]
        base_url: Option<String>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List supported sites and their defaults
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            source,
            pages,
            concurrency,
            output,
            chunk_size,
            base_url,
            config,
            keep_missing_text,
        } => {
            let mut config = Config::load(config.as_deref(), source)?;
            config.apply_env();

            if let Some(pages) = pages {
                config.crawl.max_pages = pages;
            }
            if let Some(concurrency) = concurrency {
                config.crawl.concurrency = concurrency;
            }
            if let Some(output) = output {
                config.output.dir = output;
            }
            if let Some(chunk_size) = chunk_size {
                config.output.chunk_size = chunk_size;
            }
            if base_url.is_some() {
                config.site.base_url = base_url;
            }
            if keep_missing_text {
                config.output.skip_missing_text = false;
            }

            setup_logging(&mut config, cli.log_format, cli.log_file, cli.verbose)?;
            config.validate()?;

            tracing::info!(
                source = %config.site.source,
                max_pages = config.crawl.max_pages,
                concurrency = config.crawl.concurrency,
                output = %config.output.dir.display(),
                "Starting crawl command"
            );
            commands::crawl(config).await?;
        }

        Commands::Probe {
            source,
            base_url,
            config,
        } => {
            let mut config = Config::load(config.as_deref(), source)?;
            config.apply_env();
            if base_url.is_some() {
                config.site.base_url = base_url;
            }

            setup_logging(&mut config, cli.log_format, cli.log_file, cli.verbose)?;
            config.validate()?;

            tracing::info!(source = %config.site.source, "Starting probe command");
            commands::probe(config).await?;
        }

        Commands::Sources => {
            let mut config = Config::default();
            setup_logging(&mut config, cli.log_format, cli.log_file, cli.verbose)?;
            commands::sources();
        }
    }

    Ok(())
}

fn setup_logging(
    config: &mut Config,
    format: Option<String>,
    file: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    if let Some(format) = format {
        config.logging.format = format;
    }
    if file.is_some() {
        config.logging.file = file;
    }
    cekfakta::logging::init(&config.logging, verbose)
}
