// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Crawl the site (buffered, or streaming pages out as they arrive)
// 3. Write the pages to stdout or to --outfile
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

use sitefetch::cli::Cli;
use sitefetch::output::{page_to_text, summary_line};
use sitefetch::{fetch_site, logging, serialize_pages, Format, Page};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Printed even with --silent: this is the one thing the user must see
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let Some(url) = cli.url.clone() else {
        Cli::command().print_help()?;
        return Ok(0);
    };

    logging::init(cli.silent);

    if cli.stream {
        run_streaming(&cli, &url).await
    } else {
        run_buffered(&cli, &url).await
    }
}

// Collect every page, then write them all at once
async fn run_buffered(cli: &Cli, url: &str) -> Result<i32> {
    let pages = fetch_site(url, cli.crawl_options()).await?.into_pages();

    if pages.is_empty() {
        warn!("No pages found");
        return Ok(0);
    }

    let summary = pages.summary();
    info!("Fetched {}", summary_line(&summary));

    let format = if cli.json { Format::Json } else { Format::Text };
    let text = serialize_pages(pages.pages(), format)?;

    match &cli.outfile {
        Some(path) => {
            let mut file = create_output_file(path)?;
            file.write_all(text.as_bytes())
                .with_context(|| format!("Failed to write {}", path))?;
        }
        None => println!("{}", text),
    }

    Ok(0)
}

// Write each page the moment it is produced; nothing is kept in memory
async fn run_streaming(cli: &Cli, url: &str) -> Result<i32> {
    let mut out: Box<dyn Write + Send> = match &cli.outfile {
        Some(path) => Box::new(create_output_file(path)?),
        None => Box::new(io::stdout()),
    };
    let json = cli.json;
    let mut first = true;

    let mut options = cli.crawl_options();
    options.on_page = Some(Box::new(move |page: Page| {
        if let Err(e) = write_streamed(&mut out, &page, json, first) {
            warn!("Failed to write {}: {:#}", page.url, e);
        }
        first = false;
    }));

    let summary = fetch_site(url, options).await?.summary();

    if summary.pages == 0 {
        warn!("No pages found");
    } else {
        info!("Streamed {}", summary_line(&summary));
    }

    Ok(0)
}

// Text pages are separated by a blank line; JSON is one object per line
fn write_streamed(out: &mut dyn Write, page: &Page, json: bool, first: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, page)?;
        writeln!(out)?;
    } else {
        if !first {
            writeln!(out)?;
        }
        writeln!(out, "{}", page_to_text(page))?;
    }
    out.flush()?;
    Ok(())
}

fn create_output_file(path: &str) -> Result<File> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}
