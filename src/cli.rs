// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// There is a single command: give it a URL and it fetches the whole site.
// =============================================================================

use clap::Parser;

use crate::options::{CrawlOptions, DEFAULT_CONCURRENCY};

#[derive(Parser, Debug)]
#[command(
    name = "sitefetch",
    version,
    about = "Fetch an entire website and save it as readable text",
    long_about = "sitefetch crawls a website starting from a URL, extracts the main content \
                  of every page and outputs it as markdown, ready to be fed to an LLM."
)]
pub struct Cli {
    /// Website URL to start from (e.g., https://example.com/docs)
    ///
    /// Without it, help is printed
    pub url: Option<String>,

    /// Write the fetched site to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub outfile: Option<String>,

    /// Number of concurrent requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Only keep pages whose path matches this glob (repeatable)
    ///
    /// Example: -m '/blog/**' -m '/docs/*'
    #[arg(short, long = "match", value_name = "PATTERN")]
    pub match_patterns: Vec<String>,

    /// CSS selector for the part of the page that holds the content
    #[arg(long, value_name = "SELECTOR")]
    pub content_selector: Option<String>,

    /// Stop after this many pages
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output JSON instead of <page> blocks
    #[arg(long)]
    pub json: bool,

    /// Write each page as soon as it is fetched instead of collecting them all
    #[arg(short, long)]
    pub stream: bool,

    /// Warn when memory use goes above this many megabytes
    #[arg(long = "max-memory", value_name = "MB")]
    pub max_memory_mb: Option<u64>,

    /// Extra request header, as "Name: Value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Override the User-Agent header
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Do not print any logs
    #[arg(long)]
    pub silent: bool,
}

impl Cli {
    /// Crawl options for these arguments. The page sink (streaming) is
    /// attached by the caller since it owns the output.
    pub fn crawl_options(&self) -> CrawlOptions {
        let mut options = CrawlOptions {
            concurrency: self.concurrency,
            match_patterns: self.match_patterns.clone(),
            content_selector: self
                .content_selector
                .clone()
                .map(crate::options::ContentSelector::Static),
            limit: self.limit,
            max_memory_mb: self.max_memory_mb,
            headers: self.headers.iter().map(|header| split_header(header)).collect(),
            ..CrawlOptions::default()
        };
        if let Some(user_agent) = &self.user_agent {
            options.user_agent = user_agent.clone();
        }
        options
    }
}

// "Name: Value" -> ("Name", "Value"). Without a colon the whole thing is the
// name, which validation then rejects or accepts with an empty value
fn split_header(header: &str) -> (String, String) {
    match header.split_once(':') {
        Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
        None => (header.trim().to_string(), String::new()),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is `url` an Option?
//    - Running `sitefetch` with no arguments should print help, not an error
//
// 2. How do repeatable flags work?
//    - A Vec<String> field makes clap accept the flag many times:
//      -m '/blog/**' -m '/docs/*' gives vec!["/blog/**", "/docs/*"]
//
// 3. Why doesn't crawl_options() set the page sink?
//    - The sink writes to stdout or a file, and the CLI owns those
//    - Keeping it out of here means this file never touches I/O
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sitefetch", "https://example.com"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://example.com"));
        assert_eq!(cli.concurrency, DEFAULT_CONCURRENCY);
        assert!(!cli.json);
        assert!(!cli.stream);
        assert!(cli.match_patterns.is_empty());
    }

    #[test]
    fn test_no_url_is_allowed() {
        let cli = Cli::try_parse_from(["sitefetch"]).unwrap();
        assert!(cli.url.is_none());
    }

    #[test]
    fn test_all_flags_reach_the_options() {
        let cli = Cli::try_parse_from([
            "sitefetch",
            "https://example.com",
            "-o",
            "out/site.txt",
            "--concurrency",
            "8",
            "-m",
            "/blog/**",
            "--match",
            "/docs/*",
            "--content-selector",
            "main",
            "--limit",
            "50",
            "--max-memory",
            "512",
            "-H",
            "Authorization: Bearer abc",
            "--user-agent",
            "bot/1.0",
            "--stream",
            "--json",
            "--silent",
        ])
        .unwrap();

        assert_eq!(cli.outfile.as_deref(), Some("out/site.txt"));
        assert!(cli.stream && cli.json && cli.silent);

        let options = cli.crawl_options();
        assert_eq!(options.concurrency, 8);
        assert_eq!(options.match_patterns, vec!["/blog/**", "/docs/*"]);
        assert_eq!(options.limit, Some(50));
        assert_eq!(options.max_memory_mb, Some(512));
        assert_eq!(
            options.headers,
            vec![("Authorization".to_string(), "Bearer abc".to_string())]
        );
        assert_eq!(options.user_agent, "bot/1.0");
        assert_eq!(
            options.content_selector.unwrap().resolve("/any"),
            Some("main".to_string())
        );
    }

    #[test]
    fn test_split_header() {
        assert_eq!(
            split_header("X-Key:  value:with:colons "),
            ("X-Key".to_string(), "value:with:colons".to_string())
        );
        assert_eq!(split_header("X-Flag"), ("X-Flag".to_string(), String::new()));
    }
}
