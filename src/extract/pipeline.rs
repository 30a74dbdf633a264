// src/extract/pipeline.rs
// =============================================================================
// Turns one fetched response into (links to follow, maybe a page).
//
// Steps, in order. Each one can end the pipeline early with a `SkipReason`
// instead of a page; that is never an error for the crawl as a whole.
//
//   1. The response must be 2xx and HTML
//   2. It must not have been redirected to another host
//   3. Scripts, styles, images etc. are stripped from the DOM
//   4. Same-host links are collected (always, even if step 5 says no)
//   5. The match filter decides whether we want this page's content
//   6. An optional content selector narrows the document
//   7. Readability finds the main content
//   8. The content is converted to markdown
//   9. A Page is built (readability title, else the <title> tag)
//
// The whole thing is synchronous: it runs after the fetch has completed.
// =============================================================================

use reqwest::StatusCode;
use scraper::Selector;
use std::fmt;
use std::sync::Arc;
use url::Url;

use super::html::{
    document_title, extract_same_host_links, parse_stripped, same_host, select_outer_html,
};
use super::markdown::TextConverter;
use super::readable::ContentExtractor;
use crate::fetch::FetchResponse;
use crate::matcher::PathMatcher;
use crate::page::Page;

/// Why a fetched page did not produce a Page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Non-2xx response
    HttpStatus(StatusCode),
    /// Content-Type is missing or isn't text/html
    NotHtml(Option<String>),
    /// The request ended up on another host
    CrossHostRedirect { from: String, to: String },
    /// The path isn't covered by the match patterns
    NotMatched,
    /// The content selector matched nothing (or isn't a valid selector)
    SelectorMissed(String),
    /// Readability found nothing worth keeping
    NoReadableContent,
    /// The markdown converter failed
    ConversionFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::HttpStatus(status) => write!(f, "HTTP {}", status),
            SkipReason::NotHtml(Some(content_type)) => {
                write!(f, "Not a HTML page ({})", content_type)
            }
            SkipReason::NotHtml(None) => write!(f, "Not a HTML page"),
            SkipReason::CrossHostRedirect { from, to } => {
                write!(f, "Redirected from {} to {}", from, to)
            }
            SkipReason::NotMatched => write!(f, "Path not matched"),
            SkipReason::SelectorMissed(selector) => {
                write!(f, "Content selector '{}' matched nothing", selector)
            }
            SkipReason::NoReadableContent => write!(f, "No readable content"),
            SkipReason::ConversionFailed(e) => write!(f, "Markdown conversion failed: {}", e),
        }
    }
}

/// Result of running the pipeline on one response.
#[derive(Debug)]
pub struct Extraction {
    /// Same-host links found on the page, in document order
    pub links: Vec<Url>,
    pub page: Result<Page, SkipReason>,
}

impl Extraction {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            links: Vec::new(),
            page: Err(reason),
        }
    }
}

/// Per-page knobs decided by the crawler.
#[derive(Debug, Default)]
pub struct PageContext<'a> {
    /// Ignore the match filter (the seed page)
    pub skip_match: bool,
    pub matcher: Option<&'a PathMatcher>,
    pub content_selector: Option<String>,
}

#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn ContentExtractor>,
    converter: Arc<dyn TextConverter>,
}

impl Pipeline {
    pub fn new(extractor: Arc<dyn ContentExtractor>, converter: Arc<dyn TextConverter>) -> Self {
        Self {
            extractor,
            converter,
        }
    }

    /// Runs every step for a response fetched from `request_url`.
    pub fn run(
        &self,
        request_url: &Url,
        response: &FetchResponse,
        context: &PageContext<'_>,
    ) -> Extraction {
        if !response.status.is_success() {
            return Extraction::skipped(SkipReason::HttpStatus(response.status));
        }

        if !response.is_html() {
            return Extraction::skipped(SkipReason::NotHtml(
                response.content_type().map(str::to_string),
            ));
        }

        if !same_host(request_url, &response.url) {
            return Extraction::skipped(SkipReason::CrossHostRedirect {
                from: host_label(request_url),
                to: host_label(&response.url),
            });
        }

        let document = parse_stripped(&response.body);
        let links = extract_same_host_links(&document, &response.url);

        let path = request_url.path();
        let wanted = context.skip_match
            || context
                .matcher
                .map(|matcher| matcher.matches(path))
                .unwrap_or(true);
        if !wanted {
            return Extraction {
                links,
                page: Err(SkipReason::NotMatched),
            };
        }

        let html = match &context.content_selector {
            Some(selector_text) => {
                let narrowed = Selector::parse(selector_text)
                    .ok()
                    .and_then(|selector| select_outer_html(&document, &selector));
                match narrowed {
                    Some(html) => html,
                    None => {
                        return Extraction {
                            links,
                            page: Err(SkipReason::SelectorMissed(selector_text.clone())),
                        }
                    }
                }
            }
            None => document.html(),
        };

        let page = self.build_page(&html, &response.url, || document_title(&document));

        Extraction { links, page }
    }

    fn build_page(
        &self,
        html: &str,
        url: &Url,
        fallback_title: impl FnOnce() -> Option<String>,
    ) -> Result<Page, SkipReason> {
        let article = self
            .extractor
            .extract(html, url)
            .ok_or(SkipReason::NoReadableContent)?;

        let content = self
            .converter
            .convert(&article.content_html)
            .map_err(|e| SkipReason::ConversionFailed(format!("{:#}", e)))?;

        let title = if article.title.is_empty() {
            fallback_title().unwrap_or_default()
        } else {
            article.title
        };

        Ok(Page {
            title,
            url: url.to_string(),
            content,
        })
    }
}

fn host_label(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::markdown::MarkdownConverter;
    use crate::extract::readable::Article;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

    // Keeps the whole <body> (or nothing, if it has no text) so tests don't
    // depend on readability's scoring
    struct BodyExtractor;

    impl ContentExtractor for BodyExtractor {
        fn extract(&self, html: &str, _url: &Url) -> Option<Article> {
            let document = scraper::Html::parse_document(html);
            let text: String = document.root_element().text().collect();
            if text.trim().is_empty() {
                return None;
            }
            let body = Selector::parse("body").ok()?;
            let content_html = document
                .select(&body)
                .next()
                .map(|body| body.inner_html())
                .unwrap_or_else(|| html.to_string());
            Some(Article {
                title: String::new(),
                content_html,
            })
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(BodyExtractor), Arc::new(MarkdownConverter))
    }

    fn html_response(url: &str, body: &str) -> FetchResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        FetchResponse {
            status: StatusCode::OK,
            headers,
            url: Url::parse(url).unwrap(),
            body: body.to_string(),
        }
    }

    const PAGE: &str = r#"
        <html><head><title>Guide</title><script>track()</script></head>
        <body>
            <nav><a href="/docs/next">Next</a> <a href="https://elsewhere.com/">Out</a></nav>
            <main><p>Install it.</p></main>
            <aside><p>Sidebar</p></aside>
        </body></html>
    "#;

    #[test]
    fn test_builds_page_with_fallback_title_and_links() {
        let url = Url::parse("https://example.com/docs/start").unwrap();
        let response = html_response("https://example.com/docs/start", PAGE);

        let extraction = pipeline().run(&url, &response, &PageContext::default());

        let links: Vec<&str> = extraction.links.iter().map(Url::as_str).collect();
        assert_eq!(links, vec!["https://example.com/docs/next"]);

        let page = extraction.page.unwrap();
        assert_eq!(page.title, "Guide");
        assert_eq!(page.url, "https://example.com/docs/start");
        assert!(page.content.contains("Install it."));
        assert!(!page.content.contains("track()"));
    }

    #[test]
    fn test_error_status_is_skipped_without_links() {
        let url = Url::parse("https://example.com/gone").unwrap();
        let mut response = html_response("https://example.com/gone", PAGE);
        response.status = StatusCode::NOT_FOUND;

        let extraction = pipeline().run(&url, &response, &PageContext::default());

        assert!(extraction.links.is_empty());
        assert_eq!(
            extraction.page.unwrap_err(),
            SkipReason::HttpStatus(StatusCode::NOT_FOUND)
        );
    }

    #[test]
    fn test_non_html_is_skipped() {
        let url = Url::parse("https://example.com/data.json").unwrap();
        let mut response = html_response("https://example.com/data.json", "{}");
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let extraction = pipeline().run(&url, &response, &PageContext::default());

        assert_eq!(
            extraction.page.unwrap_err(),
            SkipReason::NotHtml(Some("application/json".to_string()))
        );
    }

    #[test]
    fn test_cross_host_redirect_is_skipped() {
        let url = Url::parse("https://example.com/moved").unwrap();
        let response = html_response("https://other.org/landing", PAGE);

        let extraction = pipeline().run(&url, &response, &PageContext::default());

        assert!(extraction.links.is_empty());
        assert_eq!(
            extraction.page.unwrap_err(),
            SkipReason::CrossHostRedirect {
                from: "example.com".to_string(),
                to: "other.org".to_string(),
            }
        );
    }

    #[test]
    fn test_unmatched_page_still_yields_links() {
        let url = Url::parse("https://example.com/docs/start").unwrap();
        let response = html_response("https://example.com/docs/start", PAGE);
        let matcher = PathMatcher::new(["/blog/*"]).unwrap();
        let context = PageContext {
            matcher: Some(&matcher),
            ..PageContext::default()
        };

        let extraction = pipeline().run(&url, &response, &context);

        assert_eq!(extraction.links.len(), 1);
        assert_eq!(extraction.page.unwrap_err(), SkipReason::NotMatched);
    }

    #[test]
    fn test_skip_match_bypasses_filter() {
        let url = Url::parse("https://example.com/docs/start").unwrap();
        let response = html_response("https://example.com/docs/start", PAGE);
        let matcher = PathMatcher::new(["/blog/*"]).unwrap();
        let context = PageContext {
            skip_match: true,
            matcher: Some(&matcher),
            content_selector: None,
        };

        assert!(pipeline().run(&url, &response, &context).page.is_ok());
    }

    #[test]
    fn test_content_selector_narrows_extraction() {
        let url = Url::parse("https://example.com/docs/start").unwrap();
        let response = html_response("https://example.com/docs/start", PAGE);
        let context = PageContext {
            content_selector: Some("main".to_string()),
            ..PageContext::default()
        };

        let page = pipeline().run(&url, &response, &context).page.unwrap();

        assert!(page.content.contains("Install it."));
        assert!(!page.content.contains("Sidebar"));
        assert!(!page.content.contains("Next"));
    }

    #[test]
    fn test_content_selector_without_match_is_skipped() {
        let url = Url::parse("https://example.com/docs/start").unwrap();
        let response = html_response("https://example.com/docs/start", PAGE);
        let context = PageContext {
            content_selector: Some("article.post".to_string()),
            ..PageContext::default()
        };

        let extraction = pipeline().run(&url, &response, &context);

        assert_eq!(extraction.links.len(), 1);
        assert_eq!(
            extraction.page.unwrap_err(),
            SkipReason::SelectorMissed("article.post".to_string())
        );
    }

    #[test]
    fn test_page_without_text_has_no_readable_content() {
        let url = Url::parse("https://example.com/blank").unwrap();
        let response = html_response(
            "https://example.com/blank",
            "<html><body><img src='/a.png'></body></html>",
        );

        let extraction = pipeline().run(&url, &response, &PageContext::default());

        assert_eq!(extraction.page.unwrap_err(), SkipReason::NoReadableContent);
    }
}
