//! Rendered-page extraction: fetch a URL, strip non-content markup, and
//! collapse the result to a single line of normalized text.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{require_min_len, ExtractError, MIN_PARSE_TEXT_LEN};

/// Load budget for a single page render.
pub const PAGE_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Elements whose subtrees never contain job-posting prose.
const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "iframe", "noscript",
];

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector"));

/// The rendering engine boundary. Implementations MUST release any spawned
/// process or connection on every exit path (success, error, or
/// cancellation) and honor the timeout by aborting the underlying load.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, ExtractError>;
}

/// Default renderer: a plain HTTP fetch. Teardown is dropping the response,
/// which also aborts an in-flight request when the caller is cancelled.
pub struct HttpRenderer {
    client: reqwest::Client,
}

impl HttpRenderer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(
                    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
                )
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, ExtractError> {
        let fetch = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| ExtractError::RenderTransport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ExtractError::RenderUpstream {
                    status: status.as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| ExtractError::RenderTransport(e.to_string()))
        };

        tokio::time::timeout(timeout, fetch)
            .await
            .map_err(|_| ExtractError::RenderTimeout(timeout))?
    }
}

/// Renders the URL and returns its visible text, gated at the scraped-page
/// minimum length.
pub async fn extract_page_text(
    renderer: &dyn PageRenderer,
    url: &str,
) -> Result<String, ExtractError> {
    let html = renderer.render(url, PAGE_RENDER_TIMEOUT).await?;
    require_min_len(visible_page_text(&html), MIN_PARSE_TEXT_LEN)
}

/// Strips non-content elements from the body and collapses whitespace runs
/// to single spaces.
pub fn visible_page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    match document.select(&BODY_SELECTOR).next() {
        Some(body) => collect_text(body, &mut out),
        None => collect_text(document.root_element(), &mut out),
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if !EXCLUDED_TAGS.contains(&el.value().name()) {
                collect_text(el, out);
            }
        } else if let scraper::Node::Text(text) = child.value() {
            out.push_str(text);
            out.push(' ');
        }
    }
}
