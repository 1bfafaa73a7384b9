//! The page-fetch capability consumed by the crawler and scraper.
//!
//! The BRVM listing is rendered client-side, so the production fetcher
//! drives a headless Chrome over CDP via `chromiumoxide` and waits for the
//! listing markup to appear before handing back HTML. A plain `reqwest`
//! fetcher is available for static mirrors and diagnostics. Crawl and
//! scrape logic only ever sees the [`PageFetcher`] trait, which keeps it
//! testable against canned HTML fixtures.
//!
//! One fetcher session is reused for the entire run; fetches are strictly
//! sequential and each one is bounded by a single timeout. A timed-out page
//! is skipped by the caller, never retried automatically.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument};

/// Failure fetching one page. Never fatal to the run: callers log and skip.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page did not become ready within {0:?}")]
    Timeout(Duration),
    #[error("browser setup failed: {0}")]
    Setup(String),
    #[error("browser error: {0}")]
    Browser(#[from] CdpError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Capability to turn a URL into rendered HTML.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Headless-Chrome fetcher for JavaScript-rendered pages.
///
/// Navigation and readiness polling share one deadline: the fetch fails
/// with [`FetchError::Timeout`] when `ready_selector` has not appeared in
/// time.
pub struct ChromeFetcher {
    // Held to keep the browser process alive for the life of the fetcher.
    _browser: Browser,
    page: Page,
    ready_selector: String,
    page_timeout: Duration,
}

impl ChromeFetcher {
    /// Launch a headless browser and open the single tab reused for the
    /// whole crawl. The returned task drives the CDP event loop and ends
    /// when the browser closes.
    #[instrument(level = "info", skip_all, fields(ready_selector = %ready_selector))]
    pub async fn launch(
        ready_selector: &str,
        page_timeout: Duration,
    ) -> Result<(Self, JoinHandle<()>), FetchError> {
        let config = BrowserConfig::builder()
            .args(vec!["--no-sandbox", "--disable-dev-shm-usage"])
            .build()
            .map_err(FetchError::Setup)?;
        let (browser, mut handler) = Browser::launch(config).await?;
        let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });
        let page = browser.new_page("about:blank").await?;
        info!("Headless browser session started");

        Ok((
            Self {
                _browser: browser,
                page,
                ready_selector: ready_selector.to_string(),
                page_timeout,
            },
            driver,
        ))
    }

    async fn render(&self, url: &str) -> Result<String, FetchError> {
        self.page.goto(url).await?;
        let _ = self.page.wait_for_navigation().await;
        // Poll until the expected listing markup exists; the outer timeout
        // in fetch() bounds this loop.
        while self.page.find_element(self.ready_selector.as_str()).await.is_err() {
            debug!(url, selector = %self.ready_selector, "Markup not ready yet");
            sleep(Duration::from_millis(250)).await;
        }
        Ok(self.page.content().await?)
    }
}

impl PageFetcher for ChromeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match timeout(self.page_timeout, self.render(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.page_timeout)),
        }
    }
}

/// Plain HTTP fetcher for pages that do not need rendering.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(page_timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(page_timeout)
            .user_agent(concat!("brvm_report_watch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

/// Runtime choice between the browser-backed and plain HTTP fetchers.
pub enum AnyFetcher {
    Chrome(ChromeFetcher),
    Http(HttpFetcher),
}

impl PageFetcher for AnyFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match self {
            AnyFetcher::Chrome(f) => f.fetch(url).await,
            AnyFetcher::Http(f) => f.fetch(url).await,
        }
    }
}

/// Canned-HTML fetcher for exercising crawl logic without a browser.
#[cfg(test)]
pub struct FixtureFetcher {
    pages: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl FixtureFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or(FetchError::Timeout(Duration::from_secs(0)))
    }
}
