use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use crate::humanize;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::{Page, ScreenshotParams};
use chrono::Utc;
use futures_util::stream::StreamExt;
use leakscope_core::{PageContent, RiskLevel, ScanConfig, SearchHit};
use rand::Rng;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

const SEARCH_URL: &str = "https://www.google.com";
const CONSENT_SELECTOR: &str = "button#L2AGLb";
const SEARCH_BOX_SELECTOR: &str = "textarea[name='q']";
const RESULTS_SELECTOR: &str = "#search";

const SEARCH_BOX_TIMEOUT: Duration = Duration::from_secs(8);
const RESULTS_TIMEOUT: Duration = Duration::from_secs(12);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Collects `{title, link}` pairs from the organic results container.
const RESULTS_JS: &str = r"() => Array.from(document.querySelectorAll('div[data-ved]'))
    .map((result) => {
        const heading = result.querySelector('h3');
        const anchor = result.querySelector('a');
        return heading && anchor ? { title: heading.innerText, link: anchor.href } : null;
    })
    .filter((hit) => hit !== null)";

/// Reads the rendered text and declared media type of the current document.
const PAGE_TEXT_JS: &str = r"() => ({
    content_type: document.contentType || '',
    body: document.body ? document.body.innerText : '',
})";

/// Chromium-backed search and inspection engine.
///
/// Keeps one long-lived tab for search queries and opens a fresh tab
/// per inspected URL so result state never bleeds between pages.
pub struct SearchBrowser {
    browser: Browser,
    page: Page,
    fingerprint: FingerprintConfig,
    fetch_timeout: Duration,
    settle: Duration,
    evidence_dir: PathBuf,
}

impl SearchBrowser {
    /// Launch Chromium with a randomized fingerprint.
    pub async fn launch(config: &ScanConfig) -> Result<Self> {
        Self::with_fingerprint(config, FingerprintConfig::randomized()).await
    }

    /// Launch Chromium with a specific fingerprint.
    pub async fn with_fingerprint(
        config: &ScanConfig,
        fingerprint: FingerprintConfig,
    ) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height);
        if !config.browser.headless {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let engine = Self {
            browser,
            page,
            fingerprint,
            fetch_timeout: Duration::from_secs(config.fetch.timeout_secs),
            settle: Duration::from_millis(config.fetch.settle_ms),
            evidence_dir: config.evidence.dir.clone(),
        };
        engine.apply_fingerprint(&engine.page).await?;

        info!(
            user_agent = %engine.fingerprint.user_agent,
            headless = config.browser.headless,
            "browser launched"
        );
        Ok(engine)
    }

    /// Run one query through the search engine and collect result links.
    ///
    /// Types the query with human pacing and glides the cursor over the
    /// results before extraction. Returns [`BrowserError::Blocked`] when
    /// an interstitial or captcha replaces the results page.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        debug!(query, "running search");

        self.navigate(&self.page, SEARCH_URL).await?;
        self.dismiss_consent().await;

        let input = wait_for_element(&self.page, SEARCH_BOX_SELECTOR, SEARCH_BOX_TIMEOUT).await?;
        humanize::type_like_human(&input, query).await?;
        input
            .press_key("Enter")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        if let Err(err) = wait_for_element(&self.page, RESULTS_SELECTOR, RESULTS_TIMEOUT).await {
            if self.is_blocked().await {
                return Err(BrowserError::Blocked(
                    "interstitial replaced the results page".to_string(),
                ));
            }
            return Err(err);
        }

        let glide_to = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(400.0..=800.0), rng.gen_range(300.0..=700.0))
        };
        humanize::glide_mouse(&self.page, (100.0, 100.0), glide_to).await?;

        let hits: Vec<SearchHit> = self
            .page
            .evaluate(RESULTS_JS)
            .await
            .map_err(|e| BrowserError::ExtractionError(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::ExtractionError(e.to_string()))?;

        let hits: Vec<SearchHit> = hits.into_iter().filter(|h| is_web_url(&h.link)).collect();
        debug!(query, count = hits.len(), "search results extracted");
        Ok(hits)
    }

    /// Load a URL in a fresh tab and return its rendered text.
    ///
    /// Waits for the configured settle delay after load so client-side
    /// rendering has a chance to finish before extraction.
    pub async fn fetch_text(&self, url: &str) -> Result<PageContent> {
        let page = self.fresh_page().await?;
        if let Err(err) = self.navigate(&page, url).await {
            let _ = page.close().await;
            return Err(err);
        }
        tokio::time::sleep(self.settle).await;

        let extracted = page
            .evaluate(PAGE_TEXT_JS)
            .await
            .map_err(|e| BrowserError::ExtractionError(e.to_string()))
            .and_then(|outcome| {
                outcome
                    .into_value::<PageContent>()
                    .map_err(|e| BrowserError::ExtractionError(e.to_string()))
            });
        let _ = page.close().await;

        let content = extracted?;
        debug!(
            url,
            content_type = %content.content_type,
            bytes = content.body.len(),
            "page text extracted"
        );
        Ok(content)
    }

    /// Screenshot a URL into the evidence directory.
    ///
    /// The file is named `{RISK}_{unix_ts}.png` so evidence sorts by
    /// severity and capture time on disk.
    pub async fn capture_evidence(&self, url: &str, risk: RiskLevel) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.evidence_dir)
            .map_err(|e| BrowserError::ScreenshotError(e.to_string()))?;

        let page = self.fresh_page().await?;
        if let Err(err) = self.navigate(&page, url).await {
            let _ = page.close().await;
            return Err(err);
        }

        let path = self
            .evidence_dir
            .join(format!("{}_{}.png", risk.label(), Utc::now().timestamp()));
        let shot = page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                &path,
            )
            .await;
        let _ = page.close().await;

        shot.map_err(|e| BrowserError::ScreenshotError(e.to_string()))?;
        info!(url, path = %path.display(), "evidence captured");
        Ok(path)
    }

    /// Drive a page to `url`, bounded by the configured timeout.
    async fn navigate(&self, page: &Page, url: &str) -> Result<()> {
        let outcome = tokio::time::timeout(self.fetch_timeout, async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        })
        .await;

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationError(format!("{url}: {e}"))),
            Err(_) => Err(BrowserError::Timeout(format!(
                "{url} did not finish loading within {}s",
                self.fetch_timeout.as_secs()
            ))),
        }
    }

    /// Accept the consent dialog when the region shows one. A missing
    /// button is the common case and not an error.
    async fn dismiss_consent(&self) {
        if let Ok(button) = self.page.find_element(CONSENT_SELECTOR).await {
            if button.click().await.is_ok() {
                debug!("dismissed consent dialog");
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    async fn is_blocked(&self) -> bool {
        let current = self.page.url().await.ok().flatten().unwrap_or_default();
        let html = self.page.content().await.unwrap_or_default();
        looks_blocked(&html, &current)
    }

    async fn fresh_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        self.apply_fingerprint(&page).await?;
        Ok(page)
    }

    async fn apply_fingerprint(&self, page: &Page) -> Result<()> {
        let params = SetUserAgentOverrideParams::builder()
            .user_agent(&self.fingerprint.user_agent)
            .build()
            .map_err(BrowserError::ChromiumError)?;
        page.set_user_agent(params)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }
}

/// Poll for a selector until it appears or the deadline passes.
async fn wait_for_element(page: &Page, selector: &str, timeout: Duration) -> Result<Element> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Ok(element);
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Markers of the interstitial shown instead of results when the
/// search engine flags automated traffic.
fn looks_blocked(html: &str, current_url: &str) -> bool {
    current_url.contains("/sorry/")
        || html.contains("unusual traffic")
        || html.contains("recaptcha")
}

/// Keep only absolute web links; the results container also carries
/// anchors with javascript: and fragment targets.
fn is_web_url(link: &str) -> bool {
    Url::parse(link)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
