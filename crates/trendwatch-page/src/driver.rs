//! Browser driving abstraction and the chromiumoxide-backed implementation.
//!
//! The extraction algorithm only talks to [`PageDriver`] / [`PageSession`];
//! everything CDP-specific stays in [`ChromiumDriver`] / `ChromiumSession`.
//! Waits are polling-style: re-query the locator at a fixed interval until
//! found or the deadline passes.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::time::Instant;

use crate::error::PageError;
use crate::recipe::Locator;

/// Creates fresh page sessions. One session per source; never shared.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Opens a new, blank session.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Driver`] if the browser refuses a new page.
    async fn new_session(&self) -> Result<Box<dyn PageSession>, PageError>;
}

/// One driven page. The owner must call [`PageSession::close`] on every exit
/// path, including errors.
#[async_trait]
pub trait PageSession: Send {
    /// Loads `url` and waits for the initial navigation to finish.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Navigation`] on load failure.
    async fn navigate(&mut self, url: &str) -> Result<(), PageError>;

    /// Bounded wait until at least one element matches `locator`.
    ///
    /// Returns `Ok(true)` when found within `timeout`, `Ok(false)` on
    /// expiry. Expiry is not an error; the caller decides whether the
    /// element was required.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Driver`] only on browser-level failure.
    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<bool, PageError>;

    /// Activates the first element matching `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Driver`] if the element is gone or the click is
    /// rejected.
    async fn click(&mut self, locator: &Locator) -> Result<(), PageError>;

    /// Scrolls the first element matching `locator` into the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Driver`] if the element is gone.
    async fn scroll_into_view(&mut self, locator: &Locator) -> Result<(), PageError>;

    /// Rendered text of every element matching `locator`, in document order.
    /// Elements without text contribute an empty string so positional
    /// pairing stays aligned.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Driver`] on browser-level failure.
    async fn texts(&mut self, locator: &Locator) -> Result<Vec<String>, PageError>;

    /// Releases the page. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Driver`] if the browser rejects the close.
    async fn close(&mut self) -> Result<(), PageError>;
}

/// Find the Chromium binary path: explicit override first, then PATH.
#[must_use]
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("TRENDWATCH_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// Headless Chromium driver. Launch once per source extraction and
/// [`ChromiumDriver::shutdown`] afterwards.
pub struct ChromiumDriver {
    browser: Browser,
    poll_interval: Duration,
}

impl ChromiumDriver {
    /// Launches a headless Chromium instance.
    ///
    /// `chromium_path` overrides binary discovery; when `None`, the binary
    /// is located via [`find_chromium`].
    ///
    /// # Errors
    ///
    /// Returns [`PageError::BrowserNotFound`] when no binary can be located
    /// and [`PageError::BrowserLaunch`] when the process fails to start.
    pub async fn launch(
        chromium_path: Option<PathBuf>,
        poll_interval: Duration,
    ) -> Result<Self, PageError> {
        let path = chromium_path
            .filter(|p| p.exists())
            .or_else(find_chromium)
            .ok_or(PageError::BrowserNotFound)?;

        let config = BrowserConfig::builder()
            .chrome_executable(path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--window-size=1300,900")
            .build()
            .map_err(PageError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PageError::BrowserLaunch(e.to_string()))?;

        // Drain CDP events for the lifetime of the browser.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            poll_interval,
        })
    }

    /// Closes the browser process.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Driver`] if the browser does not shut down
    /// cleanly.
    pub async fn shutdown(mut self) -> Result<(), PageError> {
        self.browser
            .close()
            .await
            .map_err(|e| PageError::Driver(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn new_session(&self) -> Result<Box<dyn PageSession>, PageError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| PageError::Driver(e.to_string()))?;
        Ok(Box::new(ChromiumSession {
            page,
            poll_interval: self.poll_interval,
            closed: false,
        }))
    }
}

struct ChromiumSession {
    page: Page,
    poll_interval: Duration,
    closed: bool,
}

impl ChromiumSession {
    /// Finds the first element matching `locator`, if any.
    async fn find(&self, locator: &Locator) -> Result<Option<Element>, PageError> {
        match locator {
            Locator::Css(css) => Ok(self.page.find_element(css.as_str()).await.ok()),
            Locator::TextInside { css, text } => {
                let candidates = self
                    .page
                    .find_elements(css.as_str())
                    .await
                    .unwrap_or_default();
                for element in candidates {
                    let rendered = element
                        .inner_text()
                        .await
                        .map_err(|e| PageError::Driver(e.to_string()))?
                        .unwrap_or_default();
                    if rendered.trim() == text {
                        return Ok(Some(element));
                    }
                }
                Ok(None)
            }
        }
    }

    async fn require(&self, locator: &Locator) -> Result<Element, PageError> {
        self.find(locator)
            .await?
            .ok_or_else(|| PageError::Driver(format!("element vanished: {locator}")))
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| PageError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        // Best effort: the initial document may already be interactive.
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<bool, PageError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.find(locator).await?.is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), PageError> {
        let element = self.require(locator).await?;
        element
            .click()
            .await
            .map_err(|e| PageError::Driver(e.to_string()))?;
        Ok(())
    }

    async fn scroll_into_view(&mut self, locator: &Locator) -> Result<(), PageError> {
        let element = self.require(locator).await?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| PageError::Driver(e.to_string()))?;
        Ok(())
    }

    async fn texts(&mut self, locator: &Locator) -> Result<Vec<String>, PageError> {
        let css = match locator {
            Locator::Css(css) | Locator::TextInside { css, .. } => css,
        };
        let elements = self
            .page
            .find_elements(css.as_str())
            .await
            .unwrap_or_default();

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element
                .inner_text()
                .await
                .map_err(|e| PageError::Driver(e.to_string()))?
                .unwrap_or_default();
            texts.push(text);
        }
        Ok(texts)
    }

    async fn close(&mut self) -> Result<(), PageError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let page = self.page.clone();
        page.close()
            .await
            .map_err(|e| PageError::Driver(e.to_string()))
    }
}
