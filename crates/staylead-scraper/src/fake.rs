//! Scripted in-memory browser for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{BrowserSession, PageHandle};
use crate::error::ScraperError;

/// How one URL behaves when a fake page navigates to it.
#[derive(Debug, Default)]
pub(crate) struct FakeSite {
    redirect_to: Option<String>,
    failures_left: AtomicU32,
    html: String,
    title: Option<String>,
    heights: Vec<i64>,
    ever_growing: bool,
    load_delay: Duration,
}

impl FakeSite {
    pub(crate) fn redirect_to(mut self, url: &str) -> Self {
        self.redirect_to = Some(url.to_owned());
        self
    }

    /// Fail the next `n` navigations to this site.
    pub(crate) fn failing(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub(crate) fn html(mut self, html: &str) -> Self {
        self.html = html.to_owned();
        self
    }

    pub(crate) fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    /// Successive `scrollHeight` readings; the last one repeats.
    pub(crate) fn heights(mut self, heights: &[i64]) -> Self {
        self.heights = heights.to_vec();
        self
    }

    pub(crate) fn ever_growing(mut self) -> Self {
        self.ever_growing = true;
        self
    }

    pub(crate) fn load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }
}

#[derive(Debug, Default)]
struct FakeState {
    sites: HashMap<String, FakeSite>,
    refuse_pages: bool,
    goto_calls: AtomicUsize,
    pages_opened: AtomicUsize,
    pages_closed: AtomicUsize,
    open_now: AtomicUsize,
    max_open: AtomicUsize,
}

#[derive(Debug, Default)]
pub(crate) struct FakeBrowser {
    state: Arc<FakeState>,
}

impl FakeBrowser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self) -> &mut FakeState {
        Arc::get_mut(&mut self.state).expect("configure the fake before opening pages")
    }

    pub(crate) fn site(mut self, url: &str, site: FakeSite) -> Self {
        self.state_mut().sites.insert(url.to_owned(), site);
        self
    }

    pub(crate) fn refuse_pages(mut self) -> Self {
        self.state_mut().refuse_pages = true;
        self
    }

    pub(crate) fn goto_calls(&self) -> usize {
        self.state.goto_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn pages_opened(&self) -> usize {
        self.state.pages_opened.load(Ordering::SeqCst)
    }

    pub(crate) fn pages_closed(&self) -> usize {
        self.state.pages_closed.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously open pages observed.
    pub(crate) fn max_open_pages(&self) -> usize {
        self.state.max_open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage, ScraperError> {
        if self.state.refuse_pages {
            return Err(ScraperError::Navigation {
                url: "about:blank".to_owned(),
                reason: "target crashed".to_owned(),
            });
        }
        self.state.pages_opened.fetch_add(1, Ordering::SeqCst);
        let open = self.state.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_open.fetch_max(open, Ordering::SeqCst);
        Ok(FakePage {
            state: Arc::clone(&self.state),
            requested: Mutex::new(None),
            landed: Mutex::new(None),
            scrolls: AtomicUsize::new(0),
        })
    }
}

pub(crate) struct FakePage {
    state: Arc<FakeState>,
    requested: Mutex<Option<String>>,
    landed: Mutex<Option<String>>,
    scrolls: AtomicUsize,
}

impl FakePage {
    fn current_site(&self) -> Option<&FakeSite> {
        let requested = self.requested.lock().unwrap().clone()?;
        self.state.sites.get(&requested)
    }
}

#[async_trait]
impl PageHandle for FakePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        self.state.goto_calls.fetch_add(1, Ordering::SeqCst);
        let Some(site) = self.state.sites.get(url) else {
            return Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_owned(),
            });
        };

        if site.load_delay > timeout {
            tokio::time::sleep(timeout).await;
            return Err(ScraperError::NavigationTimeout {
                url: url.to_owned(),
                secs: timeout.as_secs(),
            });
        }
        if !site.load_delay.is_zero() {
            tokio::time::sleep(site.load_delay).await;
        }

        if site.failures_left.load(Ordering::SeqCst) > 0 {
            site.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: "net::ERR_CONNECTION_RESET".to_owned(),
            });
        }

        *self.requested.lock().unwrap() = Some(url.to_owned());
        *self.landed.lock().unwrap() = Some(site.redirect_to.clone().unwrap_or_else(|| url.to_owned()));
        self.scrolls.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn current_url(&self) -> Result<Option<String>, ScraperError> {
        Ok(self.landed.lock().unwrap().clone())
    }

    async fn scroll_height(&self) -> Result<i64, ScraperError> {
        let scrolls = self.scrolls.load(Ordering::SeqCst);
        let Some(site) = self.current_site() else {
            return Ok(0);
        };
        if site.ever_growing {
            let step = i64::try_from(scrolls).unwrap_or(i64::MAX - 1);
            return Ok(1000 * (step + 1));
        }
        Ok(site
            .heights
            .get(scrolls)
            .or_else(|| site.heights.last())
            .copied()
            .unwrap_or(1000))
    }

    async fn scroll_to_bottom(&self) -> Result<(), ScraperError> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn title(&self) -> Result<Option<String>, ScraperError> {
        Ok(self.current_site().and_then(|site| site.title.clone()))
    }

    async fn content(&self) -> Result<String, ScraperError> {
        Ok(self
            .current_site()
            .map(|site| site.html.clone())
            .unwrap_or_default())
    }

    async fn close(self) -> Result<(), ScraperError> {
        self.state.pages_closed.fetch_add(1, Ordering::SeqCst);
        self.state.open_now.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
