//! [`PageSession`] backed by a headless Chromium through `headless_chrome`.

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};

use super::PageSession;
use crate::error::StrategyError;
use crate::redirect::BROWSER_ACCEPT_LANGUAGE;

pub(super) struct ChromeSession {
    // Dropping the browser kills the Chromium process, so it lives as long
    // as the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    pub(super) fn launch(user_agent: &str) -> Result<Self, StrategyError> {
        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some((1280, 900)),
            ..Default::default()
        })
        .map_err(|e| StrategyError::BrowserUnavailable(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| StrategyError::BrowserUnavailable(e.to_string()))?;
        tab.set_user_agent(user_agent, Some(BROWSER_ACCEPT_LANGUAGE), None)
            .map_err(|e| StrategyError::Browser(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl PageSession for ChromeSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), StrategyError> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .map_err(|e| StrategyError::Browser(format!("navigation to {url} failed: {e}")))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| StrategyError::Browser(format!("page load for {url} failed: {e}")))?;
        Ok(())
    }

    fn text(&self, selector: &str) -> Result<Option<String>, StrategyError> {
        // A missing element surfaces as an error from `find_element`.
        let Ok(element) = self.tab.find_element(selector) else {
            return Ok(None);
        };
        element
            .get_inner_text()
            .map(Some)
            .map_err(|e| StrategyError::Browser(format!("reading text of {selector}: {e}")))
    }

    fn attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>, StrategyError> {
        let Ok(element) = self.tab.find_element(selector) else {
            return Ok(None);
        };
        element.get_attribute_value(attribute).map_err(|e| {
            StrategyError::Browser(format!("reading {attribute} of {selector}: {e}"))
        })
    }

    fn click(&self, selector: &str) -> Result<bool, StrategyError> {
        let Ok(element) = self.tab.find_element(selector) else {
            return Ok(false);
        };
        element
            .click()
            .map(|_| true)
            .map_err(|e| StrategyError::Browser(format!("clicking {selector}: {e}")))
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }

    fn close(&mut self) {
        if let Err(err) = self.tab.close(false) {
            tracing::debug!(error = %err, "closing browser tab failed");
        }
    }
}
