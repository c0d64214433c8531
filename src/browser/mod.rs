//! Browser collaborator
//!
//! Restores the persisted session in a fresh browser, loads the portal home
//! page and hands its HTML to the grade extractor.

pub(crate) mod extract;
#[cfg(test)]
pub(crate) mod fake_driver;
pub(crate) mod session;
pub(crate) mod webdriver;

use std::time::Duration;

use serde_json::{Value, json};

use crate::config::Config;
use crate::consts::{WIDGET_POLL_INTERVAL, WIDGET_SELECTOR};
use crate::error::ExtractError;

pub(crate) use extract::{Extraction, extract_grades};
pub(crate) use session::{SessionState, SessionStore};
use webdriver::{BrowserSession, WebDriver};

/// Produces the grades currently shown by the portal
pub(crate) trait GradeSource {
    fn extract(&self, session: &SessionState) -> Result<Extraction, ExtractError>;
}

pub(crate) struct WebDriverSource {
    driver: WebDriver,
    hp_url: String,
    headless: bool,
    navigation_timeout: Duration,
    widget_timeout: Duration,
}

impl WebDriverSource {
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            driver: WebDriver::new(&config.webdriver_url, config.navigation_timeout),
            hp_url: config.hp_url.clone(),
            headless: config.headless,
            navigation_timeout: config.navigation_timeout,
            widget_timeout: config.widget_timeout,
        }
    }
}

impl GradeSource for WebDriverSource {
    fn extract(&self, session: &SessionState) -> Result<Extraction, ExtractError> {
        log::info!("Launching browser (headless: {})", self.headless);
        let browser = self.driver.start_session(self.headless)?;
        browser.set_page_load_timeout(self.navigation_timeout)?;

        restore_cookies(&browser, session);
        log::info!("Loading {}", self.hp_url);
        browser.navigate(&self.hp_url)?;
        if restore_local_storage(&browser, session) {
            browser.navigate(&self.hp_url)?;
        }

        if browser.wait_for(WIDGET_SELECTOR, self.widget_timeout, WIDGET_POLL_INTERVAL)? {
            log::info!("Grades widget detected");
        } else {
            log::warn!(
                "Grades widget not found after {}s",
                self.widget_timeout.as_secs()
            );
        }

        let html = browser.page_source()?;
        let extraction = extract_grades(&html)?;
        log::info!(
            "Extracted {} grades ({} items skipped)",
            extraction.records.len(),
            extraction.skipped
        );
        Ok(extraction)
    }
}

/// Set each stored cookie on its own so one rejected cookie does not lose the
/// rest of the session. Returns how many were set.
fn restore_cookies(browser: &BrowserSession<'_>, session: &SessionState) -> usize {
    let mut restored = 0;
    for cookie in &session.cookies {
        match browser.set_cookie(cookie.to_cdp()) {
            Ok(()) => restored += 1,
            Err(e) => log::warn!("Skipping cookie {}: {e}", cookie.name),
        }
    }
    if !session.cookies.is_empty() {
        log::info!(
            "Restored {restored} of {} session cookies",
            session.cookies.len()
        );
    }
    restored
}

/// Seed localStorage for the origin currently loaded. Returns true if anything
/// was written and the page needs reloading.
fn restore_local_storage(browser: &BrowserSession<'_>, session: &SessionState) -> bool {
    if session.origins.iter().all(|o| o.local_storage.is_empty()) {
        return false;
    }
    let current = match browser.execute("return window.location.origin;", Vec::new()) {
        Ok(Value::String(origin)) => origin,
        Ok(_) => return false,
        Err(e) => {
            log::warn!("Could not read page origin: {e}");
            return false;
        }
    };
    let Some(origin) = session
        .origins
        .iter()
        .find(|o| o.origin == current && !o.local_storage.is_empty())
    else {
        return false;
    };

    let entries: Vec<Value> = origin
        .local_storage
        .iter()
        .map(|entry| json!([entry.name, entry.value]))
        .collect();
    let script = "for (const [k, v] of arguments[0]) { window.localStorage.setItem(k, v); }";
    match browser.execute(script, vec![Value::Array(entries)]) {
        Ok(_) => {
            log::debug!("Restored localStorage for {current}");
            true
        }
        Err(e) => {
            log::warn!("Failed to restore localStorage for {current}: {e}");
            false
        }
    }
}
