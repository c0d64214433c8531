//! Minimal W3C WebDriver client over `ureq`
//!
//! Talks to an already running driver (chromedriver by default). Only the
//! handful of commands needed to load one page and read its source.

use std::time::{Duration, Instant};

use serde_json::{Value, json};

use crate::error::ExtractError;

/// Extra HTTP allowance on top of the page-load timeout, so the driver reports
/// the navigation timeout before the transport gives up.
const HTTP_GRACE: Duration = Duration::from_secs(30);

enum Command {
    Get,
    Post(Value),
    Delete,
}

pub(crate) struct WebDriver {
    agent: ureq::Agent,
    base_url: String,
}

impl WebDriver {
    pub(crate) fn new(base_url: &str, page_load_timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(page_load_timeout + HTTP_GRACE))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Launch a Chrome session. The session is deleted when the handle drops.
    pub(crate) fn start_session(&self, headless: bool) -> Result<BrowserSession<'_>, ExtractError> {
        let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage"];
        if headless {
            args.push("--headless=new");
        }
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let value = self.send("new session", "/session", Command::Post(capabilities))?;
        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| ExtractError::WebDriver {
                context: "new session",
                message: "response has no sessionId".to_string(),
            })?
            .to_string();

        log::debug!("Started browser session {id} (headless: {headless})");
        Ok(BrowserSession { driver: self, id })
    }

    fn send(&self, context: &'static str, path: &str, command: Command) -> Result<Value, ExtractError> {
        let url = format!("{}{}", self.base_url, path);
        let mut response = match command {
            Command::Get => self.agent.get(&url).call()?,
            Command::Post(body) => self.agent.post(&url).send_json(&body)?,
            Command::Delete => self.agent.delete(&url).call()?,
        };

        let status = response.status();
        let payload: Value = response.body_mut().read_json()?;
        let value = payload.get("value").cloned().unwrap_or(Value::Null);

        if !status.is_success() {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            let detail = value.get("message").and_then(Value::as_str).unwrap_or("");
            return Err(ExtractError::WebDriver {
                context,
                message: format!("{error}: {detail} (HTTP {})", status.as_u16()),
            });
        }

        Ok(value)
    }
}

pub(crate) struct BrowserSession<'a> {
    driver: &'a WebDriver,
    id: String,
}

impl BrowserSession<'_> {
    fn send(&self, context: &'static str, suffix: &str, command: Command) -> Result<Value, ExtractError> {
        let path = format!("/session/{}{}", self.id, suffix);
        self.driver.send(context, &path, command)
    }

    pub(crate) fn set_page_load_timeout(&self, timeout: Duration) -> Result<(), ExtractError> {
        let body = json!({ "pageLoad": timeout.as_millis() as u64 });
        self.send("set timeouts", "/timeouts", Command::Post(body))?;
        Ok(())
    }

    pub(crate) fn navigate(&self, url: &str) -> Result<(), ExtractError> {
        self.send("navigate", "/url", Command::Post(json!({ "url": url })))?;
        Ok(())
    }

    /// Set one cookie for any domain through chromedriver's DevTools passthrough.
    pub(crate) fn set_cookie(&self, cookie: Value) -> Result<(), ExtractError> {
        let body = json!({
            "cmd": "Network.setCookie",
            "params": cookie
        });
        let value = self.send("set cookie", "/goog/cdp/execute", Command::Post(body))?;
        // DevTools reports a rejected cookie as `success: false` rather than an error
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(ExtractError::WebDriver {
                context: "set cookie",
                message: "cookie rejected by browser".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, ExtractError> {
        let body = json!({ "script": script, "args": args });
        self.send("execute script", "/execute/sync", Command::Post(body))
    }

    pub(crate) fn has_element(&self, css: &str) -> Result<bool, ExtractError> {
        let body = json!({ "using": "css selector", "value": css });
        match self.send("find element", "/element", Command::Post(body)) {
            Ok(_) => Ok(true),
            Err(ExtractError::WebDriver { message, .. }) if message.starts_with("no such element") => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Poll for `css` until it appears or `timeout` elapses. `Ok(false)` on timeout.
    pub(crate) fn wait_for(&self, css: &str, timeout: Duration, poll: Duration) -> Result<bool, ExtractError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.has_element(css)? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            std::thread::sleep(poll);
        }
    }

    pub(crate) fn page_source(&self) -> Result<String, ExtractError> {
        let value = self.send("page source", "/source", Command::Get)?;
        match value {
            Value::String(html) => Ok(html),
            other => Err(ExtractError::WebDriver {
                context: "page source",
                message: format!("expected a string, got {other}"),
            }),
        }
    }
}

impl Drop for BrowserSession<'_> {
    fn drop(&mut self) {
        match self.send("delete session", "", Command::Delete) {
            Ok(_) => log::debug!("Closed browser session {}", self.id),
            Err(e) => log::warn!("Failed to close browser session {}: {e}", self.id),
        }
    }
}
