//! Persisted browser session (storage-state file)
//!
//! The file is provisioned externally, either directly on disk or through
//! `AUTH_STATE_JSON` on first start. It is re-read at the start of every cycle.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::SessionError;

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SessionState {
    #[serde(default)]
    pub(crate) cookies: Vec<StoredCookie>,
    #[serde(default)]
    pub(crate) origins: Vec<StoredOrigin>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredCookie {
    pub(crate) name: String,
    pub(crate) value: String,
    #[serde(default)]
    pub(crate) domain: Option<String>,
    #[serde(default)]
    pub(crate) path: Option<String>,
    /// Unix seconds; negative for a session cookie
    #[serde(default)]
    pub(crate) expires: Option<f64>,
    #[serde(default)]
    pub(crate) http_only: Option<bool>,
    #[serde(default)]
    pub(crate) secure: Option<bool>,
    #[serde(default)]
    pub(crate) same_site: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoredOrigin {
    pub(crate) origin: String,
    #[serde(default, rename = "localStorage")]
    pub(crate) local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StorageEntry {
    pub(crate) name: String,
    pub(crate) value: String,
}

impl StoredCookie {
    /// Cookie parameter for the DevTools `Network.setCookie` command.
    /// Storage-state cookies already use DevTools field names.
    pub(crate) fn to_cdp(&self) -> Value {
        let mut cookie = Map::new();
        cookie.insert("name".into(), json!(self.name));
        cookie.insert("value".into(), json!(self.value));
        if let Some(domain) = &self.domain {
            cookie.insert("domain".into(), json!(domain));
        }
        if let Some(path) = &self.path {
            cookie.insert("path".into(), json!(path));
        }
        if let Some(expires) = self.expires
            && expires >= 0.0
        {
            cookie.insert("expires".into(), json!(expires));
        }
        if let Some(http_only) = self.http_only {
            cookie.insert("httpOnly".into(), json!(http_only));
        }
        if let Some(secure) = self.secure {
            cookie.insert("secure".into(), json!(secure));
        }
        if let Some(same_site) = &self.same_site {
            cookie.insert("sameSite".into(), json!(same_site));
        }
        Value::Object(cookie)
    }
}

pub(crate) struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Write `raw` to the session file if no file exists yet.
    pub(crate) fn bootstrap(&self, raw: Option<&str>) {
        if self.path.exists() {
            return;
        }
        match raw {
            Some(content) => {
                log::info!(
                    "Creating {} from AUTH_STATE_JSON",
                    self.path.display()
                );
                if let Err(e) = fs::write(&self.path, content) {
                    log::error!("Failed to write {}: {e}", self.path.display());
                }
            }
            None => log::warn!(
                "No session file at {} and AUTH_STATE_JSON is not set",
                self.path.display()
            ),
        }
    }

    pub(crate) fn acquire(&self) -> Result<SessionState, SessionError> {
        let content = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                SessionError::Missing {
                    path: self.path.clone(),
                }
            } else {
                SessionError::Unreadable {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}
