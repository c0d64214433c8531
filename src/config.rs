use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{
    AUTH_STATE_FILE, DEFAULT_CHECK_INTERVAL, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_WEBDRIVER_URL,
    DEFAULT_WEBHOOK_TIMEOUT, DEFAULT_WIDGET_TIMEOUT, HISTORY_FILE,
};
use crate::core::Thresholds;
use crate::error::ConfigError;

/// Optional settings file. Every key can be overridden from the environment.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FileConfig {
    #[serde(default)]
    pub(crate) hp_url: Option<String>,
    #[serde(default)]
    pub(crate) webhook_url: Option<String>,
    #[serde(default)]
    pub(crate) check_interval_seconds: Option<u64>,
    #[serde(default)]
    pub(crate) headless: Option<bool>,
    #[serde(default)]
    pub(crate) history_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) auth_state_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) webdriver_url: Option<String>,
    #[serde(default)]
    pub(crate) navigation_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub(crate) widget_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub(crate) webhook_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub(crate) pass_threshold: Option<f64>,
    #[serde(default)]
    pub(crate) borderline_threshold: Option<f64>,
}

impl FileConfig {
    pub(crate) fn load() -> Self {
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<FileConfig>(&content) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/gradewatch/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("gradewatch").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, XDG_CONFIG_HOME)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("gradewatch").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.gradewatch.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".gradewatch.toml"));
        }

        paths
    }
}

/// Process configuration, built once at startup and handed to the watcher.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) hp_url: String,
    pub(crate) webhook_url: String,
    pub(crate) check_interval: Duration,
    pub(crate) headless: bool,
    /// Raw storage state used to create `auth_state_file` when it is absent
    pub(crate) auth_state_json: Option<String>,
    pub(crate) auth_state_file: PathBuf,
    pub(crate) history_file: PathBuf,
    pub(crate) webdriver_url: String,
    pub(crate) navigation_timeout: Duration,
    pub(crate) widget_timeout: Duration,
    pub(crate) webhook_timeout: Duration,
    pub(crate) thresholds: Thresholds,
}

impl Config {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        Self::from_sources(FileConfig::load(), |key| std::env::var(key).ok())
    }

    /// Merge the file layer with environment lookups; the environment wins.
    /// Empty environment values count as unset.
    pub(crate) fn from_sources<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let hp_url = var("HP_URL")
            .or(file.hp_url)
            .ok_or(ConfigError::Missing { var: "HP_URL" })?;
        let webhook_url = var("DISCORD_WEBHOOK_URL")
            .or(file.webhook_url)
            .ok_or(ConfigError::Missing {
                var: "DISCORD_WEBHOOK_URL",
            })?;

        let check_interval = match var("CHECK_INTERVAL_SECONDS") {
            Some(input) => match input.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidInterval { input }),
            },
            None => match file.check_interval_seconds {
                Some(0) => {
                    return Err(ConfigError::InvalidInterval {
                        input: "0".to_string(),
                    });
                }
                Some(secs) => Duration::from_secs(secs),
                None => DEFAULT_CHECK_INTERVAL,
            },
        };

        let headless = match var("HEADLESS_MODE") {
            Some(value) => parse_flag(&value),
            None => file.headless.unwrap_or(true),
        };

        let navigation_timeout = seconds_setting(
            "NAVIGATION_TIMEOUT_SECONDS",
            var("NAVIGATION_TIMEOUT_SECONDS"),
            file.navigation_timeout_seconds,
            DEFAULT_NAVIGATION_TIMEOUT,
        )?;
        let widget_timeout = seconds_setting(
            "WIDGET_TIMEOUT_SECONDS",
            var("WIDGET_TIMEOUT_SECONDS"),
            file.widget_timeout_seconds,
            DEFAULT_WIDGET_TIMEOUT,
        )?;
        let webhook_timeout = seconds_setting(
            "WEBHOOK_TIMEOUT_SECONDS",
            var("WEBHOOK_TIMEOUT_SECONDS"),
            file.webhook_timeout_seconds,
            DEFAULT_WEBHOOK_TIMEOUT,
        )?;

        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            pass: file.pass_threshold.unwrap_or(defaults.pass),
            borderline: file.borderline_threshold.unwrap_or(defaults.borderline),
        };
        let ordered = thresholds.borderline <= thresholds.pass;
        if !ordered {
            return Err(ConfigError::InvalidThresholds {
                pass: thresholds.pass,
                borderline: thresholds.borderline,
            });
        }

        Ok(Self {
            hp_url,
            webhook_url,
            check_interval,
            headless,
            auth_state_json: env("AUTH_STATE_JSON").filter(|value| !value.trim().is_empty()),
            auth_state_file: var("AUTH_STATE_FILE")
                .map(PathBuf::from)
                .or(file.auth_state_file)
                .unwrap_or_else(|| PathBuf::from(AUTH_STATE_FILE)),
            history_file: var("HISTORY_FILE")
                .map(PathBuf::from)
                .or(file.history_file)
                .unwrap_or_else(|| PathBuf::from(HISTORY_FILE)),
            webdriver_url: var("WEBDRIVER_URL")
                .or(file.webdriver_url)
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            navigation_timeout,
            widget_timeout,
            webhook_timeout,
            thresholds,
        })
    }
}

/// `true`, `1`, `yes` and `on` (any case) are true; anything else is false.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn seconds_setting(
    name: &'static str,
    env_value: Option<String>,
    file_value: Option<u64>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs = match env_value {
        Some(input) => match input.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => return Err(ConfigError::InvalidTimeout { var: name, input }),
        },
        None => match file_value {
            Some(0) => {
                return Err(ConfigError::InvalidTimeout {
                    var: name,
                    input: "0".to_string(),
                });
            }
            Some(secs) => secs,
            None => return Ok(default),
        },
    };
    Ok(Duration::from_secs(secs))
}
