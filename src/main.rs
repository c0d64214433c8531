mod app;
mod browser;
mod config;
mod consts;
mod core;
mod error;
mod notify;

use app::Watcher;
use browser::{SessionStore, WebDriverSource};
use config::Config;
use crate::core::HistoryStore;
use notify::DiscordNotifier;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let sessions = SessionStore::new(config.auth_state_file.clone());
    sessions.bootstrap(config.auth_state_json.as_deref());

    let source = WebDriverSource::from_config(&config);
    let notifier = DiscordNotifier::new(&config.webhook_url, config.webhook_timeout);
    let watcher = Watcher::new(
        sessions,
        HistoryStore::new(config.history_file.clone()),
        &source,
        &notifier,
        config.thresholds,
    );

    log::info!(
        "Starting grade watcher (interval: {}s, webdriver: {}, history: {})",
        config.check_interval.as_secs(),
        config.webdriver_url,
        config.history_file.display()
    );
    watcher.run_forever(config.check_interval)
}
