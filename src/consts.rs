use std::time::Duration;

/// Default history file, relative to the working directory
pub(crate) const HISTORY_FILE: &str = "grades_history.json";

/// Default browser storage-state file, relative to the working directory
pub(crate) const AUTH_STATE_FILE: &str = "auth_state.json";

pub(crate) const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(3600);
pub(crate) const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);
pub(crate) const DEFAULT_WIDGET_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const WIDGET_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// chromedriver's default listen address
pub(crate) const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Grades widget on the Hyperplanning home page
pub(crate) const WIDGET_SELECTOR: &str = "section.notes";
pub(crate) const ITEM_SELECTOR: &str = "section.notes ul.liste-clickable li";
pub(crate) const SUBJECT_SELECTOR: &str = "h3 span";
pub(crate) const DATE_SELECTOR: &str = ".date";
pub(crate) const GRADE_SELECTOR: &str = ".as-info.fixed";

pub(crate) const WEBHOOK_USERNAME: &str = "HyperPlanning Bot";
pub(crate) const EMBED_TITLE: &str = "Nouvelle Note Détectée ! 🎓";
pub(crate) const EMBED_FOOTER: &str = "Hyperplanning Bot - INSA";
pub(crate) const FIELD_SUBJECT: &str = "Matière";
pub(crate) const FIELD_GRADE: &str = "Note";
pub(crate) const FIELD_DATE: &str = "Date";

pub(crate) const COLOR_GREEN: u32 = 3_066_993;
pub(crate) const COLOR_ORANGE: u32 = 15_105_570;
pub(crate) const COLOR_RED: u32 = 15_158_332;
