use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::consts::{
    COLOR_GREEN, COLOR_ORANGE, COLOR_RED, EMBED_FOOTER, EMBED_TITLE, FIELD_DATE, FIELD_GRADE,
    FIELD_SUBJECT, WEBHOOK_USERNAME,
};
use crate::core::{GradeRecord, Severity};
use crate::error::NotifyError;

use super::Notifier;

pub(crate) struct DiscordNotifier {
    agent: ureq::Agent,
    webhook_url: String,
}

impl DiscordNotifier {
    pub(crate) fn new(webhook_url: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            webhook_url: webhook_url.to_string(),
        }
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, record: &GradeRecord, severity: Severity) -> Result<(), NotifyError> {
        let payload = build_payload(record, severity, Utc::now());
        self.agent.post(&self.webhook_url).send_json(&payload)?;
        Ok(())
    }
}

pub(crate) fn severity_color(severity: Severity) -> u32 {
    match severity {
        Severity::Pass => COLOR_GREEN,
        Severity::Borderline => COLOR_ORANGE,
        Severity::Fail => COLOR_RED,
    }
}

/// Webhook message with a single embed describing `record`
pub(crate) fn build_payload(
    record: &GradeRecord,
    severity: Severity,
    posted_at: DateTime<Utc>,
) -> Value {
    json!({
        "username": WEBHOOK_USERNAME,
        "embeds": [{
            "title": EMBED_TITLE,
            "color": severity_color(severity),
            "fields": [
                { "name": FIELD_SUBJECT, "value": record.subject, "inline": true },
                { "name": FIELD_GRADE, "value": record.grade, "inline": true },
                { "name": FIELD_DATE, "value": record.date, "inline": true }
            ],
            "footer": { "text": EMBED_FOOTER },
            "timestamp": posted_at.to_rfc3339()
        }]
    })
}
