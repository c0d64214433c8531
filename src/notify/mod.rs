//! Outbound grade notifications

mod discord;

use crate::core::{GradeRecord, Severity};
use crate::error::NotifyError;

pub(crate) use discord::DiscordNotifier;

/// Delivers one new grade. Delivery is best effort: the caller records the
/// grade as seen whether or not this succeeds.
pub(crate) trait Notifier {
    fn notify(&self, record: &GradeRecord, severity: Severity) -> Result<(), NotifyError>;
}
