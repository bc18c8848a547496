use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::ports::{NotificationSink, TabularSink};
use crate::domain::{RegistrationKind, RegistrationSubmission};
use crate::error::Result;
use crate::render;

/// Spreadsheet tab names, one per registration kind.
#[derive(Debug, Clone)]
pub struct SheetTabs {
    pub solo: String,
    pub squad: String,
}

/// Use case for the registration intake workflow: render the notification,
/// deliver it, then best-effort append a row to the tabular log.
pub struct RegistrationService {
    notifier: Arc<dyn NotificationSink>,
    sheet: Option<(Arc<dyn TabularSink>, SheetTabs)>,
}

impl RegistrationService {
    pub fn new(
        notifier: Arc<dyn NotificationSink>,
        sheet: Option<(Arc<dyn TabularSink>, SheetTabs)>,
    ) -> Self {
        Self { notifier, sheet }
    }

    /// Dispatches one validated submission. The notification send is
    /// mandatory; a tabular append failure is logged and swallowed so the
    /// caller still sees success.
    pub async fn handle(&self, submission: &RegistrationSubmission) -> Result<()> {
        let registration_id = Uuid::new_v4();
        info!(
            %registration_id,
            kind = submission.kind.as_str(),
            player = %submission.player_name,
            "New registration"
        );

        let caption = render::registration_message(submission);
        self.notifier
            .send_photo(&submission.screenshot_url, &caption)
            .await?;
        info!(%registration_id, "Registration sent to notification channel");

        if let Some((sink, tabs)) = &self.sheet {
            let tab = match submission.kind {
                RegistrationKind::Solo => &tabs.solo,
                RegistrationKind::Squad => &tabs.squad,
            };
            if let Err(err) = sink.append_row(tab, sheet_row(submission)).await {
                warn!(%registration_id, error = %err, "Sheet append failed, continuing");
            }
        }

        Ok(())
    }
}

/// Builds the log row for a submission. Solo and squad rows carry different
/// column sets, so each kind gets its own tab.
fn sheet_row(submission: &RegistrationSubmission) -> Vec<String> {
    let mut row = vec![
        Utc::now().to_rfc3339(),
        submission.player_name.clone(),
        submission.phone.clone(),
        submission.email.clone(),
        submission.primary_uid.clone(),
    ];
    if submission.kind == RegistrationKind::Squad {
        row.extend(submission.teammate_uids.iter().cloned());
    }
    row.push(submission.payment_method.clone());
    row.push(submission.screenshot_url.clone());
    row
}
