use std::sync::Arc;

use tracing::info;

use crate::app::ports::NotificationSink;
use crate::domain::ContactTicket;
use crate::error::Result;
use crate::render;

/// Use case for the support contact form: render the ticket and forward it
/// to the support channel as a single text message.
pub struct ContactService {
    notifier: Arc<dyn NotificationSink>,
}

impl ContactService {
    pub fn new(notifier: Arc<dyn NotificationSink>) -> Self {
        Self { notifier }
    }

    pub async fn handle(&self, ticket: &ContactTicket) -> Result<()> {
        info!(user = %ticket.name, "New support message");
        let text = render::ticket_message(ticket);
        self.notifier.send_text(&text).await?;
        info!("Support ticket forwarded");
        Ok(())
    }
}
