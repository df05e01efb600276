//! The invitation-mail contract.
//!
//! The mail service owns rendering and delivery. Eventscope hands it only
//! the denormalized fields the invitation template needs, never the full
//! `Event` record.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EventScopeResult;
use crate::event::Event;

/// What the mail channel needs to render an invitation.
///
/// Field names follow the mail service's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSummary {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<&Event> for InvitationSummary {
    fn from(event: &Event) -> Self {
        InvitationSummary {
            title: event.title.clone(),
            description: (!event.description.is_empty()).then(|| event.description.clone()),
            start_date: event.start_date.format("%Y-%m-%d").to_string(),
            end_date: event.end_date.format("%Y-%m-%d").to_string(),
            start_time: event.start_time.format("%H:%M").to_string(),
            end_time: event.end_time.format("%H:%M").to_string(),
            location: (!event.location.is_empty()).then(|| event.location.clone()),
        }
    }
}

/// Receipt for an accepted invitation batch.
#[derive(Debug, Clone)]
pub struct EmailReceipt {
    pub message_id: Option<String>,
}

/// Sends invitation mail for events. Failures are reported to the caller
/// for logging but never abort the lifecycle operation that triggered the
/// send.
#[async_trait]
pub trait InvitationSender: Send + Sync {
    async fn send_invitation(
        &self,
        summary: &InvitationSummary,
        guests: &[String],
        organizer: &str,
    ) -> EventScopeResult<EmailReceipt>;
}
