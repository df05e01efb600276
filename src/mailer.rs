//! HTTP client for the invitation mail service.
//!
//! The mail service owns templating and delivery; this client only posts
//! the denormalized event fields the template renders.

use std::time::Duration;

use async_trait::async_trait;
use eventscope_core::error::{EventScopeError, EventScopeResult};
use eventscope_core::invite::{EmailReceipt, InvitationSender, InvitationSummary};
use serde::{Deserialize, Serialize};

const SEND_INVITATION_PATH: &str = "/api/email/send-event-invitation";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MailerClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendInvitationRequest<'a> {
    event_data: &'a InvitationSummary,
    guests: &'a [String],
    organizer: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendInvitationResponse {
    success: bool,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl MailerClient {
    pub fn new(base_url: &str) -> EventScopeResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EventScopeError::Mail(e.to_string()))?;

        Ok(MailerClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl InvitationSender for MailerClient {
    async fn send_invitation(
        &self,
        summary: &InvitationSummary,
        guests: &[String],
        organizer: &str,
    ) -> EventScopeResult<EmailReceipt> {
        let url = format!("{}{}", self.base_url, SEND_INVITATION_PATH);

        let response = self
            .http
            .post(&url)
            .json(&SendInvitationRequest {
                event_data: summary,
                guests,
                organizer,
            })
            .send()
            .await
            .map_err(|e| EventScopeError::Mail(e.to_string()))?;

        let status = response.status();
        let body: SendInvitationResponse = response
            .json()
            .await
            .map_err(|e| EventScopeError::Mail(format!("Malformed mailer response: {e}")))?;

        if !status.is_success() || !body.success {
            let reason = body
                .error
                .unwrap_or_else(|| format!("mailer returned {status}"));
            return Err(EventScopeError::Mail(reason));
        }

        Ok(EmailReceipt {
            message_id: body.message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use eventscope_core::event::{Event, EventDraft, NotificationPrefs, Privacy};

    fn make_summary() -> InvitationSummary {
        let event = Event::from_draft(
            EventDraft {
                title: "Planning".to_string(),
                description: "Q2 planning".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
                start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
                end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
                timezone: "UTC".to_string(),
                location: "HQ".to_string(),
                team: None,
                guests: vec!["a@x.com".to_string()],
                rsvp_required: false,
                notifications: NotificationPrefs::default(),
                privacy: Privacy::TeamOnly,
            },
            Utc::now(),
        );
        InvitationSummary::from(&event)
    }

    #[tokio::test]
    async fn successful_send_returns_the_message_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SEND_INVITATION_PATH)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"message":"Invitations sent to 1 guest(s)","messageId":"msg-42"}"#)
            .create_async()
            .await;

        let client = MailerClient::new(&server.url()).unwrap();
        let receipt = client
            .send_invitation(&make_summary(), &["a@x.com".to_string()], "Alex Chen")
            .await
            .unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("msg-42"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn mailer_error_body_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", SEND_INVITATION_PATH)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"error":"SMTP connection refused"}"#)
            .create_async()
            .await;

        let client = MailerClient::new(&server.url()).unwrap();
        let result = client
            .send_invitation(&make_summary(), &["a@x.com".to_string()], "Alex Chen")
            .await;

        assert!(matches!(
            result,
            Err(EventScopeError::Mail(reason)) if reason.contains("SMTP connection refused")
        ));
    }

    #[tokio::test]
    async fn unreachable_mailer_is_a_mail_error() {
        // Nothing listens on this port
        let client = MailerClient::new("http://127.0.0.1:1").unwrap();
        let result = client
            .send_invitation(&make_summary(), &["a@x.com".to_string()], "Alex Chen")
            .await;

        assert!(matches!(result, Err(EventScopeError::Mail(_))));
    }
}
