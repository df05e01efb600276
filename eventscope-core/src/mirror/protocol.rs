//! Defines the JSON protocol used for communication between eventscope
//! and provider binaries over stdin/stdout.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{EventScopeError, EventScopeResult};
use crate::event::Event;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
}

/// Request sent from eventscope to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from a provider to eventscope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

// ============================================================================
// Mirror payload
// ============================================================================

/// An event as sent to providers: date-times joined from the event's date
/// and time-of-day fields, with the zone passed along as its IANA name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorEvent {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: MirrorTime,
    pub end: MirrorTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
}

impl TryFrom<&Event> for MirrorEvent {
    type Error = EventScopeError;

    fn try_from(event: &Event) -> EventScopeResult<Self> {
        // Providers interpret date_time in the named zone, so the zone has
        // to be a real IANA name
        event.timezone.parse::<Tz>().map_err(|_| {
            EventScopeError::Sync(format!("unknown timezone: {}", event.timezone))
        })?;

        Ok(MirrorEvent {
            summary: event.title.clone(),
            description: (!event.description.is_empty()).then(|| event.description.clone()),
            start: MirrorTime {
                date_time: event
                    .start_date
                    .and_time(event.start_time)
                    .format("%Y-%m-%dT%H:%M:%S")
                    .to_string(),
                time_zone: event.timezone.clone(),
            },
            end: MirrorTime {
                date_time: event
                    .end_date
                    .and_time(event.end_time)
                    .format("%Y-%m-%dT%H:%M:%S")
                    .to_string(),
                time_zone: event.timezone.clone(),
            },
            location: (!event.location.is_empty()).then(|| event.location.clone()),
            attendees: event
                .guests
                .iter()
                .map(|email| Attendee {
                    email: email.clone(),
                })
                .collect(),
        })
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Mirror a new event. Responds with the id of the external copy.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    /// Provider-specific config (e.g., google_account, google_calendar_id)
    #[serde(flatten)]
    pub mirror_config: serde_json::Map<String, serde_json::Value>,
    pub event: MirrorEvent,
}

impl ProviderCommand for CreateEvent {
    type Response = String;
    fn command() -> Command {
        Command::CreateEvent
    }
}

/// Push changed fields to an existing external copy.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateEvent {
    #[serde(flatten)]
    pub mirror_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
    pub event: MirrorEvent,
}

impl ProviderCommand for UpdateEvent {
    type Response = ();
    fn command() -> Command {
        Command::UpdateEvent
    }
}

/// Remove an external copy by id.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvent {
    #[serde(flatten)]
    pub mirror_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
}

impl ProviderCommand for DeleteEvent {
    type Response = ();
    fn command() -> Command {
        Command::DeleteEvent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventDraft, NotificationPrefs, Privacy};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn make_event() -> Event {
        Event::from_draft(
            EventDraft {
                title: "Planning".to_string(),
                description: "Q2 planning".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
                start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
                end_time: NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
                timezone: "Europe/Stockholm".to_string(),
                location: String::new(),
                team: None,
                guests: vec!["a@x.com".to_string(), "b@x.com".to_string()],
                rsvp_required: false,
                notifications: NotificationPrefs::default(),
                privacy: Privacy::Public,
            },
            Utc::now(),
        )
    }

    #[test]
    fn mirror_event_joins_date_and_time() {
        let mirror = MirrorEvent::try_from(&make_event()).unwrap();
        assert_eq!(mirror.start.date_time, "2026-03-20T15:00:00");
        assert_eq!(mirror.start.time_zone, "Europe/Stockholm");
        assert_eq!(mirror.end.date_time, "2026-03-20T16:30:00");
        assert_eq!(mirror.attendees.len(), 2);
        assert_eq!(mirror.attendees[0].email, "a@x.com");
        assert!(mirror.location.is_none());
    }

    #[test]
    fn mirror_event_rejects_unknown_timezone() {
        let mut event = make_event();
        event.timezone = "Moon/Tranquility".to_string();
        assert!(matches!(
            MirrorEvent::try_from(&event),
            Err(EventScopeError::Sync(_))
        ));
    }

    #[test]
    fn mirror_time_serializes_with_wire_field_names() {
        let mirror = MirrorEvent::try_from(&make_event()).unwrap();
        let value = serde_json::to_value(&mirror.start).unwrap();
        assert_eq!(value["dateTime"], "2026-03-20T15:00:00");
        assert_eq!(value["timeZone"], "Europe/Stockholm");
    }

    #[test]
    fn response_round_trips_success_and_error() {
        let success: Response<String> =
            serde_json::from_str(r#"{"status":"success","data":"gcal-123"}"#).unwrap();
        assert!(matches!(success, Response::Success { data } if data == "gcal-123"));

        let error: Response<String> =
            serde_json::from_str(r#"{"status":"error","error":"expired token"}"#).unwrap();
        assert!(matches!(error, Response::Error { error } if error == "expired token"));
    }

    #[test]
    fn create_command_flattens_mirror_config() {
        let mut config = serde_json::Map::new();
        config.insert("google_account".to_string(), "me@x.com".into());

        let cmd = CreateEvent {
            mirror_config: config,
            event: MirrorEvent::try_from(&make_event()).unwrap(),
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["google_account"], "me@x.com");
        assert_eq!(value["event"]["summary"], "Planning");
    }
}
