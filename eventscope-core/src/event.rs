//! Schedule entry types.
//!
//! These types represent events in the local schedule. The CLI works
//! exclusively with them; collaborators receive denormalized projections
//! (`MirrorEvent`, `InvitationSummary`) instead of the full record.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EventScopeError, EventScopeResult};

/// A schedule entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Opaque unique id, assigned at creation, never reused.
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    /// IANA timezone name, used for mirror payloads and display only.
    pub timezone: String,
    pub location: String,
    /// Group the guest list was seeded from, if any. Does not constrain
    /// the guest list afterwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Guest email addresses. Stored in order, semantically a set.
    pub guests: Vec<String>,
    pub rsvp_required: bool,
    pub notifications: NotificationPrefs,
    pub privacy: Privacy,
    pub created_at: DateTime<Utc>,
    /// Set when the event is soft-deleted; cleared by recovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Id of the mirrored copy in the external calendar, when one exists.
    /// Survives soft-delete and recovery; only a purge discards it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_calendar_event_id: Option<String>,
}

impl Event {
    /// Build a fresh event from a draft. Assigns the id and creation time;
    /// the draft's guests are deduplicated by exact match.
    pub fn from_draft(draft: EventDraft, now: DateTime<Utc>) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            start_date: draft.start_date,
            start_time: draft.start_time,
            end_date: draft.end_date,
            end_time: draft.end_time,
            timezone: draft.timezone,
            location: draft.location,
            team: draft.team,
            guests: dedup_guests(draft.guests),
            rsvp_required: draft.rsvp_required,
            notifications: draft.notifications,
            privacy: draft.privacy,
            created_at: now,
            deleted_at: None,
            external_calendar_event_id: None,
        }
    }

    /// Overwrite the mutable fields with a draft, keeping identity and
    /// lifecycle fields (`id`, `created_at`, `deleted_at`, the mirror id).
    pub fn apply(&mut self, draft: EventDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.start_date = draft.start_date;
        self.start_time = draft.start_time;
        self.end_date = draft.end_date;
        self.end_time = draft.end_time;
        self.timezone = draft.timezone;
        self.location = draft.location;
        self.team = draft.team;
        self.guests = dedup_guests(draft.guests);
        self.rsvp_required = draft.rsvp_required;
        self.notifications = draft.notifications;
        self.privacy = draft.privacy;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Per-event notification switches. Only `email` gates a dispatch channel
/// in this core; `push` and `sms` are stored preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        NotificationPrefs {
            email: true,
            push: false,
            sms: false,
        }
    }
}

/// Who can see the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Privacy {
    TeamOnly,
    Public,
}

/// The mutable fields of an event, as submitted by a create or edit intent.
///
/// Dates and times are typed, so "present" is enforced at parse time by the
/// caller; `validate` covers the remaining required-field rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub timezone: String,
    pub location: String,
    pub team: Option<String>,
    pub guests: Vec<String>,
    pub rsvp_required: bool,
    pub notifications: NotificationPrefs,
    pub privacy: Privacy,
}

impl EventDraft {
    /// Reject drafts missing a required field. A rejected draft must never
    /// reach the store.
    pub fn validate(&self) -> EventScopeResult<()> {
        if self.title.trim().is_empty() {
            return Err(EventScopeError::Validation("title is required".into()));
        }
        Ok(())
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: event.start_date,
            start_time: event.start_time,
            end_date: event.end_date,
            end_time: event.end_time,
            timezone: event.timezone.clone(),
            location: event.location.clone(),
            team: event.team.clone(),
            guests: event.guests.clone(),
            rsvp_required: event.rsvp_required,
            notifications: event.notifications,
            privacy: event.privacy,
        }
    }
}

/// Deduplicate guest addresses by exact string match, keeping first-seen
/// order.
pub fn dedup_guests(guests: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    guests
        .into_iter()
        .filter(|guest| seen.insert(guest.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_draft() -> EventDraft {
        EventDraft {
            title: "Team Standup".to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            timezone: "UTC".to_string(),
            location: String::new(),
            team: None,
            guests: vec![],
            rsvp_required: false,
            notifications: NotificationPrefs::default(),
            privacy: Privacy::TeamOnly,
        }
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let guests = vec![
            "a@x.com".to_string(),
            "a@x.com".to_string(),
            "b@x.com".to_string(),
        ];
        assert_eq!(dedup_guests(guests), vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn from_draft_assigns_id_and_creation_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let event = Event::from_draft(make_draft(), now);
        assert!(!event.id.is_empty());
        assert_eq!(event.created_at, now);
        assert!(event.deleted_at.is_none());
        assert!(event.external_calendar_event_id.is_none());
    }

    #[test]
    fn from_draft_dedups_guests() {
        let mut draft = make_draft();
        draft.guests = vec![
            "a@x.com".to_string(),
            "a@x.com".to_string(),
            "b@x.com".to_string(),
        ];
        let event = Event::from_draft(draft, Utc::now());
        assert_eq!(event.guests, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn apply_keeps_identity_and_lifecycle_fields() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut event = Event::from_draft(make_draft(), now);
        event.external_calendar_event_id = Some("gcal-123".to_string());
        let id = event.id.clone();

        let mut draft = EventDraft::from(&event);
        draft.title = "Quarterly Review".to_string();
        draft.location = "Room 4".to_string();
        event.apply(draft);

        assert_eq!(event.id, id);
        assert_eq!(event.created_at, now);
        assert_eq!(
            event.external_calendar_event_id.as_deref(),
            Some("gcal-123")
        );
        assert_eq!(event.title, "Quarterly Review");
        assert_eq!(event.location, "Room 4");
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut draft = make_draft();
        draft.title = "   ".to_string();
        assert!(matches!(
            draft.validate(),
            Err(crate::error::EventScopeError::Validation(_))
        ));
    }

    #[test]
    fn privacy_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Privacy::TeamOnly).unwrap(),
            "\"team-only\""
        );
        assert_eq!(serde_json::to_string(&Privacy::Public).unwrap(), "\"public\"");
        let parsed: Privacy = serde_json::from_str("\"team-only\"").unwrap();
        assert_eq!(parsed, Privacy::TeamOnly);
    }
}
