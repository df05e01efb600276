//! Notification fan-out.
//!
//! After a lifecycle operation commits locally, the dispatcher hands the
//! event to its side channels: invitation mail and the external calendar
//! mirror. The channels are independent of each other and of the caller:
//! a channel failure becomes a warning in the [`DispatchReport`], never an
//! error on the operation that already committed.

use std::collections::HashMap;
use std::sync::Arc;

use eventscope_core::config::EventScopeConfig;
use eventscope_core::error::EventScopeResult;
use eventscope_core::event::Event;
use eventscope_core::invite::{EmailReceipt, InvitationSender, InvitationSummary};
use eventscope_core::mirror::CalendarMirror;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::mailer::MailerClient;

/// Organizer name used when none is configured.
const DEFAULT_ORGANIZER: &str = "Event Organizer";

/// Outcome of one fan-out, reported after the primary mutation committed.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Message id from the mailer, when invitations went out.
    pub mail_message_id: Option<String>,
    /// External calendar id from a successful mirror create.
    pub mirror_id: Option<String>,
    /// Channel failures, already logged; kept for display as warnings.
    pub warnings: Vec<String>,
}

impl DispatchReport {
    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

enum MirrorChange {
    Create(Event),
    Update(Event, String),
    Delete(String),
}

pub struct Dispatcher {
    mailer: Option<Arc<dyn InvitationSender>>,
    mirror: Option<Arc<dyn CalendarMirror>>,
    organizer: String,
    mirror_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl Dispatcher {
    pub fn new(
        mailer: Option<Arc<dyn InvitationSender>>,
        mirror: Option<Arc<dyn CalendarMirror>>,
        organizer: Option<String>,
    ) -> Self {
        Dispatcher {
            mailer,
            mirror,
            organizer: organizer.unwrap_or_else(|| DEFAULT_ORGANIZER.to_string()),
            mirror_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &EventScopeConfig) -> EventScopeResult<Self> {
        let mailer: Option<Arc<dyn InvitationSender>> = match &config.mailer {
            Some(mailer) => Some(Arc::new(MailerClient::new(&mailer.url)?)),
            None => None,
        };
        let mirror: Option<Arc<dyn CalendarMirror>> = config
            .mirror
            .clone()
            .map(|mirror| Arc::new(mirror) as Arc<dyn CalendarMirror>);

        Ok(Dispatcher::new(mailer, mirror, config.organizer.clone()))
    }

    /// Fan out a committed create: invitation mail plus a mirror create.
    /// A returned `mirror_id` is the caller's cue to write the external id
    /// back onto the stored event.
    pub async fn event_created(&self, event: &Event) -> DispatchReport {
        let mail = self.spawn_mail(event);
        let mirror = self.spawn_mirror(event.id.clone(), MirrorChange::Create(event.clone()));
        self.collect(mail, mirror).await
    }

    /// Fan out a committed update. Only mirrored events have anything to
    /// sync.
    pub async fn event_updated(&self, event: &Event) -> DispatchReport {
        let Some(external_id) = event.external_calendar_event_id.clone() else {
            tracing::debug!("event {} is not mirrored; nothing to sync", event.id);
            return DispatchReport::default();
        };
        let mirror = self.spawn_mirror(
            event.id.clone(),
            MirrorChange::Update(event.clone(), external_id),
        );
        self.collect(None, mirror).await
    }

    /// Fan out a committed soft-delete: remove the external copy, when one
    /// exists. The local record keeps its mirror id so a recovery can still
    /// address the same external event.
    pub async fn event_deleted(&self, event: &Event) -> DispatchReport {
        let Some(external_id) = event.external_calendar_event_id.clone() else {
            tracing::debug!("event {} is not mirrored; nothing to sync", event.id);
            return DispatchReport::default();
        };
        let mirror = self.spawn_mirror(event.id.clone(), MirrorChange::Delete(external_id));
        self.collect(None, mirror).await
    }

    fn spawn_mail(
        &self,
        event: &Event,
    ) -> Option<JoinHandle<EventScopeResult<EmailReceipt>>> {
        let mailer = match &self.mailer {
            Some(mailer) => mailer.clone(),
            None => {
                tracing::debug!("mailer not configured; skipping invitation mail");
                return None;
            }
        };
        if !event.notifications.email || event.guests.is_empty() {
            return None;
        }

        let summary = InvitationSummary::from(event);
        let guests = event.guests.clone();
        let organizer = self.organizer.clone();
        Some(tokio::spawn(async move {
            mailer.send_invitation(&summary, &guests, &organizer).await
        }))
    }

    fn spawn_mirror(
        &self,
        event_id: String,
        change: MirrorChange,
    ) -> Option<JoinHandle<EventScopeResult<Option<String>>>> {
        let mirror = match &self.mirror {
            Some(mirror) => mirror.clone(),
            None => {
                tracing::debug!("calendar mirror not configured; skipping sync");
                return None;
            }
        };
        let locks = self.mirror_locks.clone();

        Some(tokio::spawn(async move {
            // At most one in-flight mirror call per event, so the external
            // calendar never sees changes out of order
            let lock = {
                let mut locks = locks.lock().await;
                locks.entry(event_id).or_default().clone()
            };
            let _guard = lock.lock().await;

            match change {
                MirrorChange::Create(event) => mirror.create_event(&event).await.map(Some),
                MirrorChange::Update(event, external_id) => {
                    mirror.update_event(&event, &external_id).await.map(|()| None)
                }
                MirrorChange::Delete(external_id) => {
                    mirror.delete_event(&external_id).await.map(|()| None)
                }
            }
        }))
    }

    async fn collect(
        &self,
        mail: Option<JoinHandle<EventScopeResult<EmailReceipt>>>,
        mirror: Option<JoinHandle<EventScopeResult<Option<String>>>>,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        if let Some(handle) = mail {
            match handle.await {
                Ok(Ok(receipt)) => report.mail_message_id = receipt.message_id,
                Ok(Err(e)) => report.warn(format!("invitation mail failed: {e}")),
                Err(e) => report.warn(format!("mail task failed: {e}")),
            }
        }

        if let Some(handle) = mirror {
            match handle.await {
                Ok(Ok(external_id)) => report.mirror_id = external_id,
                Ok(Err(e)) => report.warn(format!("calendar sync failed: {e}")),
                Err(e) => report.warn(format!("calendar sync task failed: {e}")),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use eventscope_core::error::EventScopeError;
    use eventscope_core::Schedule;
    use eventscope_core::event::{EventDraft, NotificationPrefs, Privacy};
    use eventscope_core::store::MemoryStore;
    use std::sync::Mutex as StdMutex;

    fn make_draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            timezone: "UTC".to_string(),
            location: String::new(),
            team: None,
            guests: vec!["a@x.com".to_string()],
            rsvp_required: false,
            notifications: NotificationPrefs::default(),
            privacy: Privacy::TeamOnly,
        }
    }

    fn make_event(title: &str) -> Event {
        Event::from_draft(make_draft(title), Utc::now())
    }

    #[derive(Default)]
    struct RecordingMirror {
        calls: StdMutex<Vec<String>>,
    }

    impl RecordingMirror {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CalendarMirror for RecordingMirror {
        async fn create_event(&self, event: &Event) -> EventScopeResult<String> {
            self.calls.lock().unwrap().push(format!("create {}", event.title));
            Ok("gcal-123".to_string())
        }

        async fn update_event(&self, event: &Event, external_id: &str) -> EventScopeResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("update {} {}", event.title, external_id));
            Ok(())
        }

        async fn delete_event(&self, external_id: &str) -> EventScopeResult<()> {
            self.calls.lock().unwrap().push(format!("delete {external_id}"));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: StdMutex<Vec<(String, Vec<String>, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl InvitationSender for RecordingSender {
        async fn send_invitation(
            &self,
            summary: &InvitationSummary,
            guests: &[String],
            organizer: &str,
        ) -> EventScopeResult<EmailReceipt> {
            if self.fail {
                return Err(EventScopeError::Mail("SMTP unreachable".into()));
            }
            self.sent.lock().unwrap().push((
                summary.title.clone(),
                guests.to_vec(),
                organizer.to_string(),
            ));
            Ok(EmailReceipt {
                message_id: Some("msg-1".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn created_reports_mail_and_mirror_results() {
        let mirror = Arc::new(RecordingMirror::default());
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = Dispatcher::new(
            Some(sender.clone()),
            Some(mirror.clone()),
            Some("Alex Chen".to_string()),
        );

        let report = dispatcher.event_created(&make_event("Planning")).await;

        assert_eq!(report.mirror_id.as_deref(), Some("gcal-123"));
        assert_eq!(report.mail_message_id.as_deref(), Some("msg-1"));
        assert!(report.warnings.is_empty());
        assert_eq!(mirror.calls(), vec!["create Planning"]);
        let sent = sender.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, vec!["a@x.com"]);
        assert_eq!(sent[0].2, "Alex Chen");
    }

    #[tokio::test]
    async fn mail_failure_does_not_stop_the_mirror() {
        let mirror = Arc::new(RecordingMirror::default());
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(Some(sender), Some(mirror.clone()), None);

        let report = dispatcher.event_created(&make_event("Planning")).await;

        assert_eq!(report.mirror_id.as_deref(), Some("gcal-123"));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("SMTP unreachable"));
        assert_eq!(mirror.calls(), vec!["create Planning"]);
    }

    #[tokio::test]
    async fn mail_is_skipped_without_guests_or_email_preference() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = Dispatcher::new(Some(sender.clone()), None, None);

        let mut no_guests = make_event("A");
        no_guests.guests.clear();
        dispatcher.event_created(&no_guests).await;

        let mut email_off = make_event("B");
        email_off.notifications.email = false;
        dispatcher.event_created(&email_off).await;

        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_address_the_recorded_external_id() {
        let mirror = Arc::new(RecordingMirror::default());
        let dispatcher = Dispatcher::new(None, Some(mirror.clone()), None);

        let mut event = make_event("Planning");
        event.external_calendar_event_id = Some("gcal-123".to_string());

        dispatcher.event_updated(&event).await;
        dispatcher.event_deleted(&event).await;

        assert_eq!(
            mirror.calls(),
            vec!["update Planning gcal-123", "delete gcal-123"]
        );
    }

    #[tokio::test]
    async fn update_without_mirror_id_skips_the_mirror() {
        let mirror = Arc::new(RecordingMirror::default());
        let dispatcher = Dispatcher::new(None, Some(mirror.clone()), None);

        dispatcher.event_updated(&make_event("Planning")).await;

        assert!(mirror.calls().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_dispatcher_reports_nothing() {
        let dispatcher = Dispatcher::new(None, None, None);
        let report = dispatcher.event_created(&make_event("Planning")).await;

        assert!(report.mirror_id.is_none());
        assert!(report.mail_message_id.is_none());
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn create_update_delete_round_trip_through_the_schedule() {
        let mirror = Arc::new(RecordingMirror::default());
        let dispatcher = Dispatcher::new(None, Some(mirror.clone()), None);
        let mut schedule = Schedule::load(Box::new(MemoryStore::new()));

        // Create, then write the external id back onto the stored event
        let event = schedule.create(make_draft("Planning")).unwrap();
        let report = dispatcher.event_created(&event).await;
        let external_id = report.mirror_id.unwrap();
        schedule.attach_mirror_id(&event.id, external_id).unwrap();

        let updated = schedule.update(&event.id, make_draft("Planning v2")).unwrap();
        dispatcher.event_updated(&updated).await;

        let deleted = schedule.soft_delete(&event.id).unwrap();
        dispatcher.event_deleted(&deleted).await;

        assert_eq!(
            mirror.calls(),
            vec![
                "create Planning",
                "update Planning v2 gcal-123",
                "delete gcal-123"
            ]
        );
    }
}
