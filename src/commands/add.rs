use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use eventscope_core::config::EventScopeConfig;
use eventscope_core::event::{EventDraft, NotificationPrefs, Privacy};
use owo_colors::OwoColorize;

use crate::dispatch::Dispatcher;

#[derive(Args)]
pub struct AddArgs {
    /// Event title
    pub title: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Start time (HH:MM)
    #[arg(long)]
    pub start_time: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// End time (HH:MM)
    #[arg(long)]
    pub end_time: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// IANA timezone name
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    #[arg(long, default_value = "")]
    pub location: String,

    /// Team the guest list is seeded from
    #[arg(long)]
    pub team: Option<String>,

    /// Guest email address (repeatable)
    #[arg(long = "guest")]
    pub guests: Vec<String>,

    /// Ask guests to RSVP
    #[arg(long)]
    pub rsvp: bool,

    /// Skip invitation mail for this event
    #[arg(long)]
    pub no_email: bool,

    /// Who can see the event: team-only or public
    #[arg(long, default_value = "team-only")]
    pub privacy: String,
}

pub async fn run(args: AddArgs) -> Result<()> {
    let config = EventScopeConfig::load()?;
    let mut schedule = super::load_schedule(&config);

    let draft = build_draft(&args)?;
    let event = schedule.create(draft)?;
    println!(
        "{}",
        format!("Created: {} [{}]", event.title, event.id).green()
    );

    let dispatcher = Dispatcher::from_config(&config)?;
    let report = dispatcher.event_created(&event).await;

    if let Some(external_id) = report.mirror_id.clone() {
        // Best-effort secondary write; the create itself already succeeded
        if let Err(e) = schedule.attach_mirror_id(&event.id, external_id) {
            tracing::warn!("could not record mirror id for {}: {e}", event.id);
        }
    }
    super::print_warnings(&report);

    Ok(())
}

fn build_draft(args: &AddArgs) -> Result<EventDraft> {
    Ok(EventDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        start_date: parse_date(&args.start)?,
        start_time: parse_time(&args.start_time)?,
        end_date: parse_date(&args.end)?,
        end_time: parse_time(&args.end_time)?,
        timezone: args.timezone.clone(),
        location: args.location.clone(),
        team: args.team.clone(),
        guests: args.guests.clone(),
        rsvp_required: args.rsvp,
        notifications: NotificationPrefs {
            email: !args.no_email,
            ..NotificationPrefs::default()
        },
        privacy: parse_privacy(&args.privacy)?,
    })
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Could not parse date: \"{input}\" (expected YYYY-MM-DD)"))
}

pub(crate) fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M")
        .with_context(|| format!("Could not parse time: \"{input}\" (expected HH:MM)"))
}

pub(crate) fn parse_privacy(input: &str) -> Result<Privacy> {
    match input {
        "team-only" => Ok(Privacy::TeamOnly),
        "public" => Ok(Privacy::Public),
        other => anyhow::bail!(
            "Unknown privacy setting: \"{other}\" (expected team-only or public)"
        ),
    }
}
