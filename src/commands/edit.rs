use anyhow::Result;
use clap::Args;
use eventscope_core::config::EventScopeConfig;
use eventscope_core::event::EventDraft;
use owo_colors::OwoColorize;

use super::add::{parse_date, parse_privacy, parse_time};
use crate::dispatch::Dispatcher;

#[derive(Args)]
pub struct EditArgs {
    /// Id of the event to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Start time (HH:MM)
    #[arg(long)]
    pub start_time: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// End time (HH:MM)
    #[arg(long)]
    pub end_time: Option<String>,

    /// IANA timezone name
    #[arg(long)]
    pub timezone: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub team: Option<String>,

    /// Replace the guest list (repeatable)
    #[arg(long = "guest")]
    pub guests: Vec<String>,

    /// Ask guests to RSVP (true/false)
    #[arg(long)]
    pub rsvp: Option<bool>,

    /// Send invitation mail for this event (true/false)
    #[arg(long)]
    pub email: Option<bool>,

    /// Who can see the event: team-only or public
    #[arg(long)]
    pub privacy: Option<String>,
}

pub async fn run(args: EditArgs) -> Result<()> {
    let config = EventScopeConfig::load()?;
    let mut schedule = super::load_schedule(&config);

    // Merge the overrides onto the current record
    let existing = schedule.active_by_id(&args.id)?.clone();
    let mut draft = EventDraft::from(&existing);

    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(start) = &args.start {
        draft.start_date = parse_date(start)?;
    }
    if let Some(start_time) = &args.start_time {
        draft.start_time = parse_time(start_time)?;
    }
    if let Some(end) = &args.end {
        draft.end_date = parse_date(end)?;
    }
    if let Some(end_time) = &args.end_time {
        draft.end_time = parse_time(end_time)?;
    }
    if let Some(timezone) = args.timezone {
        draft.timezone = timezone;
    }
    if let Some(location) = args.location {
        draft.location = location;
    }
    if let Some(team) = args.team {
        draft.team = Some(team);
    }
    if !args.guests.is_empty() {
        draft.guests = args.guests.clone();
    }
    if let Some(rsvp) = args.rsvp {
        draft.rsvp_required = rsvp;
    }
    if let Some(email) = args.email {
        draft.notifications.email = email;
    }
    if let Some(privacy) = &args.privacy {
        draft.privacy = parse_privacy(privacy)?;
    }

    let updated = schedule.update(&args.id, draft)?;
    println!("{}", format!("Updated: {}", updated.title).green());

    let dispatcher = Dispatcher::from_config(&config)?;
    let report = dispatcher.event_updated(&updated).await;
    super::print_warnings(&report);

    Ok(())
}
