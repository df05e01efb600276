use anyhow::Result;
use eventscope_core::config::EventScopeConfig;
use owo_colors::OwoColorize;

use crate::render;

pub fn run() -> Result<()> {
    let config = EventScopeConfig::load()?;
    let schedule = super::load_schedule(&config);

    let events = schedule.active();
    if events.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", render::event_line(event));
    }

    Ok(())
}
