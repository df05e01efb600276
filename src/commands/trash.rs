use anyhow::Result;
use eventscope_core::config::EventScopeConfig;
use owo_colors::OwoColorize;

use crate::render;

pub fn run() -> Result<()> {
    let config = EventScopeConfig::load()?;
    let schedule = super::load_schedule(&config);

    let recoverable = schedule.recoverable();
    if recoverable.is_empty() {
        println!("{}", "Trash is empty".dimmed());
        return Ok(());
    }

    for entry in &recoverable {
        let expires = format!("expires in {}", render::remaining_label(entry.remaining));
        println!("{} {}", render::event_line(&entry.event), expires.dimmed());
    }

    Ok(())
}
