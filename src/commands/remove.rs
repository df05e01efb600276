use anyhow::Result;
use eventscope_core::config::EventScopeConfig;
use owo_colors::OwoColorize;

use crate::dispatch::Dispatcher;

pub async fn run(id: &str) -> Result<()> {
    let config = EventScopeConfig::load()?;
    let mut schedule = super::load_schedule(&config);

    let event = schedule.soft_delete(id)?;
    println!(
        "{}",
        format!("Moved to trash (recoverable for 24h): {}", event.title).green()
    );

    let dispatcher = Dispatcher::from_config(&config)?;
    let report = dispatcher.event_deleted(&event).await;
    super::print_warnings(&report);

    Ok(())
}
