use anyhow::Result;
use eventscope_core::config::EventScopeConfig;
use owo_colors::OwoColorize;

pub fn run(id: &str) -> Result<()> {
    let config = EventScopeConfig::load()?;
    let mut schedule = super::load_schedule(&config);

    // A recorded mirror id is kept as-is; restoring does not re-create or
    // re-verify the external copy
    let event = schedule.recover(id)?;
    println!("{}", format!("Restored: {}", event.title).green());

    Ok(())
}
