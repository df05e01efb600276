use anyhow::Result;
use eventscope_core::config::EventScopeConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config = EventScopeConfig::load()?;
    let mut schedule = super::load_schedule(&config);

    let purged = schedule.sweep()?;
    if purged.is_empty() {
        println!("{}", "Nothing to purge".dimmed());
    } else {
        println!("Purged {} expired event(s)", purged.len());
    }

    Ok(())
}
