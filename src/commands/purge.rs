use anyhow::Result;
use eventscope_core::config::EventScopeConfig;
use owo_colors::OwoColorize;

pub fn run(id: &str) -> Result<()> {
    let config = EventScopeConfig::load()?;
    let mut schedule = super::load_schedule(&config);

    // Purging an id that is already gone is fine: the sweeper may have
    // beaten us to it
    match schedule.purge(id)? {
        Some(event) => {
            println!("{}", format!("Permanently deleted: {}", event.title).green());
        }
        None => {
            println!("{}", "Nothing to delete".dimmed());
        }
    }

    Ok(())
}
