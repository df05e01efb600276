use anyhow::Result;
use eventscope_core::config::EventScopeConfig;

use crate::sweeper;

pub async fn run() -> Result<()> {
    let config = EventScopeConfig::load()?;
    let schedule = super::load_schedule(&config);
    let every = config.sweep_interval();

    println!(
        "Sweeping every {} (Ctrl-C to stop)",
        humantime::format_duration(every)
    );
    sweeper::watch(schedule, every).await;

    Ok(())
}
