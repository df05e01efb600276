pub mod add;
pub mod edit;
pub mod list;
pub mod purge;
pub mod remove;
pub mod restore;
pub mod sweep;
pub mod trash;
pub mod watch;

use eventscope_core::Schedule;
use eventscope_core::config::EventScopeConfig;
use eventscope_core::store::JsonStore;
use owo_colors::OwoColorize;

use crate::dispatch::DispatchReport;

pub(crate) fn load_schedule(config: &EventScopeConfig) -> Schedule {
    Schedule::load(Box::new(JsonStore::new(config.data_path())))
}

/// Show channel failures collected by the dispatcher. The primary
/// operation already succeeded by the time these print.
pub(crate) fn print_warnings(report: &DispatchReport) {
    for warning in &report.warnings {
        eprintln!("{}", format!("  warning: {warning}").yellow());
    }
}
