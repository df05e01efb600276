mod commands;
mod dispatch;
mod mailer;
mod render;
mod sweeper;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{add::AddArgs, edit::EditArgs};

#[derive(Parser)]
#[command(name = "eventscope")]
#[command(about = "Manage your event schedule, invite guests, and mirror changes to an external calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an event
    Add(AddArgs),

    /// Edit an active event
    Edit(EditArgs),

    /// Move an event to the trash (recoverable for 24 hours)
    Remove { id: String },

    /// Restore a trashed event
    Restore { id: String },

    /// Permanently delete an event
    Purge { id: String },

    /// List active events
    List,

    /// List trashed events still inside their recovery window
    Trash,

    /// Purge every trashed event whose recovery window has elapsed
    Sweep,

    /// Keep a retention sweeper running on an interval
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=info,eventscope_core=info", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Add(args) => commands::add::run(args).await,
        Commands::Edit(args) => commands::edit::run(args).await,
        Commands::Remove { id } => commands::remove::run(&id).await,
        Commands::Restore { id } => commands::restore::run(&id),
        Commands::Purge { id } => commands::purge::run(&id),
        Commands::List => commands::list::run(),
        Commands::Trash => commands::trash::run(),
        Commands::Sweep => commands::sweep::run(),
        Commands::Watch => commands::watch::run().await,
    }
}
