use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{ConfigCommand, GuestCommand, ReportCommand, SubmitCommand};
use partecipa::admin::LockRegistry;
use partecipa::config::Config;
use partecipa::db::{init_db, RsvpRepository};

#[derive(Parser)]
#[command(name = "partecipa")]
#[command(version)]
#[command(about = "Wedding RSVP collection and guest list management", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new family RSVP
    Submit(SubmitCommand),

    /// Review the confirmed guests
    Guest(GuestCommand),

    /// Export the guest list and statistics
    Report(ReportCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Submit(cmd)) => {
            let pool = init_db(config.database_path.clone()).await?;
            let repo = RsvpRepository::new(pool);
            cmd.run(&repo).await?;
        }
        Some(Commands::Guest(cmd)) => {
            let pool = init_db(config.database_path.clone()).await?;
            let repo = RsvpRepository::new(pool);
            let locks = LockRegistry::new();
            cmd.run(&repo, &locks).await?;
        }
        Some(Commands::Report(cmd)) => {
            let pool = init_db(config.database_path.clone()).await?;
            let repo = RsvpRepository::new(pool);
            cmd.run(&repo).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
