use clap::{Args, Subcommand, ValueEnum};
use std::io::{self, Write};

use partecipa::admin::{self, LockRegistry, RemovalOutcome};
use partecipa::db::RsvpRepository;
use partecipa::error::RsvpError;
use partecipa::models::{GuestOrigin, GuestView};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct GuestCommand {
    #[command(subcommand)]
    pub command: GuestSubcommand,
}

#[derive(Subcommand)]
pub enum GuestSubcommand {
    /// List all confirmed guests, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show guests whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one guest's details
    Show {
        /// Guest view ID (as printed by `guest list`)
        view_id: String,
    },

    /// Delete one guest
    Delete {
        /// Guest view ID (as printed by `guest list`)
        view_id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl GuestCommand {
    pub async fn run(
        &self,
        repo: &RsvpRepository,
        locks: &LockRegistry,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            GuestSubcommand::List { format, search } => {
                let views = admin::fetch_views(repo).await?;
                let views = filter_views(views, search.as_deref());

                if views.is_empty() {
                    println!("No guests found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&views)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<44}  {:<28}  CATEGORY", "ID", "NAME");
                        println!("{}", "-".repeat(88));
                        for view in &views {
                            let name = truncate(&view.display_name(), 28);
                            let category = view
                                .category
                                .map(|c| c.label())
                                .unwrap_or("-");
                            println!("{:<44}  {:<28}  {}", view.id, name, category);
                        }
                        println!("\nTotal: {} guest(s)", views.len());
                    }
                }
                Ok(())
            }

            GuestSubcommand::Show { view_id } => {
                let views = admin::fetch_views(repo).await?;
                let view = match views.iter().find(|v| &v.id == view_id) {
                    Some(view) => view,
                    None => return Err(format!("Guest not found: {}", view_id).into()),
                };

                println!("{}", view.display_name());
                println!("{}", "=".repeat(view.display_name().len()));
                if let Some(category) = view.category {
                    println!("Category: {}", category.label());
                }
                if view.origin == GuestOrigin::Family {
                    if let Some(main_guest) = &view.main_guest {
                        println!("Reservation by: {}", main_guest);
                    }
                }
                println!(
                    "Intolerances: {}",
                    if view.intolerances.is_empty() { "-" } else { &view.intolerances }
                );
                println!(
                    "Allergies: {}",
                    if view.allergies.is_empty() { "-" } else { &view.allergies }
                );
                println!(
                    "Notes: {}",
                    if view.notes.is_empty() { "-" } else { &view.notes }
                );
                match view.created_at {
                    Some(ts) => println!("Registered: {}", ts.to_rfc3339()),
                    None => println!("Registered: N/A"),
                }
                Ok(())
            }

            GuestSubcommand::Delete { view_id, force } => {
                let views = admin::fetch_views(repo).await?;
                let view = match views.into_iter().find(|v| v.id == *view_id) {
                    Some(view) => view,
                    None => {
                        println!(
                            "Guest not found: {} (the list may be out of date; run 'partecipa guest list' to refresh)",
                            view_id
                        );
                        return Ok(());
                    }
                };

                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete guest '{}'? [y/N] ", view.display_name());
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                match admin::remove_view(repo, locks, view_id).await {
                    Ok(RemovalOutcome::LegacyDeleted) => {
                        println!("Deleted guest: {}", view.display_name());
                    }
                    Ok(RemovalOutcome::GuestRemoved { remaining }) => {
                        println!(
                            "Removed {} ({} guest(s) remain on the reservation)",
                            view.display_name(),
                            remaining
                        );
                    }
                    Ok(RemovalOutcome::RecordDeleted) => {
                        println!(
                            "Removed {}; the reservation had no guests left and was deleted",
                            view.display_name()
                        );
                    }
                    // The record vanished or shrank since the list was
                    // fetched; not fatal for the operator.
                    Err(RsvpError::NotFound(_)) | Err(RsvpError::IndexOutOfRange { .. }) => {
                        println!(
                            "Guest already gone: {} (run 'partecipa guest list' to refresh)",
                            view_id
                        );
                    }
                    Err(RsvpError::Busy(_)) => {
                        println!("Another deletion is still running for this reservation; try again.");
                    }
                    Err(e) => return Err(e.into()),
                }
                Ok(())
            }
        }
    }
}

fn filter_views(views: Vec<GuestView>, search: Option<&str>) -> Vec<GuestView> {
    let Some(term) = search else {
        return views;
    };
    let term = term.to_lowercase();
    views
        .into_iter()
        .filter(|v| {
            v.first_name.to_lowercase().contains(&term)
                || v.last_name.to_lowercase().contains(&term)
        })
        .collect()
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let cut: String = name.chars().take(max - 3).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}
