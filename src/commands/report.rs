use clap::{Args, ValueEnum};

use partecipa::admin::{self, GuestStats};
use partecipa::db::RsvpRepository;
use partecipa::models::GuestView;

#[derive(Clone, ValueEnum, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Export the full guest list with summary statistics.
#[derive(Args)]
pub struct ReportCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

impl ReportCommand {
    pub async fn run(&self, repo: &RsvpRepository) -> Result<(), Box<dyn std::error::Error>> {
        let views = admin::fetch_views(repo).await?;
        let stats = GuestStats::aggregate(&views);

        match self.format {
            ReportFormat::Json => {
                let report = serde_json::json!({
                    "guests": views,
                    "stats": stats,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            ReportFormat::Csv => {
                println!("First Name,Last Name,Intolerances,Allergies,Notes");
                for view in &views {
                    println!(
                        "{},{},{},{},{}",
                        csv_field(&view.first_name),
                        csv_field(&view.last_name),
                        csv_field(&view.intolerances),
                        csv_field(&view.allergies),
                        csv_field(&view.notes),
                    );
                }
            }
            ReportFormat::Text => {
                print_table(&views);
                println!("\nStatistics Summary");
                println!("==================");
                print!("{}", stats);
            }
        }
        Ok(())
    }
}

fn print_table(views: &[GuestView]) {
    if views.is_empty() {
        println!("No guests found");
        return;
    }
    println!(
        "{:<22}  {:<14}  {:<24}  {:<24}  NOTES",
        "FIRST NAME", "LAST NAME", "INTOLERANCES", "ALLERGIES"
    );
    println!("{}", "-".repeat(100));
    for view in views {
        println!(
            "{:<22}  {:<14}  {:<24}  {:<24}  {}",
            dash_if_empty(&view.first_name),
            dash_if_empty(&view.last_name),
            dash_if_empty(&view.intolerances),
            dash_if_empty(&view.allergies),
            dash_if_empty(&view.notes),
        );
    }
}

fn dash_if_empty(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
