mod commands;
mod config;
mod merge;
mod report;
mod slack;
mod wildapricot;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::wildapricot::WaClient;

#[derive(Parser)]
#[command(name = "watools")]
#[command(about = "Sync Wild Apricot membership with Slack and manage recurring Wild Apricot events")]
struct Cli {
    /// Wild Apricot API key (falls back to config.toml)
    #[arg(short = 'w', long, global = true)]
    wild_apricot_api_key: Option<String>,

    /// Print extra detail while running
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff Wild Apricot members against Slack users and write an invite/remove report
    SlackSync {
        /// Slack bot token with users:read scope (falls back to config.toml)
        #[arg(short, long)]
        slack_token: Option<String>,
    },
    /// Rename every event matching a name and minimum start date
    RenameEvents {
        #[arg(long)]
        old_event_name: String,

        /// New name to apply; listing only if omitted
        #[arg(long)]
        new_event_name: Option<String>,

        /// Only consider events starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,

        /// List what would change without updating anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Merge a JSON edit into every event matching a name and minimum start date
    UpdateEvents {
        #[arg(long)]
        event_name: String,

        /// Only consider events starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,

        /// Path to a JSON file, or inline JSON
        #[arg(long)]
        data: String,

        /// Print the merged updates without applying them
        #[arg(long)]
        dry_run: bool,
    },
    /// Clone an event on a weekly schedule up to an end date
    CloneEvent {
        /// Id of the event to use as the template
        #[arg(long)]
        event_id: u64,

        /// Cadence of the clones ("weekly", or "once" for none)
        #[arg(long, default_value = "weekly")]
        schedule: String,

        /// Last date to schedule a clone for (YYYY-MM-DD)
        #[arg(long)]
        end_date: String,

        /// Print the planned dates without creating anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch one event and print its raw JSON
    GetEvent {
        #[arg(long)]
        event_id: u64,

        /// Also write the JSON to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fetch registrations for matching events and print attendance stats
    Registrations {
        #[arg(long)]
        event_name: String,

        /// Only consider events starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,
    },
    /// Register a batch of members the moment registration opens
    Register {
        #[arg(long)]
        event_name: String,

        /// Registration type name, matched case-insensitively
        #[arg(long)]
        registration_type: String,

        /// Only consider events starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,

        /// Directory query for a member to register (repeatable)
        #[arg(long = "user", required = true)]
        users: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let api_key = config::resolve_wild_apricot_key(cli.wild_apricot_api_key.clone())?;
    let client = connect(&api_key).await?;

    match cli.command {
        Commands::SlackSync { slack_token } => {
            let token = config::resolve_slack_token(slack_token)?;
            commands::slack_sync::run(&client, &token, cli.verbose).await
        }
        Commands::RenameEvents {
            old_event_name,
            new_event_name,
            start_date,
            dry_run,
        } => {
            let start_date = commands::parse_date(&start_date)?;
            commands::rename_events::run(&client, &old_event_name, new_event_name, start_date, dry_run)
                .await
        }
        Commands::UpdateEvents {
            event_name,
            start_date,
            data,
            dry_run,
        } => {
            let start_date = commands::parse_date(&start_date)?;
            commands::update_events::run(&client, &event_name, start_date, &data, dry_run, cli.verbose)
                .await
        }
        Commands::CloneEvent {
            event_id,
            schedule,
            end_date,
            dry_run,
        } => {
            let end_date = commands::parse_date(&end_date)?;
            commands::clone_event::run(&client, event_id, &schedule, end_date, dry_run, cli.verbose)
                .await
        }
        Commands::GetEvent { event_id, out } => {
            commands::get_event::run(&client, event_id, out).await
        }
        Commands::Registrations {
            event_name,
            start_date,
        } => {
            let start_date = commands::parse_date(&start_date)?;
            commands::registrations::run(&client, &event_name, start_date).await
        }
        Commands::Register {
            event_name,
            registration_type,
            start_date,
            users,
        } => {
            let start_date = commands::parse_date(&start_date)?;
            commands::register::run(&client, event_name, registration_type, start_date, users).await
        }
    }
}

async fn connect(api_key: &str) -> Result<WaClient> {
    let spinner = commands::create_spinner("Authenticating with Wild Apricot".to_string());
    let result = WaClient::connect(api_key).await;
    spinner.finish_and_clear();

    let client = result?;
    println!(
        "Authenticated with Wild Apricot (account {})",
        client.account_id()
    );
    Ok(client)
}
