//! Rename every event matching a name and minimum start date.

use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::commands::{create_spinner, load_events};
use crate::wildapricot::WaClient;
use watools_core::event::EventEdit;

pub async fn run(
    client: &WaClient,
    old_name: &str,
    new_name: Option<String>,
    start_date: NaiveDate,
    dry_run: bool,
) -> Result<()> {
    let events = load_events(client, old_name, start_date).await?;

    for event in &events {
        println!(" • {}", event.display_name());
    }

    let Some(new_name) = new_name else {
        println!("No new name given, nothing to rename");
        return Ok(());
    };
    if dry_run {
        println!("Dry run, would rename {} events to '{new_name}'", events.len());
        return Ok(());
    }

    let mut renamed = 0;
    for event in &events {
        let spinner = create_spinner(format!("Renaming event {}", event.id));
        let edit = EventEdit {
            id: event.id,
            name: Some(new_name.clone()),
            start_date: None,
            end_date: None,
            details: None,
        };
        let result = client.update_event(&edit).await;
        spinner.finish_and_clear();

        match result {
            Ok(_) => {
                renamed += 1;
                println!("Renamed event {} to '{new_name}'", event.id);
            }
            Err(err) => {
                println!("{}", format!("Failed to rename event {}: {err:#}", event.id).red());
            }
        }
    }

    println!("Renamed {renamed} of {} events", events.len());
    Ok(())
}
