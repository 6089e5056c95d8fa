//! Merge a JSON edit into every event matching a name and minimum start
//! date. The edit comes from a file path or inline JSON and is merged
//! recursively into each event's current payload.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde_json::Value;

use crate::commands::{create_spinner, load_events};
use crate::merge::deep_merge;
use crate::wildapricot::WaClient;

pub async fn run(
    client: &WaClient,
    event_name: &str,
    start_date: NaiveDate,
    data: &str,
    dry_run: bool,
    verbose: bool,
) -> Result<()> {
    let edit = load_edit(data)?;
    let events = load_events(client, event_name, start_date).await?;

    let mut updated = 0;
    for event in &events {
        println!(" • {}", event.display_name());

        let spinner = create_spinner(format!("Fetching event {}", event.id));
        let current = client.event_raw(event.id).await;
        spinner.finish_and_clear();
        let mut merged = current?;

        deep_merge(&mut merged, &edit);
        merged["Id"] = Value::from(event.id);

        if verbose || dry_run {
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        if dry_run {
            continue;
        }

        let spinner = create_spinner(format!("Updating event {}", event.id));
        let result = client.update_event_raw(event.id, &merged).await;
        spinner.finish_and_clear();

        match result {
            Ok(_) => {
                updated += 1;
                println!("Updated event {}", event.id);
            }
            Err(err) => {
                println!("{}", format!("Failed to update event {}: {err:#}", event.id).red());
            }
        }
    }

    if dry_run {
        println!("Dry run, would update {} events", events.len());
    } else {
        println!("Updated {updated} of {} events", events.len());
    }
    Ok(())
}

/// Accept either a path to a JSON file or inline JSON.
fn load_edit(data: &str) -> Result<Value> {
    let path = Path::new(data);
    if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return serde_json::from_str(&contents)
            .with_context(|| format!("{} is not valid JSON", path.display()));
    }
    serde_json::from_str(data).context("--data is neither an existing file nor valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_json_is_parsed_directly() {
        let edit = load_edit(r#"{"Name": "New name"}"#).unwrap();
        assert_eq!(edit["Name"], "New name");
    }

    #[test]
    fn garbage_input_is_rejected() {
        assert!(load_edit("definitely not json or a file").is_err());
    }
}
