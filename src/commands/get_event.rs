//! Fetch one event and print (or save) its raw JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::commands::create_spinner;
use crate::wildapricot::WaClient;

pub async fn run(client: &WaClient, event_id: u64, out: Option<PathBuf>) -> Result<()> {
    let spinner = create_spinner(format!("Fetching event {event_id}"));
    let result = client.event_raw(event_id).await;
    spinner.finish_and_clear();
    let event = result?;

    let pretty = serde_json::to_string_pretty(&event)?;
    println!("{pretty}");

    if let Some(path) = out {
        std::fs::write(&path, pretty)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
