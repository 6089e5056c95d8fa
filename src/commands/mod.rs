pub mod clone_event;
pub mod get_event;
pub mod register;
pub mod registrations;
pub mod rename_events;
pub mod slack_sync;
pub mod update_events;

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};

use crate::wildapricot::WaClient;
use watools_core::event::EventSummary;

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();

    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));

    spinner
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

/// Fetch events matching a name and minimum start date, with a spinner.
pub async fn load_events(
    client: &WaClient,
    name: &str,
    min_start: NaiveDate,
) -> Result<Vec<EventSummary>> {
    let spinner = create_spinner("Fetching Wild Apricot events".to_string());
    let result = client.events(name, min_start).await;
    spinner.finish_and_clear();

    let events = result?;
    println!("Got {} Wild Apricot events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date("2024-06-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("06/01/2024").is_err());
        assert!(parse_date("not-a-date").is_err());
    }
}
