//! Register a batch of members for the next matching event, waiting for
//! the registration type to open first. Ctrl-C cancels the wait cleanly.

use std::sync::Mutex;

use anyhow::Result;
use chrono::NaiveDate;
use indicatif::ProgressBar;
use owo_colors::OwoColorize;

use crate::commands::create_spinner;
use crate::wildapricot::WaClient;
use watools_core::countdown::{ProgressSink, cancel_pair};
use watools_core::registration::{BatchRequest, MemberOutcome, run_batch};

/// Renders countdown ticks as a spinner line and step events as plain
/// println output, finishing the spinner first so lines don't interleave.
struct ConsoleSink {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleSink {
    fn new() -> Self {
        ConsoleSink {
            spinner: Mutex::new(None),
        }
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().unwrap().take() {
            spinner.finish_and_clear();
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn on_tick(&self, remaining_seconds: i64) {
        let message = format!(
            "Waiting for registration to open: {} ({remaining_seconds}s)",
            format_remaining(remaining_seconds)
        );
        let mut guard = self.spinner.lock().unwrap();
        match guard.as_ref() {
            Some(spinner) => spinner.set_message(message),
            None => *guard = Some(create_spinner(message)),
        }
    }

    fn on_event(&self, description: &str) {
        self.clear_spinner();
        println!("{description}");
    }
}

/// "2 days, 3 hours, 1 minute, 10 seconds", with singular units and zero
/// components skipped. Zero or negative remainders render as "0 seconds".
fn format_remaining(total_seconds: i64) -> String {
    if total_seconds <= 0 {
        return "0 seconds".to_string();
    }

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    for (amount, unit) in [
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
        (seconds, "second"),
    ] {
        if amount > 0 {
            let plural = if amount == 1 { "" } else { "s" };
            parts.push(format!("{amount} {unit}{plural}"));
        }
    }

    parts.join(", ")
}

pub async fn run(
    client: &WaClient,
    event_name: String,
    registration_type: String,
    start_date: NaiveDate,
    users: Vec<String>,
) -> Result<()> {
    let request = BatchRequest {
        event_name,
        min_start: start_date,
        registration_type,
        member_queries: users,
    };

    let (handle, mut token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let sink = ConsoleSink::new();
    let report = run_batch(client, &sink, &request, &mut token).await?;
    sink.clear_spinner();

    for entry in &report.entries {
        let label = match &entry.member {
            Some(member) => member.describe(),
            None => format!("\"{}\"", entry.query),
        };
        match &entry.outcome {
            MemberOutcome::Registered => println!("✓ Registered {label}"),
            MemberOutcome::Failed(reason) => {
                println!("{}", format!("✗ Failed to register {label}: {reason}").red());
            }
            MemberOutcome::NotFound => {
                println!("{}", format!("✗ No member matched {label}").red());
            }
        }
    }

    println!(
        "Registered {} of {} for \"{}\"",
        report.registered(),
        report.entries.len(),
        report.event_name
    );

    if !report.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_all_units_with_plurals() {
        let total = 2 * 86_400 + 3 * 3_600 + 60 + 10;
        assert_eq!(
            format_remaining(total),
            "2 days, 3 hours, 1 minute, 10 seconds"
        );
    }

    #[test]
    fn zero_components_are_skipped() {
        assert_eq!(format_remaining(3_600), "1 hour");
        assert_eq!(format_remaining(86_400 + 5), "1 day, 5 seconds");
    }

    #[test]
    fn zero_and_negative_render_as_zero_seconds() {
        assert_eq!(format_remaining(0), "0 seconds");
        assert_eq!(format_remaining(-3), "0 seconds");
    }
}
