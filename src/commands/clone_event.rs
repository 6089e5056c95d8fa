//! Clone an event onto a recurring schedule up to an end date.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use owo_colors::OwoColorize;

use crate::commands::create_spinner;
use crate::wildapricot::WaClient;
use watools_core::event::{Event, EventEdit, EventEditDetails};
use watools_core::schedule::{Cadence, DatePair, generate_schedule};

pub async fn run(
    client: &WaClient,
    event_id: u64,
    schedule: &str,
    end_date: NaiveDate,
    dry_run: bool,
    verbose: bool,
) -> Result<()> {
    let cadence: Cadence = schedule.parse()?;

    let spinner = create_spinner(format!("Fetching event {event_id}"));
    let result = client.event(event_id).await;
    spinner.finish_and_clear();
    let source = result?;
    println!("Cloning '{}'", source.display_name());

    let start = parse_offset_datetime(&source.start_date)?;
    let end = parse_offset_datetime(&source.end_date)?;
    let pairs = generate_schedule(start, end, cadence, end_date);

    if pairs.is_empty() {
        println!("Nothing to schedule before {end_date}");
        return Ok(());
    }

    println!("Planned clones:");
    for pair in &pairs {
        println!(" • {} to {}", pair.start, pair.end);
    }
    if dry_run {
        println!("Dry run, would create {} events", pairs.len());
        return Ok(());
    }

    let mut created = 0;
    for pair in &pairs {
        match clone_one(client, &source, pair, verbose).await {
            Ok(new_id) => {
                created += 1;
                println!("Added event with id {new_id}");
            }
            Err(err) => {
                println!("{}", format!("Failed to clone for {}: {err:#}", pair.start).red());
            }
        }
    }

    println!("Created {created} of {} events", pairs.len());
    Ok(())
}

/// Clone the source event, then move the clone to the pair's dates. The
/// access control block is carried over because the clone endpoint drops
/// restricted-access settings.
async fn clone_one(
    client: &WaClient,
    source: &Event,
    pair: &DatePair,
    verbose: bool,
) -> Result<u64> {
    let spinner = create_spinner(format!("Creating clone for {}", pair.start));
    let result = client.clone_event(source.id).await;
    spinner.finish_and_clear();
    let new_id = result?;

    if verbose {
        println!("Cloned event {} as {new_id}, updating dates", source.id);
    }

    let edit = EventEdit {
        id: new_id,
        name: Some(source.name.clone()),
        start_date: Some(pair.start.to_rfc3339()),
        end_date: Some(pair.end.to_rfc3339()),
        details: Some(EventEditDetails {
            access_control: source.details.access_control.clone(),
        }),
    };

    let spinner = create_spinner(format!("Updating clone {new_id}"));
    let result = client.update_event(&edit).await;
    spinner.finish_and_clear();
    result?;

    Ok(new_id)
}

fn parse_offset_datetime(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Event date '{value}' is not a valid ISO-8601 instant"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_dates_with_offsets_parse() {
        let parsed = parse_offset_datetime("2024-06-01T18:00:00-08:00").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn dates_without_offsets_are_rejected() {
        assert!(parse_offset_datetime("2024-06-01T18:00:00").is_err());
    }
}
