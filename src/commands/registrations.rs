//! Fetch registrations for matching events and summarize attendance.
//!
//! Writes two files to the working directory: the raw registrations and
//! the computed per-person / per-event analysis.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::{create_spinner, load_events};
use crate::wildapricot::WaClient;
use watools_core::event::EventRegistration;

const REGISTRATIONS_FILE: &str = "registrations.json";
const ANALYSIS_FILE: &str = "registrations-analysis.json";

#[derive(Debug, Default, Serialize)]
struct PersonStats {
    confirmed_count: usize,
    waitlisted_count: usize,
    confirmed: Vec<String>,
    waitlisted: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
struct DateStats {
    confirmed_count: usize,
    waitlisted_count: usize,
}

#[derive(Debug, Default, Serialize)]
struct Analysis {
    by_name: BTreeMap<String, PersonStats>,
    by_date: BTreeMap<String, DateStats>,
}

pub async fn run(client: &WaClient, event_name: &str, start_date: NaiveDate) -> Result<()> {
    let events = load_events(client, event_name, start_date).await?;

    let mut all: Vec<(String, Vec<EventRegistration>)> = Vec::new();
    for event in &events {
        let spinner = create_spinner(format!("Fetching registrations for event {}", event.id));
        let result = client.event_registrations(event.id).await;
        spinner.finish_and_clear();

        match result {
            Ok(registrations) => {
                println!(
                    "{}: {} registrations",
                    event.display_name(),
                    registrations.len()
                );
                all.push((event.start_date.clone(), registrations));
            }
            Err(err) => {
                println!(
                    "{}",
                    format!("Failed to fetch registrations for event {}: {err:#}", event.id).red()
                );
            }
        }
    }

    let raw: Vec<&EventRegistration> = all.iter().flat_map(|(_, regs)| regs).collect();
    std::fs::write(REGISTRATIONS_FILE, serde_json::to_string_pretty(&raw)?)
        .with_context(|| format!("Failed to write {REGISTRATIONS_FILE}"))?;
    println!("Wrote {REGISTRATIONS_FILE}");

    let analysis = analyze(&all);
    print_summary(&analysis);

    std::fs::write(ANALYSIS_FILE, serde_json::to_string_pretty(&analysis)?)
        .with_context(|| format!("Failed to write {ANALYSIS_FILE}"))?;
    println!("Wrote {ANALYSIS_FILE}");

    Ok(())
}

fn analyze(per_event: &[(String, Vec<EventRegistration>)]) -> Analysis {
    let mut analysis = Analysis::default();

    for (event_date, registrations) in per_event {
        let date_stats = analysis.by_date.entry(event_date.clone()).or_default();

        for registration in registrations {
            let person = analysis
                .by_name
                .entry(registration.display_name.clone())
                .or_default();

            if registration.on_waitlist {
                person.waitlisted_count += 1;
                person.waitlisted.push(event_date.clone());
                date_stats.waitlisted_count += 1;
            } else {
                person.confirmed_count += 1;
                person.confirmed.push(event_date.clone());
                date_stats.confirmed_count += 1;
            }
        }
    }

    analysis
}

fn print_summary(analysis: &Analysis) {
    let confirmed_per_event: Vec<usize> = analysis
        .by_date
        .values()
        .map(|stats| stats.confirmed_count)
        .collect();

    println!("Events analyzed: {}", analysis.by_date.len());
    println!("Distinct attendees: {}", analysis.by_name.len());
    if let (Some(min), Some(max)) = (
        confirmed_per_event.iter().min(),
        confirmed_per_event.iter().max(),
    ) {
        println!("Confirmed per event: min {min}, max {max}");
    }
    println!("Average confirmed per event: {}", average(&confirmed_per_event));
    println!("Median confirmed per event: {}", median(&confirmed_per_event));

    let mut ranked: Vec<(&String, &PersonStats)> = analysis.by_name.iter().collect();
    ranked.sort_by(|a, b| b.1.confirmed_count.cmp(&a.1.confirmed_count));

    println!("Most frequent attendees:");
    for (name, stats) in ranked.iter().take(50) {
        println!(
            " • {name}: {} confirmed, {} waitlisted",
            stats.confirmed_count, stats.waitlisted_count
        );
    }

    ranked.sort_by(|a, b| b.1.waitlisted_count.cmp(&a.1.waitlisted_count));
    println!("Most often waitlisted:");
    for (name, stats) in ranked
        .iter()
        .filter(|(_, stats)| stats.waitlisted_count > 0)
        .take(50)
    {
        println!(
            " • {name}: {} waitlisted, {} confirmed",
            stats.waitlisted_count, stats.confirmed_count
        );
    }
}

fn average(values: &[usize]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let total: usize = values.iter().sum();
    (total as f64 / values.len() as f64).round() as usize
}

fn median(values: &[usize]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watools_core::event::ContactRef;

    fn registration(name: &str, on_waitlist: bool) -> EventRegistration {
        EventRegistration {
            id: 1,
            display_name: name.to_string(),
            status: None,
            on_waitlist,
            contact: ContactRef::default(),
        }
    }

    #[test]
    fn median_of_odd_and_even_counts() {
        assert_eq!(median(&[3, 1, 2]), 2);
        assert_eq!(median(&[1, 2, 3, 4]), 2);
        assert_eq!(median(&[]), 0);
    }

    #[test]
    fn average_rounds_to_nearest() {
        assert_eq!(average(&[1, 2]), 2);
        assert_eq!(average(&[1, 1, 2]), 1);
        assert_eq!(average(&[]), 0);
    }

    #[test]
    fn attendance_is_split_by_waitlist_status() {
        let per_event = vec![(
            "2024-06-01T18:00:00-08:00".to_string(),
            vec![
                registration("Ada Lovelace", false),
                registration("Grace Hopper", true),
            ],
        )];

        let analysis = analyze(&per_event);
        assert_eq!(analysis.by_name["Ada Lovelace"].confirmed_count, 1);
        assert_eq!(analysis.by_name["Grace Hopper"].waitlisted_count, 1);

        let date = &analysis.by_date["2024-06-01T18:00:00-08:00"];
        assert_eq!(date.confirmed_count, 1);
        assert_eq!(date.waitlisted_count, 1);
    }

    #[test]
    fn repeat_attendance_accumulates_per_person() {
        let per_event = vec![
            (
                "2024-06-01T18:00:00-08:00".to_string(),
                vec![registration("Ada Lovelace", false)],
            ),
            (
                "2024-06-08T18:00:00-08:00".to_string(),
                vec![registration("Ada Lovelace", false)],
            ),
        ];

        let analysis = analyze(&per_event);
        let ada = &analysis.by_name["Ada Lovelace"];
        assert_eq!(ada.confirmed_count, 2);
        assert_eq!(ada.confirmed.len(), 2);
    }
}
