//! Schedule generation for recurring events.

use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use crate::error::WaToolsError;

/// How often a cloned event repeats.
///
/// `Once` is the explicit "do not repeat" escape hatch: it always yields an
/// empty schedule. Anything else fails at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Weekly,
    Once,
}

impl FromStr for Cadence {
    type Err = WaToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Ok(Cadence::Weekly),
            "once" | "none" => Ok(Cadence::Once),
            other => Err(WaToolsError::Validation(format!(
                "unknown cadence \"{other}\" (expected \"weekly\" or \"once\")"
            ))),
        }
    }
}

/// One future occurrence of the source event.
#[derive(Debug, Clone, PartialEq)]
pub struct DatePair {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Dates for every future occurrence of an event running `start`..`end`,
/// repeating at `cadence` up to and including `horizon`.
///
/// Week arithmetic stays in the source instants' own fixed offset, so the
/// serialized local time-of-day and offset round-trip unchanged instead of
/// being normalized to UTC. The source occurrence itself (index 0) is
/// excluded; the result is strictly increasing in `start`.
pub fn generate_schedule(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    cadence: Cadence,
    horizon: NaiveDate,
) -> Vec<DatePair> {
    let mut pairs = Vec::new();

    if cadence == Cadence::Weekly {
        let weeks = (horizon - start.date_naive()).num_days() / 7;
        for index in 1..=weeks {
            pairs.push(DatePair {
                start: start + Duration::weeks(index),
                end: end + Duration::weeks(index),
            });
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(value).unwrap()
    }

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    #[test]
    fn weekly_schedule_fills_the_horizon() {
        let pairs = generate_schedule(
            parse("2024-01-01T10:00:00+00:00"),
            parse("2024-01-01T12:00:00+00:00"),
            Cadence::Weekly,
            date("2024-01-22"),
        );

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].start, parse("2024-01-08T10:00:00+00:00"));
        assert_eq!(pairs[1].start, parse("2024-01-15T10:00:00+00:00"));
        assert_eq!(pairs[2].start, parse("2024-01-22T10:00:00+00:00"));
        assert_eq!(pairs[2].end, parse("2024-01-22T12:00:00+00:00"));
        assert!(pairs.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn week_addition_keeps_the_source_offset() {
        let pairs = generate_schedule(
            parse("2024-03-01T19:00:00-08:00"),
            parse("2024-03-01T21:00:00-08:00"),
            Cadence::Weekly,
            date("2024-03-15"),
        );

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].start.to_rfc3339(), "2024-03-08T19:00:00-08:00");
        assert_eq!(pairs[1].end.to_rfc3339(), "2024-03-15T21:00:00-08:00");
    }

    #[test]
    fn once_cadence_yields_nothing_regardless_of_horizon() {
        let pairs = generate_schedule(
            parse("2024-01-01T10:00:00+00:00"),
            parse("2024-01-01T12:00:00+00:00"),
            Cadence::Once,
            date("2030-01-01"),
        );
        assert!(pairs.is_empty());
    }

    #[test]
    fn horizon_before_the_source_yields_nothing() {
        let pairs = generate_schedule(
            parse("2024-01-01T10:00:00+00:00"),
            parse("2024-01-01T12:00:00+00:00"),
            Cadence::Weekly,
            date("2023-12-01"),
        );
        assert!(pairs.is_empty());
    }

    #[test]
    fn cadence_parsing_is_case_insensitive_and_strict() {
        assert_eq!("Weekly".parse::<Cadence>().unwrap(), Cadence::Weekly);
        assert_eq!("once".parse::<Cadence>().unwrap(), Cadence::Once);
        assert!(matches!(
            "daily".parse::<Cadence>(),
            Err(WaToolsError::Validation(_))
        ));
    }
}
