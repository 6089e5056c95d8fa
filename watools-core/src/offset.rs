//! Offset suffix correction for ISO-8601 timestamps.
//!
//! Wild Apricot reports a registration type's "available from" time with
//! the server's own UTC offset instead of the event's. Patching the
//! trailing offset with the one from the event's start date yields the
//! instant registration actually opens. This is deliberately string-level
//! surgery on the last six characters; the rest of the timestamp is never
//! touched, so a date or time that happens to contain the same six
//! characters earlier in the string cannot be corrupted.

use crate::error::{WaToolsError, WaToolsResult};

const OFFSET_LEN: usize = 6;

/// Replace the trailing `±HH:MM` offset of `target` with the one taken
/// from `reference`, leaving every other byte of `target` unchanged.
///
/// Both inputs must end in a `±HH:MM` offset; anything else is a
/// `Validation` error.
pub fn correct_offset(reference: &str, target: &str) -> WaToolsResult<String> {
    let reference_offset = offset_suffix(reference)?;
    offset_suffix(target)?;
    let body = &target[..target.len() - OFFSET_LEN];
    Ok(format!("{body}{reference_offset}"))
}

/// The trailing 6-character `±HH:MM` offset of a timestamp.
fn offset_suffix(timestamp: &str) -> WaToolsResult<&str> {
    let invalid =
        || WaToolsError::Validation(format!("\"{timestamp}\" does not end in a ±HH:MM offset"));

    if timestamp.len() < OFFSET_LEN || !timestamp.is_char_boundary(timestamp.len() - OFFSET_LEN) {
        return Err(invalid());
    }

    let suffix = &timestamp[timestamp.len() - OFFSET_LEN..];
    let bytes = suffix.as_bytes();
    let valid = (bytes[0] == b'+' || bytes[0] == b'-')
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_digit()
        && bytes[3] == b':'
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_digit();

    if valid { Ok(suffix) } else { Err(invalid()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_the_trailing_offset() {
        let corrected =
            correct_offset("2024-06-01T10:00:00+05:00", "2024-06-01T08:00:00-08:00").unwrap();
        assert_eq!(corrected, "2024-06-01T08:00:00+05:00");
    }

    #[test]
    fn earlier_occurrences_of_the_offset_digits_survive() {
        // The time-of-day contains the same digits as the trailing offset.
        let corrected =
            correct_offset("2024-06-01T10:00:00-07:00", "2024-06-01T05:00:05+05:00").unwrap();
        assert_eq!(corrected, "2024-06-01T05:00:05-07:00");
    }

    #[test]
    fn target_without_offset_is_rejected() {
        let err = correct_offset("2024-06-01T10:00:00+05:00", "2024-06-01T08:00:00Z").unwrap_err();
        assert!(matches!(err, WaToolsError::Validation(_)));
    }

    #[test]
    fn reference_without_offset_is_rejected() {
        let err = correct_offset("not a timestamp", "2024-06-01T08:00:00-08:00").unwrap_err();
        assert!(matches!(err, WaToolsError::Validation(_)));
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(correct_offset("+05:0", "2024-06-01T08:00:00-08:00").is_err());
    }
}
