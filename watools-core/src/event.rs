//! Wild Apricot event types.
//!
//! Only the fields the tool actually reads are modeled; everything else in
//! the payload stays on the wire. Start and end instants are kept as the
//! raw ISO-8601 strings the API returns, because their trailing UTC offset
//! is significant (see `offset.rs`) and must round-trip unchanged.

use serde::{Deserialize, Serialize};

/// An event as returned by the events listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub confirmed_registrations_count: Option<u32>,
}

impl EventSummary {
    /// Human-readable label used in console output.
    pub fn display_name(&self) -> String {
        display_name(&self.name, self.location.as_deref(), &self.start_date)
    }
}

/// A single event fetched with full details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub confirmed_registrations_count: Option<u32>,
    #[serde(default)]
    pub details: EventDetails,
}

impl Event {
    pub fn display_name(&self) -> String {
        display_name(&self.name, self.location.as_deref(), &self.start_date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventDetails {
    #[serde(default)]
    pub registration_types: Vec<RegistrationType>,
    /// Carried through verbatim when cloning; the tool never looks inside.
    #[serde(default)]
    pub access_control: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegistrationType {
    pub id: u64,
    pub name: String,
    /// When this type opens for registration. Reported with the server's
    /// own UTC offset rather than the event's.
    #[serde(default)]
    pub available_from: Option<String>,
}

/// The subset of an event sent back when updating it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventEdit {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<EventEditDetails>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventEditDetails {
    pub access_control: serde_json::Value,
}

/// One attendee registration for an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRegistration {
    pub id: u64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub on_waitlist: bool,
    #[serde(default)]
    pub contact: ContactRef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactRef {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

fn display_name(name: &str, location: Option<&str>, start_date: &str) -> String {
    format!(
        "{} at {} on {}",
        name,
        location.unwrap_or("(no location)"),
        start_date
    )
}
