//! Batch event registration.
//!
//! Resolves a set of members and the earliest matching event occurrence,
//! waits for the registration type to open (with the offset of the "open
//! from" timestamp corrected against the event's own start date), then
//! fires one registration per member, sequentially, tolerating per-member
//! failure. The collaborators are trait seams so the runner can be driven
//! by the real API client or by in-memory doubles in tests.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::countdown::{CancelToken, Countdown, CountdownOutcome, ProgressSink};
use crate::error::{WaToolsError, WaToolsResult};
use crate::event::{Event, EventSummary};
use crate::member::Member;
use crate::offset::correct_offset;

/// Membership directory lookup. Caller semantics are best-effort: the
/// first search result wins and ambiguity is not checked.
#[allow(async_fn_in_trait)]
pub trait MembershipDirectory {
    async fn find_members(&self, query: &str) -> WaToolsResult<Vec<Member>>;
}

/// The event side of the membership system.
#[allow(async_fn_in_trait)]
pub trait EventPortal {
    async fn find_events(
        &self,
        name: &str,
        min_start: NaiveDate,
    ) -> WaToolsResult<Vec<EventSummary>>;

    async fn fetch_event(&self, id: u64) -> WaToolsResult<Event>;

    async fn submit_registration(
        &self,
        event_id: u64,
        registration_type_id: u64,
        contact_id: u64,
    ) -> WaToolsResult<()>;
}

/// What the operator asked for.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub event_name: String,
    pub min_start: NaiveDate,
    pub registration_type: String,
    pub member_queries: Vec<String>,
}

/// Per-member result of the firing stage.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberOutcome {
    Registered,
    Failed(String),
    /// The directory query matched nobody; nothing was submitted.
    NotFound,
}

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub query: String,
    pub member: Option<Member>,
    pub outcome: MemberOutcome,
}

/// The batch's overall result is the set of per-member outcomes, not a
/// single success flag.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub event_id: u64,
    pub event_name: String,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn registered(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == MemberOutcome::Registered)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.registered()
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.outcome == MemberOutcome::Registered)
    }
}

/// Run the whole batch: resolve members, resolve the target occurrence and
/// registration type, wait for the corrected open instant, then register
/// every resolved member in order.
///
/// `EventNotFound` and `RegistrationTypeNotFound` abort before any
/// mutation; once firing starts, per-member failures are collected in the
/// report and the loop continues.
pub async fn run_batch<A, S>(
    api: &A,
    sink: &S,
    request: &BatchRequest,
    cancel: &mut CancelToken,
) -> WaToolsResult<BatchReport>
where
    A: EventPortal + MembershipDirectory,
    S: ProgressSink,
{
    // Resolve each query to its first directory match.
    let mut resolved: Vec<(String, Option<Member>)> = Vec::new();
    for query in &request.member_queries {
        let member = api.find_members(query).await?.into_iter().next();
        match &member {
            Some(member) => sink.on_event(&format!("Found {}", member.describe())),
            None => sink.on_event(&format!("No member matched \"{query}\"")),
        }
        resolved.push((query.clone(), member));
    }

    // Earliest event matching the name and minimum start date.
    let mut candidates = api
        .find_events(&request.event_name, request.min_start)
        .await?;
    candidates.sort_by_key(|event| {
        parse_instant(&event.start_date)
            .map(|instant| instant.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    });
    let earliest = candidates
        .into_iter()
        .next()
        .ok_or_else(|| WaToolsError::EventNotFound(request.event_name.clone()))?;

    let event = api.fetch_event(earliest.id).await?;
    sink.on_event(&format!(
        "Registering for event \"{}\" ({}) starting {}",
        event.name, event.id, event.start_date
    ));

    // Case-insensitive exact match against the event's registration types.
    let wanted = request.registration_type.to_lowercase();
    let registration_type = event
        .details
        .registration_types
        .iter()
        .find(|t| t.name.to_lowercase() == wanted)
        .ok_or_else(|| WaToolsError::RegistrationTypeNotFound {
            wanted: request.registration_type.clone(),
            available: event
                .details
                .registration_types
                .iter()
                .map(|t| t.name.clone())
                .collect(),
        })?;
    let registration_type_id = registration_type.id;
    let available_from = registration_type.available_from.clone();

    // The reported "available from" carries the reporting server's offset,
    // not the event's; patch it before parsing. A type with no timestamp
    // is already open.
    if let Some(available_from) = available_from {
        let corrected = correct_offset(&event.start_date, &available_from)?;
        let opens_at = parse_instant(&corrected)?;
        sink.on_event(&format!("Registration opens at {corrected}"));

        let outcome = Countdown::new(opens_at.with_timezone(&Utc))
            .wait(sink, cancel)
            .await;
        if outcome == CountdownOutcome::Cancelled {
            return Err(WaToolsError::Cancelled);
        }
    }

    // Fire sequentially; a failed registration is recorded, not fatal.
    let mut entries = Vec::new();
    for (query, member) in resolved {
        let outcome = match &member {
            Some(member) => {
                sink.on_event(&format!("Registering {}", member.describe()));
                match api
                    .submit_registration(event.id, registration_type_id, member.id)
                    .await
                {
                    Ok(()) => MemberOutcome::Registered,
                    Err(err) => MemberOutcome::Failed(err.to_string()),
                }
            }
            None => MemberOutcome::NotFound,
        };
        entries.push(BatchEntry {
            query,
            member,
            outcome,
        });
    }

    Ok(BatchReport {
        event_id: event.id,
        event_name: event.name,
        entries,
    })
}

/// Parse an ISO-8601 timestamp with offset.
fn parse_instant(value: &str) -> WaToolsResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|err| {
        WaToolsError::Validation(format!("\"{value}\" is not a valid timestamp: {err}"))
    })
}
