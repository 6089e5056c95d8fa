//! Wild Apricot REST client.
//!
//! Authentication is OAuth client-credentials with the account API key.
//! The token and account id live in an explicit session owned by the
//! client for the lifetime of the process; the token is re-fetched
//! transparently once it expires.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Mutex;

use watools_core::error::{WaToolsError, WaToolsResult};
use watools_core::event::{Event, EventEdit, EventRegistration, EventSummary};
use watools_core::member::Member;
use watools_core::registration::{EventPortal, MembershipDirectory};

const OAUTH_TOKEN_URL: &str = "https://oauth.wildapricot.org/auth/token";
const API_BASE_URL: &str = "https://api.wildapricot.org/v2";

#[derive(Debug, Clone)]
struct Token {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Account {
    id: u64,
}

pub struct WaClient {
    http: reqwest::Client,
    api_key: String,
    account_id: u64,
    token: Mutex<Token>,
}

impl WaClient {
    /// Authenticate and resolve the account the API key belongs to.
    pub async fn connect(api_key: &str) -> Result<Self> {
        let http = reqwest::Client::new();
        let token = request_token(&http, api_key).await?;

        let accounts: Vec<Account> = http
            .get(format!("{API_BASE_URL}/accounts"))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("Failed to fetch Wild Apricot accounts")?
            .error_for_status()
            .context("Wild Apricot rejected the accounts request")?
            .json()
            .await
            .context("Failed to parse Wild Apricot accounts")?;

        let account = accounts
            .into_iter()
            .next()
            .context("The API key has access to no Wild Apricot accounts")?;

        Ok(WaClient {
            http,
            api_key: api_key.to_string(),
            account_id: account.id,
            token: Mutex::new(token),
        })
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    /// Current access token, re-fetched if the cached one expired.
    async fn bearer(&self) -> Result<String> {
        {
            let token = self.token.lock().unwrap();
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = request_token(&self.http, &self.api_key).await?;
        let access_token = fresh.access_token.clone();
        *self.token.lock().unwrap() = fresh;
        Ok(access_token)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.bearer().await?;
        let url = format!("{API_BASE_URL}/accounts/{}/{path}", self.account_id);

        self.http
            .get(&url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Request to {path} failed"))?
            .error_for_status()
            .with_context(|| format!("Wild Apricot rejected the {path} request"))?
            .json()
            .await
            .with_context(|| format!("Failed to parse the {path} response"))
    }

    /// Events matching a name, starting on or after `min_start`.
    pub async fn events(&self, name: &str, min_start: NaiveDate) -> Result<Vec<EventSummary>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct EventsResponse {
            events: Vec<EventSummary>,
        }

        let filter = format!("StartDate ge {min_start} AND Name eq '{name}'");
        let response: EventsResponse = self.get("events", &[("$filter", filter)]).await?;
        Ok(response.events)
    }

    /// One event with full details (registration types, access control).
    pub async fn event(&self, id: u64) -> Result<Event> {
        self.get(&format!("events/{id}"), &[]).await
    }

    /// One event as raw JSON, for `get-event` and `update-events`.
    pub async fn event_raw(&self, id: u64) -> Result<serde_json::Value> {
        self.get(&format!("events/{id}"), &[]).await
    }

    /// Contacts matching a free-text directory query.
    pub async fn members(&self, query: &str) -> Result<Vec<Member>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct ContactsResponse {
            contacts: Vec<Member>,
        }

        let response: ContactsResponse = self
            .get(
                "contacts",
                &[
                    ("$async", "false".to_string()),
                    ("simpleQuery", query.to_string()),
                ],
            )
            .await?;
        Ok(response.contacts)
    }

    /// All contacts with an active membership, for the Slack diff.
    pub async fn active_members(&self) -> Result<Vec<Member>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct ContactsResponse {
            contacts: Vec<Member>,
        }

        let response: ContactsResponse = self
            .get(
                "contacts",
                &[
                    ("$async", "false".to_string()),
                    ("$filter", "'Membership status.Id' eq 1".to_string()),
                ],
            )
            .await?;
        Ok(response.contacts)
    }

    pub async fn event_registrations(&self, event_id: u64) -> Result<Vec<EventRegistration>> {
        self.get(
            "eventregistrations",
            &[("eventId", event_id.to_string())],
        )
        .await
    }

    /// Clone an event, returning the new event's id. The clone keeps the
    /// source's dates until updated.
    pub async fn clone_event(&self, event_id: u64) -> Result<u64> {
        let token = self.bearer().await?;
        let url = format!("{API_BASE_URL}/rpc/{}/CloneEvent", self.account_id);

        self.http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "EventId": event_id }))
            .send()
            .await
            .context("Failed to clone the event")?
            .error_for_status()
            .context("Wild Apricot rejected the clone request")?
            .json()
            .await
            .context("Failed to parse the clone response")
    }

    pub async fn update_event(&self, edit: &EventEdit) -> Result<Event> {
        let token = self.bearer().await?;
        let url = format!("{API_BASE_URL}/accounts/{}/events/{}", self.account_id, edit.id);

        self.http
            .put(&url)
            .bearer_auth(token)
            .json(edit)
            .send()
            .await
            .context("Failed to update the event")?
            .error_for_status()
            .context("Wild Apricot rejected the event update")?
            .json()
            .await
            .context("Failed to parse the updated event")
    }

    /// Update with an arbitrary JSON body, for `update-events` merges.
    pub async fn update_event_raw(
        &self,
        event_id: u64,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let token = self.bearer().await?;
        let url = format!("{API_BASE_URL}/accounts/{}/events/{event_id}", self.account_id);

        self.http
            .put(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .context("Failed to update the event")?
            .error_for_status()
            .context("Wild Apricot rejected the event update")?
            .json()
            .await
            .context("Failed to parse the updated event")
    }

    pub async fn register(
        &self,
        event_id: u64,
        registration_type_id: u64,
        contact_id: u64,
    ) -> Result<()> {
        let token = self.bearer().await?;
        let url = format!("{API_BASE_URL}/accounts/{}/eventregistrations", self.account_id);

        self.http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({
                "Event": { "Id": event_id },
                "Contact": { "Id": contact_id },
                "RegistrationTypeId": registration_type_id,
            }))
            .send()
            .await
            .context("Failed to submit the registration")?
            .error_for_status()
            .context("Wild Apricot rejected the registration")?;
        Ok(())
    }
}

async fn request_token(http: &reqwest::Client, api_key: &str) -> Result<Token> {
    let response: AuthResponse = http
        .post(OAUTH_TOKEN_URL)
        .basic_auth("APIKEY", Some(api_key))
        .form(&[("grant_type", "client_credentials"), ("scope", "auto")])
        .send()
        .await
        .context("Failed to reach the Wild Apricot OAuth endpoint")?
        .error_for_status()
        .context("Wild Apricot rejected the API key")?
        .json()
        .await
        .context("Failed to parse the Wild Apricot auth response")?;

    Ok(Token {
        access_token: response.access_token,
        expires_at: Utc::now() + Duration::seconds(response.expires_in),
    })
}

impl MembershipDirectory for WaClient {
    async fn find_members(&self, query: &str) -> WaToolsResult<Vec<Member>> {
        self.members(query).await.map_err(upstream)
    }
}

impl EventPortal for WaClient {
    async fn find_events(
        &self,
        name: &str,
        min_start: NaiveDate,
    ) -> WaToolsResult<Vec<EventSummary>> {
        self.events(name, min_start).await.map_err(upstream)
    }

    async fn fetch_event(&self, id: u64) -> WaToolsResult<Event> {
        self.event(id).await.map_err(upstream)
    }

    async fn submit_registration(
        &self,
        event_id: u64,
        registration_type_id: u64,
        contact_id: u64,
    ) -> WaToolsResult<()> {
        self.register(event_id, registration_type_id, contact_id)
            .await
            .map_err(upstream)
    }
}

fn upstream(err: anyhow::Error) -> WaToolsError {
    WaToolsError::Upstream(format!("{err:#}"))
}
