//! Slack Web API client. Only `users.list` is needed, paginated with
//! the response cursor.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const USERS_LIST_URL: &str = "https://slack.com/api/users.list";

#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_app_user: bool,
    #[serde(default)]
    pub profile: SlackProfile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackProfile {
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct UsersListResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    members: Vec<SlackUser>,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Default, Deserialize)]
struct ResponseMetadata {
    next_cursor: Option<String>,
}

pub struct SlackClient {
    http: reqwest::Client,
    token: String,
}

impl SlackClient {
    pub fn new(token: &str) -> Self {
        SlackClient {
            http: reqwest::Client::new(),
            token: token.to_string(),
        }
    }

    /// Every non-bot, non-deleted workspace user.
    pub async fn users(&self) -> Result<Vec<SlackUser>> {
        let mut users = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("limit", "200".to_string())];
            if let Some(cursor) = &cursor {
                query.push(("cursor", cursor.clone()));
            }

            let response: UsersListResponse = self
                .http
                .get(USERS_LIST_URL)
                .query(&query)
                .bearer_auth(&self.token)
                .send()
                .await
                .context("Failed to reach the Slack API")?
                .json()
                .await
                .context("Failed to parse the Slack users.list response")?;

            if !response.ok {
                bail!(
                    "Slack rejected users.list: {}",
                    response.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }

            users.extend(response.members.into_iter().filter(is_real_user));

            match response.response_metadata.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(users)
    }
}

fn is_real_user(user: &SlackUser) -> bool {
    !user.is_bot && !user.is_app_user && !user.deleted && user.name != "slackbot"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> SlackUser {
        SlackUser {
            id: "U1".to_string(),
            name: name.to_string(),
            deleted: false,
            is_bot: false,
            is_app_user: false,
            profile: SlackProfile::default(),
        }
    }

    #[test]
    fn plain_members_count_as_real_users() {
        assert!(is_real_user(&user("ada")));
    }

    #[test]
    fn bots_and_slackbot_are_filtered_out() {
        let mut bot = user("reminder");
        bot.is_bot = true;
        assert!(!is_real_user(&bot));
        assert!(!is_real_user(&user("slackbot")));
    }

    #[test]
    fn deactivated_accounts_are_filtered_out() {
        let mut gone = user("grace");
        gone.deleted = true;
        assert!(!is_real_user(&gone));
    }
}
