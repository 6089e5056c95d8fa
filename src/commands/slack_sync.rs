//! Diff active Wild Apricot members against Slack workspace users by
//! email and write an invite/remove report to the working directory.

use anyhow::{Context, Result};

use crate::commands::create_spinner;
use crate::report;
use crate::slack::{SlackClient, SlackUser};
use crate::wildapricot::WaClient;
use watools_core::member::Member;

const REPORT_FILE: &str = "wild-apricot-slack-sync-report.txt";

pub async fn run(client: &WaClient, slack_token: &str, verbose: bool) -> Result<()> {
    let spinner = create_spinner("Fetching active Wild Apricot members".to_string());
    let members = client.active_members().await;
    spinner.finish_and_clear();
    let members = members?;
    println!("Got {} active Wild Apricot members", members.len());

    let slack = SlackClient::new(slack_token);
    let spinner = create_spinner("Fetching Slack users".to_string());
    let users = slack.users().await;
    spinner.finish_and_clear();
    let users = users?;
    println!("Got {} Slack users", users.len());

    let to_invite = members_missing_from_slack(&members, &users);
    let to_remove = users_without_membership(&members, &users);

    if verbose {
        for member in &to_invite {
            println!("Not in Slack: {}", member.describe());
        }
        for user in &to_remove {
            let email = user.profile.email.as_deref().unwrap_or("no email");
            println!("No active membership: {} <{email}>", user.name);
        }
    }

    println!("{} active members are not in Slack", to_invite.len());
    println!("{} Slack users have no active membership", to_remove.len());

    let report = report::sync_report(&to_invite, &to_remove);
    std::fs::write(REPORT_FILE, report)
        .with_context(|| format!("Failed to write {REPORT_FILE}"))?;
    println!("Wrote {REPORT_FILE}");

    Ok(())
}

fn members_missing_from_slack(members: &[Member], users: &[SlackUser]) -> Vec<Member> {
    members
        .iter()
        .filter(|member| {
            !users.iter().any(|user| {
                user.profile
                    .email
                    .as_deref()
                    .is_some_and(|email| email.eq_ignore_ascii_case(&member.email))
            })
        })
        .cloned()
        .collect()
}

fn users_without_membership(members: &[Member], users: &[SlackUser]) -> Vec<SlackUser> {
    users
        .iter()
        .filter(|user| {
            !members.iter().any(|member| {
                user.profile
                    .email
                    .as_deref()
                    .is_some_and(|email| email.eq_ignore_ascii_case(&member.email))
            })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::SlackProfile;

    fn member(email: &str) -> Member {
        Member {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
        }
    }

    fn user(email: Option<&str>) -> SlackUser {
        SlackUser {
            id: "U1".to_string(),
            name: "ada".to_string(),
            deleted: false,
            is_bot: false,
            is_app_user: false,
            profile: SlackProfile {
                email: email.map(str::to_string),
            },
        }
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let members = vec![member("Ada@Example.com")];
        let users = vec![user(Some("ada@example.com"))];

        assert!(members_missing_from_slack(&members, &users).is_empty());
        assert!(users_without_membership(&members, &users).is_empty());
    }

    #[test]
    fn unmatched_entries_appear_on_both_sides() {
        let members = vec![member("only-member@example.com")];
        let users = vec![user(Some("only-slack@example.com"))];

        assert_eq!(members_missing_from_slack(&members, &users).len(), 1);
        assert_eq!(users_without_membership(&members, &users).len(), 1);
    }

    #[test]
    fn users_without_an_email_count_as_unmatched() {
        let members = vec![member("ada@example.com")];
        let users = vec![user(None)];

        assert_eq!(members_missing_from_slack(&members, &users).len(), 1);
        assert_eq!(users_without_membership(&members, &users).len(), 1);
    }
}
