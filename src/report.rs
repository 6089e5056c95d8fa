//! Text report for the Slack membership diff.

use crate::slack::SlackUser;
use watools_core::member::Member;

const INVITE_CHUNK_SIZE: usize = 100;

/// Human-readable report listing members to invite to Slack and Slack
/// users with no active membership. Invite emails are grouped into
/// chunks that fit the Slack invite dialog.
pub fn sync_report(to_invite: &[Member], to_remove: &[SlackUser]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# {} active members are not in Slack:\n\n",
        to_invite.len()
    ));
    for member in to_invite {
        out.push_str(&format!(
            "- {} {} <{}>\n",
            member.first_name, member.last_name, member.email
        ));
    }

    out.push_str("\n# Paste the following into the Slack invite dialog:\n");
    for (index, chunk) in to_invite.chunks(INVITE_CHUNK_SIZE).enumerate() {
        out.push_str(&format!("\n## Chunk {}\n\n", index + 1));
        let emails: Vec<&str> = chunk.iter().map(|m| m.email.as_str()).collect();
        out.push_str(&emails.join(", "));
        out.push('\n');
    }

    out.push_str(&format!(
        "\n# {} Slack users have no active membership:\n\n",
        to_remove.len()
    ));
    for user in to_remove {
        let email = user.profile.email.as_deref().unwrap_or("no email");
        out.push_str(&format!("- {} <{}>\n", user.name, email));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::SlackProfile;

    fn member(index: usize) -> Member {
        Member {
            id: index as u64,
            first_name: format!("First{index}"),
            last_name: format!("Last{index}"),
            email: format!("member{index}@example.com"),
        }
    }

    #[test]
    fn invites_are_chunked_for_the_invite_dialog() {
        let to_invite: Vec<Member> = (0..150).map(member).collect();
        let report = sync_report(&to_invite, &[]);

        assert!(report.contains("## Chunk 1"));
        assert!(report.contains("## Chunk 2"));
        assert!(!report.contains("## Chunk 3"));
        assert!(report.contains("member0@example.com, member1@example.com"));
    }

    #[test]
    fn removals_list_slack_names_and_emails() {
        let user = SlackUser {
            id: "U7".to_string(),
            name: "stale".to_string(),
            deleted: false,
            is_bot: false,
            is_app_user: false,
            profile: SlackProfile {
                email: Some("stale@example.com".to_string()),
            },
        };
        let report = sync_report(&[], &[user]);

        assert!(report.contains("# 1 Slack users have no active membership:"));
        assert!(report.contains("- stale <stale@example.com>"));
    }
}
