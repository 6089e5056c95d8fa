//! Membership directory records.

use serde::{Deserialize, Serialize};

/// A Wild Apricot contact, cut down to the fields the tool reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Member {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl Member {
    /// "First Last (email) [id]", the label used in per-member console lines.
    pub fn describe(&self) -> String {
        format!(
            "{} {} ({}) [{}]",
            self.first_name, self.last_name, self.email, self.id
        )
    }
}
