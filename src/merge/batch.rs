//! Batch merge types and recipient list parsing

use serde::{Deserialize, Serialize};

/// Subject used when a message template carries none
pub const DEFAULT_SUBJECT: &str = "Message from Mail Merge";

/// Split a recipients file into one trimmed line per recipient, skipping blanks
pub fn parse_recipient_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Subject lines and body shared by every recipient of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    /// Rotated across recipients in order
    #[serde(default)]
    pub subjects: Vec<String>,
    pub body: String,
}

impl MessageTemplate {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            subjects: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    /// Subject template for the recipient at `index`
    pub fn subject_for(&self, index: usize) -> &str {
        if self.subjects.is_empty() {
            DEFAULT_SUBJECT
        } else {
            &self.subjects[index % self.subjects.len()]
        }
    }
}

/// One personalized message, ready to hand to a delivery transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedMessage {
    pub index: usize,
    pub email: String,
    pub subject: String,
    pub body: String,
    /// The line had no `@` and placeholder address parts were used
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub malformed_address: bool,
    /// Variables used by the subject or body that this recipient lacks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_variables: Vec<String>,
}
