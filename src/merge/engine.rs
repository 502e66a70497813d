//! Mail-merge facade combining the record builder and the resolver

use thiserror::Error;

use super::batch::{MergedMessage, MessageTemplate};
use super::clock::{Clock, SystemClock};
use super::record::{RecipientRecord, RecordBuilder};
use super::resolver::{resolve, resolve_with_report};

/// A batch would have produced more subject and body text than allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Merged output exceeds the limit of {limit} bytes")]
pub struct OutputLimitExceeded {
    pub limit: usize,
    /// Recipients merged before the limit was crossed
    pub merged: usize,
}

/// Personalizes templates for raw recipient lines.
///
/// Holds no mutable state, so one instance can be shared across threads and
/// used for any number of recipients concurrently.
#[derive(Debug, Clone)]
pub struct MailMerge<C = SystemClock> {
    builder: RecordBuilder<C>,
}

impl MailMerge<SystemClock> {
    pub fn new() -> Self {
        Self::with_builder(RecordBuilder::new())
    }
}

impl Default for MailMerge<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MailMerge<C> {
    pub fn with_builder(builder: RecordBuilder<C>) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &RecordBuilder<C> {
        &self.builder
    }

    pub fn parse_recipient(&self, line: &str) -> RecipientRecord {
        self.builder.build(line)
    }

    /// Build the record for `line` and resolve `template` against it
    pub fn apply(&self, template: &str, line: &str) -> String {
        if template.is_empty() {
            return String::new();
        }
        resolve(template, &self.builder.build(line))
    }

    pub fn apply_opt(&self, template: Option<&str>, line: &str) -> Option<String> {
        template.map(|t| self.apply(t, line))
    }

    /// Personalize `template` for every line, in order.
    ///
    /// Malformed lines still produce a message; nothing here can abort the batch.
    pub fn merge_batch<S: AsRef<str>>(
        &self,
        template: &MessageTemplate,
        lines: &[S],
    ) -> Vec<MergedMessage> {
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| self.merge_one(template, index, line.as_ref()))
            .collect()
    }

    /// Like [`MailMerge::merge_batch`], but stops as soon as the combined
    /// subject and body bytes pass `max_output_bytes`.
    pub fn merge_batch_bounded<S: AsRef<str>>(
        &self,
        template: &MessageTemplate,
        lines: &[S],
        max_output_bytes: usize,
    ) -> Result<Vec<MergedMessage>, OutputLimitExceeded> {
        let mut messages = Vec::with_capacity(lines.len());
        let mut output_bytes = 0usize;

        for (index, line) in lines.iter().enumerate() {
            let message = self.merge_one(template, index, line.as_ref());
            output_bytes = output_bytes
                .saturating_add(message.subject.len())
                .saturating_add(message.body.len());
            if output_bytes > max_output_bytes {
                return Err(OutputLimitExceeded {
                    limit: max_output_bytes,
                    merged: index,
                });
            }
            messages.push(message);
        }

        Ok(messages)
    }

    fn merge_one(&self, template: &MessageTemplate, index: usize, line: &str) -> MergedMessage {
        let record = self.builder.build(line);
        let subject = resolve_with_report(template.subject_for(index), &record);
        let body = resolve_with_report(&template.body, &record);

        let mut unknown_variables = subject.unknown;
        for name in body.unknown {
            if !unknown_variables.contains(&name) {
                unknown_variables.push(name);
            }
        }
        unknown_variables.sort();

        MergedMessage {
            index,
            email: record.email().to_string(),
            subject: subject.message,
            body: body.message,
            malformed_address: record.used_fallback_address(),
            unknown_variables,
        }
    }
}
