//! Recipient record builder
//!
//! Turns one raw recipient line (`email[|key=value]*`) into the flat
//! variable mapping that templates are resolved against.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::clock::{Clock, SystemClock};

/// Unsubscribe endpoint used when none is configured
pub const DEFAULT_UNSUBSCRIBE_BASE: &str = "https://example.com/unsubscribe";

/// Address parts substituted for a recipient without an `@`
const FALLBACK_EMAILNAME: &str = "user";
const FALLBACK_DOMAIN: &str = "example.com";

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Variables available to one recipient's templates.
///
/// Keys are stored lower-cased, so lookups through [`RecipientRecord::get`]
/// are case-insensitive. A record is never mutated once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecipientRecord {
    variables: BTreeMap<String, String>,
    #[serde(skip)]
    custom: BTreeSet<String>,
    #[serde(skip)]
    fallback_address: bool,
}

impl RecipientRecord {
    /// Look up a variable by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Look up a variable, treating a missing one as empty
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(&name.to_lowercase())
    }

    /// The recipient address exactly as it appeared on the line
    pub fn email(&self) -> &str {
        self.get_or_empty("email")
    }

    /// Names supplied explicitly as `key=value` fields
    pub fn custom_fields(&self) -> impl Iterator<Item = &str> {
        self.custom.iter().map(String::as_str)
    }

    /// Whether the line lacked an `@` and placeholder address parts were used
    pub fn used_fallback_address(&self) -> bool {
        self.fallback_address
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn insert_derived(&mut self, name: &str, value: impl Into<String>) {
        self.variables.insert(name.to_string(), value.into());
    }

    fn insert_custom(&mut self, name: String, value: impl Into<String>) {
        self.variables.insert(name.clone(), value.into());
        self.custom.insert(name);
    }
}

impl<K, V> FromIterator<(K, V)> for RecipientRecord
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Build a record made only of custom fields
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RecipientRecord::default();
        for (name, value) in iter {
            record.insert_custom(name.as_ref().trim().to_lowercase(), value);
        }
        record
    }
}

/// Builds a [`RecipientRecord`] from a raw recipient line
#[derive(Debug, Clone)]
pub struct RecordBuilder<C = SystemClock> {
    clock: C,
    unsubscribe_base: String,
}

impl RecordBuilder<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for RecordBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RecordBuilder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            unsubscribe_base: DEFAULT_UNSUBSCRIBE_BASE.to_string(),
        }
    }

    /// Override the URL the `unsubscribe` variable points at
    pub fn with_unsubscribe_base(mut self, base: impl Into<String>) -> Self {
        self.unsubscribe_base = base.into();
        self
    }

    pub fn unsubscribe_base(&self) -> &str {
        &self.unsubscribe_base
    }

    /// Parse a recipient line into its variables.
    ///
    /// Never fails: a line without `@` falls back to `user@example.com`
    /// address parts, and segments without `=` are ignored.
    pub fn build(&self, raw_line: &str) -> RecipientRecord {
        let line = raw_line.trim();
        let mut segments = line.split('|');
        let email = segments.next().unwrap_or_default();

        let mut record = RecipientRecord::default();
        let (emailname, full_domain) = email.split_once('@').unwrap_or_else(|| {
            tracing::debug!(line = %line, "Recipient has no '@', using placeholder address");
            record.fallback_address = true;
            (FALLBACK_EMAILNAME, FALLBACK_DOMAIN)
        });
        let domain = full_domain.split('.').next().unwrap_or_default();
        let (firstname, lastname) = derive_names(emailname);
        let now = self.clock.now();

        record.insert_derived("email", email);
        record.insert_derived("recipient_email", email);
        record.insert_derived("emailname", emailname);
        record.insert_derived("domain", domain);
        record.insert_derived("full_domain", full_domain);
        record.insert_derived("time", now.format("%Y-%m-%d %H:%M:%S").to_string());
        record.insert_derived("date", now.format("%Y-%m-%d").to_string());
        record.insert_derived("day", now.format("%A").to_string());
        record.insert_derived("month", now.format("%B").to_string());
        record.insert_derived("year", now.format("%Y").to_string());
        record.insert_derived("firstname", firstname);
        record.insert_derived("lastname", lastname);
        record.insert_derived("company", title_case(domain));
        record.insert_derived("random_number", random_number(email));
        record.insert_derived(
            "unsubscribe",
            format!("{}?email={}", self.unsubscribe_base, email),
        );

        for segment in segments {
            if let Some((key, value)) = segment.split_once('=') {
                record.insert_custom(key.trim().to_lowercase(), value.trim());
            }
        }

        record
    }
}

/// Split `first.last` local parts into title-cased names
fn derive_names(emailname: &str) -> (String, String) {
    let mut parts = emailname.split('.');
    match (parts.next(), parts.next()) {
        (Some(first), Some(last)) => (title_case(first), title_case(last)),
        _ => (title_case(emailname), String::new()),
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A word starts at any letter not preceded by a cased letter, so
/// `o'neil` becomes `O'Neil` and `acme2b` becomes `Acme2B`.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;

    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_lowercase() || c.is_uppercase();
    }

    out
}

/// Three-digit personalization number: FNV-1a (32-bit) of the address, mod 1000.
///
/// Cosmetic only; not suitable for anything security related.
fn random_number(email: &str) -> String {
    format!("{:03}", fnv1a_32(email.as_bytes()) % 1000)
}

fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
