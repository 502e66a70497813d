//! Template resolver
//!
//! Replaces every placeholder with the matching record value in a single
//! left-to-right pass. Substituted values are copied verbatim and never
//! scanned again, so a value containing `{email}` stays literal.

use std::collections::BTreeSet;

use serde::Serialize;

use super::record::RecipientRecord;
use super::token::placeholders;

/// Outcome of resolving a template, with the names the record lacked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub message: String,
    /// Lower-cased names that resolved to the empty string
    pub unknown: Vec<String>,
}

/// Resolve all placeholders in `template` against `record`.
///
/// Unknown names become the empty string. Resolution cannot fail.
pub fn resolve(template: &str, record: &RecipientRecord) -> String {
    resolve_with_report(template, record).message
}

/// Like [`resolve`], passing an absent template through untouched
pub fn resolve_opt(template: Option<&str>, record: &RecipientRecord) -> Option<String> {
    template.map(|t| resolve(t, record))
}

pub fn resolve_with_report(template: &str, record: &RecipientRecord) -> Resolution {
    let mut message = String::with_capacity(template.len());
    let mut unknown = BTreeSet::new();
    let mut cursor = 0;

    for token in placeholders(template) {
        message.push_str(&template[cursor..token.start]);
        match record.get(token.name) {
            Some(value) => message.push_str(value),
            None => {
                unknown.insert(token.key());
            }
        }
        cursor = token.end;
    }
    message.push_str(&template[cursor..]);

    Resolution {
        message,
        unknown: unknown.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RecipientRecord {
        [
            ("email", "x@y.com"),
            ("firstname", "Ada"),
            ("company", "Acme"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolve_simple() {
        assert_eq!(
            resolve("Hello {firstname} from {{company}}!", &record()),
            "Hello Ada from Acme!"
        );
    }

    #[test]
    fn test_resolve_empty_and_absent() {
        assert_eq!(resolve("", &record()), "");
        assert_eq!(resolve_opt(None, &record()), None);
        assert_eq!(resolve_opt(Some(""), &record()), Some(String::new()));
    }

    #[test]
    fn test_resolve_without_placeholders() {
        let template = "Plain text with { braces } and {}";
        assert_eq!(resolve(template, &record()), template);
    }

    #[test]
    fn test_brace_styles_are_interchangeable() {
        let r = record();
        assert_eq!(resolve("{email}", &r), resolve("{{email}}", &r));
        assert_eq!(resolve("{email}}", &r), "x@y.com");
        assert_eq!(resolve("{{email}", &r), "x@y.com");
    }

    #[test]
    fn test_case_insensitive_names() {
        let r = record();
        assert_eq!(resolve("{FirstName}", &r), resolve("{firstname}", &r));
        assert_eq!(resolve("{{FIRSTNAME}}", &r), "Ada");
    }

    #[test]
    fn test_unknown_resolves_to_empty() {
        assert_eq!(resolve("{doesnotexist}", &record()), "");
        assert_eq!(resolve("a{{nope}}b", &record()), "ab");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let r: RecipientRecord = [("email", "x@y.com"), ("firstname", "{email}")]
            .into_iter()
            .collect();
        assert_eq!(resolve("{firstname}", &r), "{email}");
        assert_eq!(resolve("{firstname} {email}", &r), "{email} x@y.com");
    }

    #[test]
    fn test_mixed_spellings_of_same_name() {
        assert_eq!(
            resolve("{email} {{email}} {{Email}}", &record()),
            "x@y.com x@y.com x@y.com"
        );
    }

    #[test]
    fn test_triple_braces_keep_outer_braces() {
        assert_eq!(resolve("{{{company}}}", &record()), "{Acme}");
    }

    #[test]
    fn test_report_lists_unknown_names() {
        let resolution = resolve_with_report("{Position} {email} {{position}} {city}", &record());
        assert_eq!(resolution.message, " x@y.com  ");
        assert_eq!(resolution.unknown, vec!["city", "position"]);
    }
}
