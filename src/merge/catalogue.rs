//! Built-in variable catalogue and its HTML documentation

use serde::Serialize;

/// Description of one personalization variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

const fn var(name: &'static str, description: &'static str, example: &'static str) -> VariableInfo {
    VariableInfo {
        name,
        description,
        example,
    }
}

/// Entry describing user-supplied `key=value` fields
pub const CUSTOM_FIELDS: VariableInfo = var(
    "Custom fields",
    "Any custom field added with format email@example.com|fieldname=value",
    "position, company, phone, etc.",
);

const BUILTINS: [VariableInfo; 15] = [
    var("email", "Full email address of recipient", "john.doe@example.com"),
    var("recipient_email", "Same as email", "john.doe@example.com"),
    var("emailname", "Username part of email address", "john.doe"),
    var(
        "domain",
        "Domain name without TLD (e.g. 'example' from 'example.com')",
        "example",
    ),
    var(
        "full_domain",
        "Complete domain part of email address with TLD",
        "example.com",
    ),
    var("time", "Current date and time", "2025-04-18 14:30:45"),
    var("date", "Current date", "2025-04-18"),
    var("day", "Current day of week", "Friday"),
    var("month", "Current month", "April"),
    var("year", "Current year", "2025"),
    var(
        "firstname",
        "First name (derived from email or custom field)",
        "John",
    ),
    var(
        "lastname",
        "Last name (derived from email or custom field)",
        "Doe",
    ),
    var(
        "company",
        "Company name (derived from domain name or custom field)",
        "Example",
    ),
    var(
        "random_number",
        "Unique 3-digit number based on email",
        "123",
    ),
    var(
        "unsubscribe",
        "Unsubscribe link with email parameter",
        "https://example.com/unsubscribe?email=john.doe@example.com",
    ),
];

/// The derived variables every recipient record carries
pub fn builtin_variables() -> &'static [VariableInfo] {
    &BUILTINS
}

/// Built-in variables followed by the custom-field entry
pub fn available_variables() -> Vec<VariableInfo> {
    BUILTINS.iter().copied().chain([CUSTOM_FIELDS]).collect()
}

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|v| v.name.eq_ignore_ascii_case(name))
}

/// Render the catalogue as an HTML fragment for help pages
pub fn generate_documentation() -> String {
    let mut html = String::from("<h2>Available Personalization Variables</h2>");
    html.push_str(
        "<p>Use these variables in your email templates with either single braces \
         {variable} or double braces {{variable}}.</p>",
    );
    html.push_str("<table border='1' cellpadding='5' cellspacing='0'>");
    html.push_str("<tr><th>Variable</th><th>Description</th><th>Example</th></tr>");

    for info in available_variables() {
        html.push_str(&format!(
            "<tr><td><code>{{{}}}</code></td><td>{}</td><td>{}</td></tr>",
            info.name, info.description, info.example
        ));
    }

    html.push_str("</table>");
    html.push_str("<h3>Advanced Recipient Format</h3>");
    html.push_str("<p>To include custom fields, format your recipients file as follows:</p>");
    html.push_str(
        "<pre>email@example.com|firstname=John|lastname=Doe|company=Acme Inc|position=CEO</pre>",
    );
    html.push_str(
        "<p>Then you can use {firstname}, {lastname}, {company}, and {position} \
         variables in your templates.</p>",
    );

    html
}
