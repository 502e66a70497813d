//! Mail-merge personalization engine.
//!
//! This module provides:
//! - Recipient record building from `email[|key=value]*` lines
//! - Placeholder scanning for `{variable}` and `{{variable}}` tokens
//! - Non-recursive, case-insensitive template resolution
//! - The built-in variable catalogue and template analysis
//!
//! # Example
//!
//! ```ignore
//! let merge = MailMerge::new();
//!
//! let line = "john.doe@acme.com|position=CEO";
//! let message = merge.apply("Hello {firstname}, {position} at {{company}}", line);
//!
//! assert_eq!(message, "Hello John, CEO at Acme");
//! ```

mod analysis;
mod batch;
mod catalogue;
mod clock;
mod engine;
mod record;
mod resolver;
mod token;

pub use analysis::{analyze, analyze_against, TemplateAnalysis, VariableKind, VariableUsage};
pub use batch::{parse_recipient_list, MergedMessage, MessageTemplate, DEFAULT_SUBJECT};
pub use catalogue::{
    available_variables, builtin_variables, generate_documentation, is_builtin, VariableInfo,
    CUSTOM_FIELDS,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{MailMerge, OutputLimitExceeded};
pub use record::{RecipientRecord, RecordBuilder, DEFAULT_UNSUBSCRIBE_BASE};
pub use resolver::{resolve, resolve_opt, resolve_with_report, Resolution};
pub use token::{is_valid_name, normalize_name, placeholders, Placeholder, Placeholders};
