//! Template variable analysis
//!
//! Reports which variables a template uses, how often, under which
//! spellings, and whether a given recipient could resolve them.

use serde::Serialize;

use super::catalogue::is_builtin;
use super::record::RecipientRecord;
use super::token::placeholders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Builtin,
    Custom,
}

/// Usage of one variable name across a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableUsage {
    /// Lower-cased lookup name
    pub name: String,
    pub count: usize,
    /// Distinct literal tokens, in first-seen order
    pub spellings: Vec<String>,
    pub kind: VariableKind,
    #[serde(skip)]
    brace_styles: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAnalysis {
    /// Most used first; ties keep first-seen order
    pub variables: Vec<VariableUsage>,
    pub total_placeholders: usize,
    /// Names written with more than one brace style
    pub inconsistent_names: Vec<String>,
    /// Names the supplied recipient cannot resolve
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

impl TemplateAnalysis {
    pub fn uses(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.variables.iter().any(|v| v.name == name)
    }

    pub fn custom_variables(&self) -> impl Iterator<Item = &VariableUsage> {
        self.variables
            .iter()
            .filter(|v| v.kind == VariableKind::Custom)
    }
}

pub fn analyze(template: &str) -> TemplateAnalysis {
    let mut variables: Vec<VariableUsage> = Vec::new();
    let mut total_placeholders = 0;

    for token in placeholders(template) {
        total_placeholders += 1;
        let key = token.key();
        let style = (token.open, token.close);

        let usage = match variables.iter().position(|v| v.name == key) {
            Some(idx) => &mut variables[idx],
            None => {
                let kind = if is_builtin(&key) {
                    VariableKind::Builtin
                } else {
                    VariableKind::Custom
                };
                variables.push(VariableUsage {
                    name: key,
                    count: 0,
                    spellings: Vec::new(),
                    kind,
                    brace_styles: Vec::new(),
                });
                let last = variables.len() - 1;
                &mut variables[last]
            }
        };

        usage.count += 1;
        if !usage.spellings.iter().any(|s| s == token.raw) {
            usage.spellings.push(token.raw.to_string());
        }
        if !usage.brace_styles.contains(&style) {
            usage.brace_styles.push(style);
        }
    }

    let inconsistent_names = variables
        .iter()
        .filter(|v| v.brace_styles.len() > 1)
        .map(|v| v.name.clone())
        .collect();

    variables.sort_by(|a, b| b.count.cmp(&a.count));

    TemplateAnalysis {
        variables,
        total_placeholders,
        inconsistent_names,
        missing: None,
    }
}

/// Analyze `template` and list the variables `record` cannot resolve
pub fn analyze_against(template: &str, record: &RecipientRecord) -> TemplateAnalysis {
    let mut analysis = analyze(template);
    let missing = analysis
        .variables
        .iter()
        .filter(|v| !record.contains(&v.name))
        .map(|v| v.name.clone())
        .collect();
    analysis.missing = Some(missing);
    analysis
}
