//! Placeholder tokenizer
//!
//! A placeholder is one or two `{`, a name made of `[A-Za-z0-9_.]`, then one
//! or two `}`. Opening and closing brace counts are matched independently, so
//! `{name}}` and `{{name}` are single tokens as well. Scanning is
//! left-to-right and non-overlapping: in `{{{name}}}` only the inner
//! `{{name}}` is a token.

/// One placeholder occurrence inside a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Exact token text including its braces
    pub raw: &'a str,
    /// Name between the braces, as written
    pub name: &'a str,
    pub open: usize,
    pub close: usize,
    /// Byte offset of the first brace
    pub start: usize,
    /// Byte offset just past the last brace
    pub end: usize,
}

impl Placeholder<'_> {
    /// Name used for record lookups
    pub fn key(&self) -> String {
        normalize_name(self.name)
    }

    pub fn is_single_brace(&self) -> bool {
        self.open == 1 && self.close == 1
    }

    pub fn is_double_brace(&self) -> bool {
        self.open == 2 && self.close == 2
    }
}

/// Lower-case a variable name for lookup
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Whether `name` can appear between placeholder braces
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_name_byte)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Iterate over the placeholders of `template` in order of appearance
pub fn placeholders(template: &str) -> Placeholders<'_> {
    Placeholders { template, pos: 0 }
}

/// Iterator returned by [`placeholders`]
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    template: &'a str,
    pos: usize,
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(offset) = self.template[self.pos..].find('{') {
            let start = self.pos + offset;
            match match_at(self.template, start) {
                Some(placeholder) => {
                    self.pos = placeholder.end;
                    return Some(placeholder);
                }
                None => self.pos = start + 1,
            }
        }
        self.pos = self.template.len();
        None
    }
}

/// Try to match a placeholder beginning at the `{` at byte `start`.
///
/// All delimiters and name characters are ASCII, so every computed offset
/// lies on a char boundary.
fn match_at(template: &str, start: usize) -> Option<Placeholder<'_>> {
    let bytes = template.as_bytes();

    let open = if bytes.get(start + 1) == Some(&b'{') { 2 } else { 1 };
    let name_start = start + open;
    let name_len = bytes[name_start..]
        .iter()
        .take_while(|b| is_name_byte(**b))
        .count();
    if name_len == 0 {
        return None;
    }

    let name_end = name_start + name_len;
    let close = bytes[name_end..]
        .iter()
        .take(2)
        .take_while(|b| **b == b'}')
        .count();
    if close == 0 {
        return None;
    }

    let end = name_end + close;
    Some(Placeholder {
        raw: &template[start..end],
        name: &template[name_start..name_end],
        open,
        close,
        start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(template: &str) -> Vec<&str> {
        placeholders(template).map(|p| p.raw).collect()
    }

    #[test]
    fn test_single_and_double_braces() {
        let tokens: Vec<_> = placeholders("Hi {name}, see {{link}}").collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].raw, "{name}");
        assert_eq!(tokens[0].name, "name");
        assert!(tokens[0].is_single_brace());
        assert_eq!((tokens[0].start, tokens[0].end), (3, 9));
        assert_eq!(tokens[1].raw, "{{link}}");
        assert!(tokens[1].is_double_brace());
    }

    #[test]
    fn test_asymmetric_braces() {
        let tokens: Vec<_> = placeholders("{a}} {{b}").collect();

        assert_eq!(tokens[0].raw, "{a}}");
        assert_eq!((tokens[0].open, tokens[0].close), (1, 2));
        assert_eq!(tokens[1].raw, "{{b}");
        assert_eq!((tokens[1].open, tokens[1].close), (2, 1));
    }

    #[test]
    fn test_triple_braces_match_inner_token() {
        let tokens: Vec<_> = placeholders("{{{email}}}").collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].raw, "{{email}}");
        assert_eq!((tokens[0].start, tokens[0].end), (1, 10));
    }

    #[test]
    fn test_rejects_invalid_names() {
        assert!(raws("{} {{}} { name } {a-b} {name").is_empty());
    }

    #[test]
    fn test_dotted_and_numeric_names() {
        assert_eq!(raws("{user.first_name} {x2}"), vec!["{user.first_name}", "{x2}"]);
    }

    #[test]
    fn test_multibyte_text_around_tokens() {
        let tokens: Vec<_> = placeholders("héllo {x} wörld {{ÿ}} {y}").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].raw, "{x}");
        assert_eq!(tokens[1].raw, "{y}");
    }

    #[test]
    fn test_key_is_lower_case() {
        let token = placeholders("{FirstName}").next().unwrap();
        assert_eq!(token.name, "FirstName");
        assert_eq!(token.key(), "firstname");
    }

    #[test]
    fn test_name_validation() {
        assert!(is_valid_name("first_name.2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("first name"));
        assert!(!is_valid_name("naïve"));
    }
}
