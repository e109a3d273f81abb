//! Step kinds, step patterns and placeholder captures

use crate::error::{Result, StepError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three step kinds a scenario line can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Given,
    When,
    Then,
}

impl StepKind {
    /// Maps a primary Gherkin keyword to its kind. `And`/`But` have no kind of
    /// their own and return `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Given" => Some(StepKind::Given),
            "When" => Some(StepKind::When),
            "Then" => Some(StepKind::Then),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Given => "given",
            StepKind::When => "when",
            StepKind::Then => "then",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Placeholder values extracted from a step line, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    values: Vec<(String, String)>,
}

impl Captures {
    /// Value captured for `name`, verbatim.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Captures {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// An immutable step template such as `I enter username as "{username}"`.
///
/// Placeholders are written `{identifier}` and match any text, including the
/// empty string. `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone)]
pub struct StepPattern {
    source: String,
    placeholders: Vec<String>,
    regex: Regex,
}

impl StepPattern {
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: &str| StepError::InvalidPattern {
            pattern: template.to_string(),
            reason: reason.to_string(),
        };

        let mut regex_src = String::from("(?s)^");
        let mut literal = String::new();
        let mut placeholders: Vec<String> = Vec::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("unclosed placeholder")),
                        }
                    }
                    if name.is_empty() {
                        return Err(invalid("placeholder needs a name"));
                    }
                    if !is_identifier(&name) {
                        return Err(invalid(&format!("'{name}' is not a valid placeholder name")));
                    }
                    if placeholders.contains(&name) {
                        return Err(invalid(&format!("placeholder '{name}' appears twice")));
                    }

                    regex_src.push_str(&regex::escape(&literal));
                    literal.clear();
                    regex_src.push_str(&format!("(?P<{name}>.*?)"));
                    placeholders.push(name);
                }
                '}' => return Err(invalid("unmatched '}'")),
                other => literal.push(other),
            }
        }

        regex_src.push_str(&regex::escape(&literal));
        regex_src.push('$');

        let regex = Regex::new(&regex_src).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            source: template.to_string(),
            placeholders,
            regex,
        })
    }

    /// The template text as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Matches the whole of `text`, returning the placeholder values on success.
    pub fn captures(&self, text: &str) -> Option<Captures> {
        let caps = self.regex.captures(text)?;
        Some(
            self.placeholders
                .iter()
                .map(|name| {
                    let value = caps.name(name).map_or("", |m| m.as_str());
                    (name.clone(), value.to_string())
                })
                .collect(),
        )
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for StepPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for StepPattern {}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_matches_exact_text_only() {
        let pattern = StepPattern::parse("I am on the login page").unwrap();
        assert!(pattern.placeholders().is_empty());
        assert!(pattern.is_match("I am on the login page"));
        assert!(!pattern.is_match("I am on the login page now"));
        assert!(!pattern.is_match("Then I am on the login page"));
    }

    #[test]
    fn test_placeholders_capture_in_order() {
        let pattern =
            StepPattern::parse(r#"I enter username as "{username}" and password as "{password}""#)
                .unwrap();
        assert_eq!(pattern.placeholders(), ["username", "password"]);

        let caps = pattern
            .captures(r#"I enter username as "alice" and password as "secret123""#)
            .unwrap();
        assert_eq!(caps.get("username"), Some("alice"));
        assert_eq!(caps.get("password"), Some("secret123"));
        let names: Vec<_> = caps.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["username", "password"]);
    }

    #[test]
    fn test_placeholders_accept_empty_text() {
        let pattern =
            StepPattern::parse(r#"I enter username as "{username}" and password as "{password}""#)
                .unwrap();
        let caps = pattern
            .captures(r#"I enter username as "" and password as """#)
            .unwrap();
        assert_eq!(caps.get("username"), Some(""));
        assert_eq!(caps.get("password"), Some(""));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = StepPattern::parse("the total is $5.00 (approx) [{note}]").unwrap();
        let caps = pattern.captures("the total is $5.00 (approx) [net]").unwrap();
        assert_eq!(caps.get("note"), Some("net"));
        assert!(!pattern.is_match("the total is $5X00 (approx) [net]"));
    }

    #[test]
    fn test_escaped_braces() {
        let pattern = StepPattern::parse("a {{literal}} brace").unwrap();
        assert!(pattern.placeholders().is_empty());
        assert!(pattern.is_match("a {literal} brace"));
    }

    #[test]
    fn test_invalid_patterns_are_rejected() {
        for bad in [
            "unclosed {name",
            "stray } brace",
            "empty {} placeholder",
            "bad {1st} name",
            "twice {a} and {a}",
        ] {
            match StepPattern::parse(bad) {
                Err(StepError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, bad),
                other => panic!("expected InvalidPattern for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_step_kind_keywords() {
        assert_eq!(StepKind::from_keyword("Given"), Some(StepKind::Given));
        assert_eq!(StepKind::from_keyword("When"), Some(StepKind::When));
        assert_eq!(StepKind::from_keyword("Then"), Some(StepKind::Then));
        assert_eq!(StepKind::from_keyword("And"), None);
        assert_eq!(StepKind::When.to_string(), "when");
    }
}
