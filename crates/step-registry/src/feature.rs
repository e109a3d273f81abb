//! Plain-text feature files
//!
//! A small Gherkin subset: `Feature:`, description lines, `Background:`,
//! `Scenario:`, the step keywords, `#` comments and `@tags`. Doc strings,
//! data tables and scenario outlines are rejected.

use login_core::{Result, StepError, StepKind};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Keyword as written, e.g. `And`.
    pub keyword: String,
    /// Resolved kind; `And`/`But` take the kind of the step before them.
    pub kind: StepKind,
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: String,
    pub line: usize,
    /// Background steps first, then the scenario's own.
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: String,
    pub description: Vec<String>,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Description,
    Background,
    Scenario,
}

const UNSUPPORTED_HEADERS: [&str; 4] = [
    "Scenario Outline:",
    "Scenario Template:",
    "Examples:",
    "Rule:",
];

impl Feature {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| StepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Parsing feature file {}", path.display());
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self> {
        let mut name: Option<String> = None;
        let mut description = Vec::new();
        let mut background: Vec<Step> = Vec::new();
        let mut scenarios: Vec<Scenario> = Vec::new();
        let mut section = Section::Preamble;
        let mut last_kind: Option<StepKind> = None;

        for (index, raw) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            let error = |reason: &str| StepError::FeatureParse {
                line: line_no,
                reason: reason.to_string(),
            };

            if line.is_empty() || line.starts_with('#') || line.starts_with('@') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("Feature:") {
                if name.is_some() {
                    return Err(error("only one Feature per file"));
                }
                name = Some(rest.trim().to_string());
                section = Section::Description;
                continue;
            }

            if section == Section::Preamble {
                return Err(error("expected 'Feature:'"));
            }

            if UNSUPPORTED_HEADERS.iter().any(|h| line.starts_with(h)) {
                return Err(error("scenario outlines and rules are not supported"));
            }

            if line.starts_with("\"\"\"") || line.starts_with("```") || line.starts_with('|') {
                return Err(error("doc strings and data tables are not supported"));
            }

            if line.starts_with("Background:") {
                if section == Section::Background || !background.is_empty() {
                    return Err(error("only one Background per feature"));
                }
                if !scenarios.is_empty() {
                    return Err(error("Background must come before the first Scenario"));
                }
                section = Section::Background;
                last_kind = None;
                continue;
            }

            if let Some(rest) = line
                .strip_prefix("Scenario:")
                .or_else(|| line.strip_prefix("Example:"))
            {
                scenarios.push(Scenario {
                    name: rest.trim().to_string(),
                    line: line_no,
                    steps: background.clone(),
                });
                section = Section::Scenario;
                last_kind = None;
                continue;
            }

            if let Some((keyword, text)) = split_step(line) {
                if section == Section::Description {
                    return Err(error("step outside of a Scenario or Background"));
                }
                if text.is_empty() {
                    return Err(error("step has no text"));
                }
                let kind = match StepKind::from_keyword(keyword) {
                    Some(kind) => kind,
                    None => last_kind.ok_or_else(|| {
                        error(&format!("'{keyword}' must follow a Given, When or Then step"))
                    })?,
                };
                last_kind = Some(kind);

                let step = Step {
                    keyword: keyword.to_string(),
                    kind,
                    text: text.to_string(),
                    line: line_no,
                };
                match section {
                    Section::Background => background.push(step),
                    Section::Scenario => {
                        if let Some(scenario) = scenarios.last_mut() {
                            scenario.steps.push(step);
                        }
                    }
                    Section::Preamble | Section::Description => unreachable!(),
                }
                continue;
            }

            if section == Section::Description {
                description.push(line.to_string());
                continue;
            }

            return Err(error(&format!("unexpected line: {line}")));
        }

        let name = name.ok_or(StepError::FeatureParse {
            line: source.lines().count().max(1),
            reason: "missing 'Feature:' header".to_string(),
        })?;

        Ok(Feature {
            name,
            description,
            scenarios,
        })
    }

    pub fn step_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.steps.len()).sum()
    }
}

fn split_step(line: &str) -> Option<(&str, &str)> {
    const KEYWORDS: [&str; 5] = ["Given", "When", "Then", "And", "But"];
    let (keyword, text) = match line.split_once(char::is_whitespace) {
        Some((keyword, text)) => (keyword, text.trim()),
        None => (line, ""),
    };
    KEYWORDS.contains(&keyword).then_some((keyword, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN: &str = r#"
@smoke
Feature: Login
  Users sign in with a username and password.

  Background:
    Given I am on the login page

  # happy path
  Scenario: Successful login
    When I enter username as "alice" and password as "secret123"
    Then I should see the dashboard page
    And I should see the dashboard page

  Scenario: Empty credentials
    When I enter username as "" and password as ""
    But I should see the dashboard page
"#;

    #[test]
    fn test_parse_feature_with_background() {
        let feature = Feature::parse(LOGIN).unwrap();
        assert_eq!(feature.name, "Login");
        assert_eq!(
            feature.description,
            ["Users sign in with a username and password."]
        );
        assert_eq!(feature.scenarios.len(), 2);
        assert_eq!(feature.step_count(), 7);

        let first = &feature.scenarios[0];
        assert_eq!(first.name, "Successful login");
        assert_eq!(first.steps[0].text, "I am on the login page");
        assert_eq!(first.steps[0].kind, StepKind::Given);
        assert_eq!(first.steps[3].keyword, "And");
        assert_eq!(first.steps[3].kind, StepKind::Then);

        let second = &feature.scenarios[1];
        assert_eq!(second.steps[0].text, "I am on the login page");
        assert_eq!(
            second.steps[1].text,
            r#"I enter username as "" and password as """#
        );
        assert_eq!(second.steps[2].kind, StepKind::When);
    }

    #[test]
    fn test_step_line_numbers() {
        let feature = Feature::parse("Feature: F\nScenario: S\n  Given a\n\n  Then b\n").unwrap();
        let lines: Vec<_> = feature.scenarios[0].steps.iter().map(|s| s.line).collect();
        assert_eq!(lines, [3, 5]);
    }

    fn parse_error_line(source: &str) -> usize {
        match Feature::parse(source) {
            Err(StepError::FeatureParse { line, .. }) => line,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_leading_and_is_rejected() {
        assert_eq!(parse_error_line("Feature: F\nScenario: S\n  And a\n"), 3);
    }

    #[test]
    fn test_missing_feature_header() {
        assert_eq!(parse_error_line("Scenario: S\n  Given a\n"), 1);
        assert_eq!(parse_error_line("# only a comment\n"), 1);
    }

    #[test]
    fn test_unsupported_constructs() {
        assert_eq!(
            parse_error_line("Feature: F\nScenario: S\n  Given a\n    | x |\n"),
            4
        );
        assert_eq!(parse_error_line("Feature: F\nScenario Outline: S\n"), 2);
        assert_eq!(
            parse_error_line("Feature: F\nScenario: S\n  Given a\n  \"\"\"\n"),
            4
        );
    }

    #[test]
    fn test_background_after_scenario_is_rejected() {
        assert_eq!(
            parse_error_line("Feature: F\nScenario: S\n  Given a\nBackground:\n  Given b\n"),
            4
        );
    }

    #[test]
    fn test_step_before_scenario_is_rejected() {
        assert_eq!(parse_error_line("Feature: F\n  Given a\n"), 2);
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = Feature::from_path("does/not/exist.feature").unwrap_err();
        assert!(matches!(err, StepError::Io { .. }));
    }
}
