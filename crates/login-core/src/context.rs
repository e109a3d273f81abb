//! Scenario context threaded through every step of one scenario

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type ScenarioId = Uuid;

/// Pages a scenario can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Login,
}

/// Credentials as typed into the login form. Never validated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Destination for the lines steps emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    Captured(Vec<String>),
}

/// State shared by the steps of a single scenario.
///
/// Created by the runner at scenario start and dropped at scenario end;
/// nothing carries over between scenarios.
pub struct ScenarioContext {
    pub id: ScenarioId,
    /// Set by steps that navigate.
    pub page: Option<Page>,
    /// Last credentials entered. Overwritten on every entry.
    pub credentials: Option<Credentials>,
    pub output: Output,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::with_output(Output::Stdout)
    }

    /// A context whose step lines are collected instead of printed.
    pub fn captured() -> Self {
        Self::with_output(Output::Captured(Vec::new()))
    }

    pub fn with_output(output: Output) -> Self {
        Self {
            id: Uuid::new_v4(),
            page: None,
            credentials: None,
            output,
        }
    }

    /// Writes one line to the scenario output.
    pub fn emit(&mut self, line: impl Into<String>) {
        let line = line.into();
        match &mut self.output {
            Output::Stdout => println!("{line}"),
            Output::Captured(lines) => lines.push(line),
        }
    }

    /// Lines collected so far; always empty for stdout contexts.
    pub fn lines(&self) -> &[String] {
        match &self.output {
            Output::Stdout => &[],
            Output::Captured(lines) => lines,
        }
    }

    /// Removes and returns the collected lines.
    pub fn take_lines(&mut self) -> Vec<String> {
        match &mut self.output {
            Output::Stdout => Vec::new(),
            Output::Captured(lines) => std::mem::take(lines),
        }
    }
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = match &self.output {
            Output::Stdout => "stdout".to_string(),
            Output::Captured(lines) => format!("captured({} lines)", lines.len()),
        };
        f.debug_struct("ScenarioContext")
            .field("id", &self.id)
            .field("page", &self.page)
            .field("credentials", &self.credentials)
            .field("output", &output)
            .finish()
    }
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_context_collects_lines() {
        let mut ctx = ScenarioContext::captured();
        ctx.emit("first");
        ctx.emit(String::from("second"));
        assert_eq!(ctx.lines(), ["first", "second"]);

        let taken = ctx.take_lines();
        assert_eq!(taken, ["first", "second"]);
        assert!(ctx.lines().is_empty());
    }

    #[test]
    fn test_stdout_context_has_no_lines() {
        let mut ctx = ScenarioContext::new();
        ctx.emit("printed");
        assert!(ctx.lines().is_empty());
        assert_eq!(ctx.output, Output::Stdout);
    }

    #[test]
    fn test_fresh_contexts_are_distinct() {
        let a = ScenarioContext::captured();
        let b = ScenarioContext::captured();
        assert_ne!(a.id, b.id);
        assert!(a.page.is_none());
        assert!(a.credentials.is_none());
    }

    #[test]
    fn test_context_debug_hides_captured_lines() {
        let mut ctx = ScenarioContext::captured();
        ctx.credentials = Some(Credentials::new("alice", "secret123"));
        ctx.emit("Entering username: alice and password: secret123");

        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("captured(1 lines)"));
        assert!(!rendered.contains("secret123"));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "secret123");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secret123"));
    }
}
