//! BDD Tests for step patterns

use cucumber::{given, then, when, World};
use login_core::{Captures, StepError, StepPattern};

#[derive(Debug, World)]
#[world(init = Self::new)]
struct PatternWorld {
    pattern: Option<StepPattern>,
    last_error: Option<StepError>,
    captures: Option<Captures>,
}

impl PatternWorld {
    fn new() -> Self {
        Self {
            pattern: None,
            last_error: None,
            captures: None,
        }
    }
}

#[given(expr = "the pattern {string}")]
async fn given_pattern(world: &mut PatternWorld, template: String) {
    match StepPattern::parse(&template) {
        Ok(pattern) => world.pattern = Some(pattern),
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "I match the line {string}")]
async fn when_match_line(world: &mut PatternWorld, line: String) {
    let pattern = world.pattern.as_ref().expect("pattern should be parsed");
    world.captures = pattern.captures(&line);
}

#[then("the line should match")]
async fn then_line_matches(world: &mut PatternWorld) {
    assert!(world.captures.is_some());
}

#[then("the line should not match")]
async fn then_line_does_not_match(world: &mut PatternWorld) {
    assert!(world.captures.is_none());
}

#[then(expr = "there should be {int} captures")]
async fn then_capture_count(world: &mut PatternWorld, expected: usize) {
    assert_eq!(world.captures.as_ref().unwrap().len(), expected);
}

#[then(expr = "the capture {string} should be {string}")]
async fn then_capture_is(world: &mut PatternWorld, name: String, expected: String) {
    let captures = world.captures.as_ref().unwrap();
    assert_eq!(captures.get(&name), Some(expected.as_str()));
}

#[then("the pattern should be invalid")]
async fn then_pattern_invalid(world: &mut PatternWorld) {
    assert!(matches!(
        world.last_error,
        Some(StepError::InvalidPattern { .. })
    ));
}

#[tokio::main]
async fn main() {
    PatternWorld::run("tests/features").await;
}
