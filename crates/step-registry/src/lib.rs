//! # Step Registry
//!
//! Explicit binding of step patterns to handlers, plus the pieces needed to
//! drive them without an external runner: a parser for plain-text feature
//! files and a sequential scenario runner.
//!
//! Step text is never recorded in tracing fields; placeholder values such as
//! passwords reach only the step handlers.

pub use login_core;

mod feature;
mod registry;
mod runner;

pub use feature::{Feature, Scenario, Step};
pub use registry::{RegistryStats, StepDefinition, StepHandler, StepInfo, StepMatch, StepRegistry};
pub use runner::{
    FeatureReport, Runner, RunnerConfig, ScenarioReport, ScenarioStatus, StepFailure,
};

// Re-export core types for convenience
pub use login_core::{Captures, Output, Result, ScenarioContext, StepError, StepKind, StepPattern};
