//! # Login Core
//!
//! Shared types for the login step definitions: step kinds, step patterns,
//! the per-scenario context and the error taxonomy used by the registry and
//! the runner.

pub mod context;
pub mod error;
pub mod step;

pub use context::{Credentials, Output, Page, ScenarioContext, ScenarioId};
pub use error::{Result, StepError};
pub use step::{Captures, StepKind, StepPattern};

/// Current crate version for compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information for logs and `--version`
pub const BUILD_INFO: &str = concat!(
    "Login Steps ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);
