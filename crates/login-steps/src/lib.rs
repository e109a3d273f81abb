//! # Login Steps
//!
//! Step definitions for the login flow. Each step writes one line to the
//! scenario output and nothing else: there is no browser behind them and the
//! dashboard step does not verify anything.
//!
//! Steps are bound explicitly:
//!
//! ```
//! use step_registry::{ScenarioContext, StepKind, StepRegistry};
//!
//! let registry = StepRegistry::new();
//! login_steps::register(&registry).unwrap();
//!
//! let mut ctx = ScenarioContext::captured();
//! registry
//!     .execute(StepKind::Given, "I am on the login page", &mut ctx)
//!     .unwrap();
//! assert_eq!(ctx.lines(), ["Navigating to the login page."]);
//! ```

mod steps;

pub use steps::{
    enter_credentials, navigate_to_login_page, register, registry, show_dashboard,
    DASHBOARD_PAGE, ENTER_CREDENTIALS, LOGIN_PAGE,
};
