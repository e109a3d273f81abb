use login_core::{Captures, Credentials, Page, Result, ScenarioContext, StepKind};
use step_registry::StepRegistry;
use tracing::{debug, info};

pub const LOGIN_PAGE: &str = "I am on the login page";
pub const ENTER_CREDENTIALS: &str =
    r#"I enter username as "{username}" and password as "{password}""#;
pub const DASHBOARD_PAGE: &str = "I should see the dashboard page";

/// `Given I am on the login page`
pub fn navigate_to_login_page(ctx: &mut ScenarioContext) {
    ctx.page = Some(Page::Login);
    ctx.emit("Navigating to the login page.");
}

/// `When I enter username as "..." and password as "..."`
///
/// Both values are taken verbatim; empty strings are fine.
pub fn enter_credentials(ctx: &mut ScenarioContext, username: &str, password: &str) {
    debug!(scenario = %ctx.id, username, "Recording attempted credentials");
    ctx.credentials = Some(Credentials::new(username, password));
    ctx.emit(format!(
        "Entering username: {username} and password: {password}"
    ));
}

/// `Then I should see the dashboard page`
pub fn show_dashboard(ctx: &mut ScenarioContext) {
    // TODO: assert on ctx.credentials once a login outcome is modelled.
    ctx.emit("Dashboard page displayed.");
}

fn capture<'a>(captures: &'a Captures, name: &str) -> &'a str {
    captures.get(name).unwrap_or_default()
}

/// Bind the three login steps into `registry`.
pub fn register(registry: &StepRegistry) -> Result<()> {
    registry.register(StepKind::Given, LOGIN_PAGE, |ctx, _| {
        navigate_to_login_page(ctx)
    })?;
    registry.register(StepKind::When, ENTER_CREDENTIALS, |ctx, captures| {
        enter_credentials(
            ctx,
            capture(captures, "username"),
            capture(captures, "password"),
        )
    })?;
    registry.register(StepKind::Then, DASHBOARD_PAGE, |ctx, _| show_dashboard(ctx))?;

    info!("Login steps registered");
    Ok(())
}

/// A fresh registry holding only the login steps.
pub fn registry() -> Result<StepRegistry> {
    let registry = StepRegistry::new();
    register(&registry)?;
    Ok(registry)
}
