//! Step Registry Implementation
//!
//! Binds step patterns to handlers per step kind and resolves scenario lines
//! back to exactly one handler.

use dashmap::DashMap;
use login_core::{Captures, Result, ScenarioContext, StepError, StepKind, StepPattern};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Callback bound to a step pattern.
pub type StepHandler = Arc<dyn Fn(&mut ScenarioContext, &Captures) + Send + Sync>;

/// A registered pattern and its handler
pub struct StepDefinition {
    pub kind: StepKind,
    pub pattern: StepPattern,
    handler: StepHandler,
}

impl StepDefinition {
    pub fn invoke(&self, ctx: &mut ScenarioContext, captures: &Captures) {
        (self.handler)(ctx, captures)
    }
}

impl std::fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// A resolved step line
#[derive(Debug, Clone)]
pub struct StepMatch {
    pub definition: Arc<StepDefinition>,
    pub captures: Captures,
}

/// Serialisable description of a registered step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    pub kind: StepKind,
    pub pattern: String,
    pub placeholders: Vec<String>,
}

/// Registered step counts for diagnostics
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub given: usize,
    pub when: usize,
    pub then: usize,
}

impl RegistryStats {
    pub fn total(&self) -> usize {
        self.given + self.when + self.then
    }
}

/// Explicit registry of step definitions, keyed by step kind.
///
/// Cloning shares the underlying definitions.
#[derive(Clone)]
pub struct StepRegistry {
    definitions: Arc<DashMap<StepKind, Vec<Arc<StepDefinition>>>>,
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("StepRegistry")
            .field("given_count", &stats.given)
            .field("when_count", &stats.when)
            .field("then_count", &stats.then)
            .finish()
    }
}

impl StepRegistry {
    pub fn new() -> Self {
        debug!("Initializing step registry");
        Self {
            definitions: Arc::new(DashMap::new()),
        }
    }

    /// Bind `pattern` to `handler` under `kind`.
    ///
    /// Pattern text must be unique within its kind.
    #[instrument(skip(self, handler))]
    pub fn register<F>(&self, kind: StepKind, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut ScenarioContext, &Captures) + Send + Sync + 'static,
    {
        let pattern = StepPattern::parse(pattern)?;

        let mut entry = self.definitions.entry(kind).or_default();
        if entry.iter().any(|def| def.pattern == pattern) {
            return Err(StepError::DuplicateStep {
                kind,
                pattern: pattern.as_str().to_string(),
            });
        }

        info!("Registered {} step '{}'", kind, pattern);
        entry.push(Arc::new(StepDefinition {
            kind,
            pattern,
            handler: Arc::new(handler),
        }));
        Ok(())
    }

    /// Resolve a step line to exactly one definition of `kind`.
    pub fn find(&self, kind: StepKind, text: &str) -> Result<StepMatch> {
        let mut matches: Vec<StepMatch> = self
            .definitions
            .get(&kind)
            .map(|defs| {
                defs.iter()
                    .filter_map(|def| {
                        def.pattern.captures(text).map(|captures| StepMatch {
                            definition: Arc::clone(def),
                            captures,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        match matches.len() {
            0 => Err(StepError::UndefinedStep {
                kind,
                text: text.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(StepError::AmbiguousStep {
                kind,
                text: text.to_string(),
                candidates: matches
                    .iter()
                    .map(|m| m.definition.pattern.as_str().to_string())
                    .collect(),
            }),
        }
    }

    /// Resolve a step line and run its handler against `ctx`.
    ///
    /// The step text carries placeholder values verbatim, so only the matched
    /// pattern is recorded.
    #[instrument(skip(self, text, ctx), fields(scenario = %ctx.id, pattern = tracing::field::Empty))]
    pub fn execute(&self, kind: StepKind, text: &str, ctx: &mut ScenarioContext) -> Result<()> {
        let step = self.find(kind, text)?;
        tracing::Span::current().record("pattern", step.definition.pattern.as_str());
        debug!("Running step '{}'", step.definition.pattern);
        step.definition.invoke(ctx, &step.captures);
        Ok(())
    }

    /// All registered steps, ordered by kind then pattern.
    pub fn list(&self) -> Vec<StepInfo> {
        let mut steps: Vec<StepInfo> = self
            .definitions
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .map(|def| StepInfo {
                        kind: def.kind,
                        pattern: def.pattern.as_str().to_string(),
                        placeholders: def.pattern.placeholders().to_vec(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        steps.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.pattern.cmp(&b.pattern)));
        steps
    }

    pub fn stats(&self) -> RegistryStats {
        let count = |kind: StepKind| self.definitions.get(&kind).map_or(0, |defs| defs.len());
        RegistryStats {
            given: count(StepKind::Given),
            when: count(StepKind::When),
            then: count(StepKind::Then),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stats().total() == 0
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}
