//! Sequential scenario runner
//!
//! Drives parsed features through a [`StepRegistry`], one fresh
//! [`ScenarioContext`] per scenario.

use crate::feature::{Feature, Scenario};
use crate::registry::StepRegistry;
use login_core::{Output, ScenarioContext, StepKind};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

/// Runner settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Skip the remaining scenarios after the first failure.
    pub fail_fast: bool,
    /// Collect step output into the report instead of printing it.
    pub capture_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
}

/// The step that stopped a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub kind: StepKind,
    pub text: String,
    pub line: usize,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub status: ScenarioStatus,
    pub steps_run: usize,
    pub steps_skipped: usize,
    pub failure: Option<StepFailure>,
    /// Captured step output; empty unless output is captured.
    pub output: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureReport {
    pub feature: String,
    pub scenarios: Vec<ScenarioReport>,
}

impl FeatureReport {
    pub fn count(&self, status: ScenarioStatus) -> usize {
        self.scenarios.iter().filter(|s| s.status == status).count()
    }

    pub fn passed(&self) -> bool {
        self.count(ScenarioStatus::Failed) == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &StepFailure)> {
        self.scenarios
            .iter()
            .filter_map(|s| s.failure.as_ref().map(|f| (s.name.as_str(), f)))
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    registry: StepRegistry,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(registry: StepRegistry, config: RunnerConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn run(&self, feature: &Feature) -> FeatureReport {
        let _span = info_span!("feature", name = %feature.name).entered();
        let mut scenarios = Vec::with_capacity(feature.scenarios.len());
        let mut stop = false;

        for scenario in &feature.scenarios {
            if stop {
                scenarios.push(skipped(scenario));
                continue;
            }
            let report = self.run_scenario(scenario);
            if report.status == ScenarioStatus::Failed && self.config.fail_fast {
                warn!("Stopping after failed scenario '{}'", scenario.name);
                stop = true;
            }
            scenarios.push(report);
        }

        let report = FeatureReport {
            feature: feature.name.clone(),
            scenarios,
        };
        info!(
            passed = report.count(ScenarioStatus::Passed),
            failed = report.count(ScenarioStatus::Failed),
            skipped = report.count(ScenarioStatus::Skipped),
            "Feature finished"
        );
        report
    }

    pub fn run_scenario(&self, scenario: &Scenario) -> ScenarioReport {
        let mut ctx = if self.config.capture_output {
            ScenarioContext::captured()
        } else {
            ScenarioContext::with_output(Output::Stdout)
        };
        let _span = info_span!("scenario", name = %scenario.name, id = %ctx.id).entered();

        let mut steps_run = 0;
        let mut failure = None;

        for step in &scenario.steps {
            match self.registry.execute(step.kind, &step.text, &mut ctx) {
                Ok(()) => steps_run += 1,
                Err(e) => {
                    warn!(line = step.line, kind = %step.kind, "Step failed");
                    failure = Some(StepFailure {
                        kind: step.kind,
                        text: step.text.clone(),
                        line: step.line,
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }

        let attempted = steps_run + usize::from(failure.is_some());
        ScenarioReport {
            name: scenario.name.clone(),
            status: if failure.is_some() {
                ScenarioStatus::Failed
            } else {
                ScenarioStatus::Passed
            },
            steps_run,
            steps_skipped: scenario.steps.len() - attempted,
            failure,
            output: ctx.take_lines(),
        }
    }

    /// Resolve every step without running any handler.
    pub fn check(&self, feature: &Feature) -> Vec<StepFailure> {
        feature
            .scenarios
            .iter()
            .flat_map(|scenario| scenario.steps.iter())
            .filter_map(|step| {
                self.registry
                    .find(step.kind, &step.text)
                    .err()
                    .map(|e| StepFailure {
                        kind: step.kind,
                        text: step.text.clone(),
                        line: step.line,
                        error: e.to_string(),
                    })
            })
            .collect()
    }
}

fn skipped(scenario: &Scenario) -> ScenarioReport {
    ScenarioReport {
        name: scenario.name.clone(),
        status: ScenarioStatus::Skipped,
        steps_run: 0,
        steps_skipped: scenario.steps.len(),
        failure: None,
        output: Vec::new(),
    }
}
