use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use step_registry::{Feature, Runner, RunnerConfig, ScenarioStatus, StepRegistry};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "login-steps")]
#[command(about = "Login Steps CLI - Run login feature files against the step registry")]
#[command(version = login_core::VERSION)]
struct Cli {
    /// Log filter, e.g. `debug` or `step_registry=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered steps
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve every step in the given features without running them
    Check {
        #[arg(required = true)]
        features: Vec<PathBuf>,
    },
    /// Run the given features
    Run {
        #[arg(required = true)]
        features: Vec<PathBuf>,
        /// Stop after the first failing scenario; the rest count as skipped
        #[arg(long)]
        fail_fast: bool,
        /// Print step output per scenario once it finishes
        #[arg(long)]
        capture: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    info!("Starting {}", login_core::BUILD_INFO);
    let registry = login_steps::registry().context("Failed to register login steps")?;
    debug!(?registry, "Registry ready");

    match cli.command {
        Commands::List { json } => handle_list(&registry, json),
        Commands::Check { features } => handle_check(registry, &features),
        Commands::Run {
            features,
            fail_fast,
            capture,
        } => handle_run(
            registry,
            &features,
            RunnerConfig {
                fail_fast,
                capture_output: capture,
            },
        ),
    }
}

fn init_tracing(log_level: Option<&str>) -> anyhow::Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).context("Invalid --log-level filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Feature> {
    Feature::from_path(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn handle_list(registry: &StepRegistry, json: bool) -> anyhow::Result<()> {
    let steps = registry.list();
    if json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
    } else {
        for step in steps {
            println!("{:<6} {}", step.kind, step.pattern);
        }
    }
    Ok(())
}

fn handle_check(registry: StepRegistry, paths: &[PathBuf]) -> anyhow::Result<()> {
    let runner = Runner::new(registry, RunnerConfig::default());
    let mut problems = 0;

    for path in paths {
        let feature = load(path)?;
        let failures = runner.check(&feature);
        for failure in &failures {
            eprintln!("{}:{}: {}", path.display(), failure.line, failure.error);
        }
        if failures.is_empty() {
            println!("{}: {} steps OK", path.display(), feature.step_count());
        }
        problems += failures.len();
    }

    if problems > 0 {
        bail!("{problems} step(s) could not be resolved");
    }
    Ok(())
}

fn handle_run(registry: StepRegistry, paths: &[PathBuf], config: RunnerConfig) -> anyhow::Result<()> {
    let features = paths
        .iter()
        .map(|path| load(path).map(|feature| (path, feature)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let runner = Runner::new(registry, config);
    let (mut passed, mut failed, mut skipped) = (0, 0, 0);

    for (path, feature) in &features {
        if failed > 0 && runner.config().fail_fast {
            skipped += feature.scenarios.len();
            continue;
        }

        let report = runner.run(feature);

        for scenario in &report.scenarios {
            if runner.config().capture_output && scenario.status != ScenarioStatus::Skipped {
                println!("# {}: {}", report.feature, scenario.name);
                for line in &scenario.output {
                    println!("{line}");
                }
            }
        }
        for (scenario, failure) in report.failures() {
            eprintln!(
                "FAILED {} ({}:{}): {}",
                scenario,
                path.display(),
                failure.line,
                failure.error
            );
        }

        passed += report.count(ScenarioStatus::Passed);
        failed += report.count(ScenarioStatus::Failed);
        skipped += report.count(ScenarioStatus::Skipped);
    }

    eprintln!("{passed} passed, {failed} failed, {skipped} skipped");
    if failed > 0 {
        bail!("{failed} scenario(s) failed");
    }
    Ok(())
}
