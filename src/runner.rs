//! Pipeline runner: resolves strategies, runs steps in fixed order with skip rules, and
//! aggregates step results into a [RunResult].
//!
//! - [run_step]: run one step with its default or an overriding strategy.
//! - [run_pipeline]: run every step the accumulated data still needs.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::context::StepContext;
use crate::error::PipelineError;
use crate::gaps::{get_module_status, has_unresolved_gaps};
use crate::registry::{StepDefinition, get_step, step};
use crate::strategies::Strategy;
use crate::types::{ModuleData, RunResult, RunStatus, StepName, StepResult};

/// Step name to strategy name. Missing steps use their registry default.
pub type StrategyConfig = HashMap<String, String>;

async fn execute(
  definition: &StepDefinition,
  strategy: &dyn Strategy,
  input: &ModuleData,
  context: &StepContext,
) -> Result<StepResult, PipelineError> {
  let started = Instant::now();
  let result = strategy
    .run(input, context)
    .await
    .map_err(|source| PipelineError::StrategyExecution {
      step: definition.name,
      strategy: strategy.name(),
      source,
    })?;
  let duration = started.elapsed();
  info!(
    step = %definition.name,
    strategy = %strategy.name(),
    duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
    "step completed"
  );
  Ok(StepResult {
    step: definition.name,
    strategy: strategy.name(),
    result,
    duration,
  })
}

/// Runs one step. Unknown step or strategy names fail before anything executes.
#[instrument(level = "trace", skip(input, context))]
pub async fn run_step(
  step_name: &str,
  input: &ModuleData,
  context: &StepContext,
  strategy: Option<&str>,
) -> Result<StepResult, PipelineError> {
  let definition = get_step(step_name)?;
  let strategy = definition.resolve(strategy)?;
  execute(definition, strategy, input, context).await
}

/// Resolves the strategy for every step up front so config errors abort before any work.
fn plan(config: &StrategyConfig) -> Result<Vec<(StepName, &'static dyn Strategy)>, PipelineError> {
  for (step_name, strategy) in config {
    get_step(step_name)?.resolve(Some(strategy))?;
  }
  StepName::ALL
    .into_iter()
    .map(|name| {
      let chosen = config.get(name.as_str()).map(String::as_str);
      Ok((name, step(name).resolve(chosen)?))
    })
    .collect()
}

/// Whether `step_name` still has work to do given the accumulator.
fn should_run(step_name: StepName, data: &ModuleData) -> bool {
  match step_name {
    StepName::Extract => data.intents.is_none() && data.mapped.is_none(),
    StepName::Map => data.mapped.is_none(),
    // The tree is checked too: persisted `stats` may be missing or stale.
    StepName::GapQuestions | StepName::ResolveGaps => data
      .mapped
      .as_deref()
      .is_some_and(|m| m.has_gaps() || has_unresolved_gaps(Some(m))),
    StepName::Generate => true,
  }
}

/// Runs the pipeline from `initial`, skipping steps whose output is already present.
///
/// Returns `Err` only for unknown step/strategy names in `config`. A failing strategy ends
/// the run with `status: failed`, the results completed so far, and the error message.
#[instrument(level = "trace", skip(initial, context, config))]
pub async fn run_pipeline(
  initial: ModuleData,
  context: &StepContext,
  config: &StrategyConfig,
) -> Result<RunResult, PipelineError> {
  let plan = plan(config)?;
  let mut data = initial;
  let mut results = Vec::new();

  for (step_name, strategy) in plan {
    if !should_run(step_name, &data) {
      debug!(step = %step_name, "skipping step");
      continue;
    }
    match execute(step(step_name), strategy, &data, context).await {
      Ok(result) => {
        data.merge(&result.result);
        results.push(result);
      }
      Err(e) => {
        warn!(step = %step_name, error = %e, "pipeline run failed");
        return Ok(RunResult {
          status: RunStatus::Failed,
          results,
          module_status: get_module_status(Some(&data)),
          error: Some(e.to_string()),
          data,
        });
      }
    }
  }

  let module_status = get_module_status(Some(&data));
  info!(
    steps = results.len(),
    next = %module_status.step,
    "pipeline run complete"
  );
  Ok(RunResult {
    status: RunStatus::Complete,
    results,
    module_status,
    error: None,
    data,
  })
}
