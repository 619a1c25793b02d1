//! Error taxonomy for registry lookups and strategy execution.

use thiserror::Error;

use crate::types::{StepName, StrategyName};

/// Errors surfaced by the registry and the runner.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// Step name is not one of the five pipeline steps.
  #[error("unknown step: {0}")]
  UnknownStep(String),
  /// Strategy name is not registered for the step.
  #[error("unknown strategy '{strategy}' for step '{step}'")]
  UnknownStrategy { step: StepName, strategy: String },
  /// The strategy itself failed. The caller may retry; the core never does.
  #[error("step '{step}' failed with strategy '{strategy}': {source}")]
  StrategyExecution {
    step: StepName,
    strategy: StrategyName,
    #[source]
    source: StrategyError,
  },
}

impl PipelineError {
  /// True for caller bugs (unknown step/strategy), as opposed to execution failures.
  pub fn is_bad_request(&self) -> bool {
    matches!(
      self,
      PipelineError::UnknownStep(_) | PipelineError::UnknownStrategy { .. }
    )
  }
}

/// Failure raised inside a strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
  #[error("missing input: {0}")]
  MissingInput(&'static str),
  #[error("no agent command configured")]
  NoAgentCommand,
  #[error("agent failed: {0}")]
  Agent(String),
  #[error("invalid agent response: {0}")]
  InvalidResponse(String),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
