//! Static step registry: the five steps, their strategies and defaults.

use once_cell::sync::Lazy;
use tracing::instrument;

use crate::error::PipelineError;
use crate::strategies::{
  AutoResolveGaps, DeterministicMap, FullGenerate, LlmExtract, LlmGapQuestions,
  MechanicalGenerate, MockExtract, SkipGapQuestions, SkipResolveGaps, Strategy,
};
use crate::types::{StepName, StrategyName};

/// One registered step.
pub struct StepDefinition {
  pub name: StepName,
  pub default_strategy: StrategyName,
  strategies: Vec<Box<dyn Strategy>>,
}

impl StepDefinition {
  fn new(name: StepName, default_strategy: StrategyName, strategies: Vec<Box<dyn Strategy>>) -> Self {
    Self {
      name,
      default_strategy,
      strategies,
    }
  }

  /// Registered strategy by name, if any.
  pub fn strategy(&self, name: StrategyName) -> Option<&dyn Strategy> {
    self
      .strategies
      .iter()
      .find(|s| s.name() == name)
      .map(|s| s.as_ref())
  }

  /// Strategy names in registration order.
  pub fn strategy_names(&self) -> Vec<&'static str> {
    self.strategies.iter().map(|s| s.name().as_str()).collect()
  }

  /// Resolves a wire name (or the default when `None`) to a registered strategy.
  pub fn resolve(&self, name: Option<&str>) -> Result<&dyn Strategy, PipelineError> {
    let unknown = || PipelineError::UnknownStrategy {
      step: self.name,
      strategy: name.unwrap_or_default().to_string(),
    };
    let wanted = match name {
      Some(n) => StrategyName::parse(n).ok_or_else(unknown)?,
      None => self.default_strategy,
    };
    self.strategy(wanted).ok_or_else(unknown)
  }
}

static REGISTRY: Lazy<Vec<StepDefinition>> = Lazy::new(|| {
  vec![
    StepDefinition::new(
      StepName::Extract,
      StrategyName::Llm,
      vec![Box::new(LlmExtract), Box::new(MockExtract)],
    ),
    StepDefinition::new(
      StepName::Map,
      StrategyName::Deterministic,
      vec![Box::new(DeterministicMap)],
    ),
    StepDefinition::new(
      StepName::GapQuestions,
      StrategyName::Llm,
      vec![Box::new(LlmGapQuestions), Box::new(SkipGapQuestions)],
    ),
    StepDefinition::new(
      StepName::ResolveGaps,
      StrategyName::Auto,
      vec![Box::new(AutoResolveGaps), Box::new(SkipResolveGaps)],
    ),
    StepDefinition::new(
      StepName::Generate,
      StrategyName::Full,
      vec![Box::new(FullGenerate), Box::new(MechanicalGenerate)],
    ),
  ]
});

/// Typed lookup; every [StepName] is registered.
pub fn step(name: StepName) -> &'static StepDefinition {
  REGISTRY
    .iter()
    .find(|d| d.name == name)
    .unwrap_or_else(|| unreachable!("step {} is not registered", name))
}

/// Looks up a step by wire name.
#[instrument(level = "trace")]
pub fn get_step(name: &str) -> Result<&'static StepDefinition, PipelineError> {
  let name: StepName = name.parse()?;
  Ok(step(name))
}

/// Strategy names registered for a step.
#[instrument(level = "trace")]
pub fn list_strategies(name: &str) -> Result<Vec<&'static str>, PipelineError> {
  Ok(get_step(name)?.strategy_names())
}
