//! `map/deterministic`: the classifier as a strategy.

use std::sync::Arc;

use async_trait::async_trait;

use super::Strategy;
use crate::classifier::classify;
use crate::context::StepContext;
use crate::error::StrategyError;
use crate::types::{ModuleData, StepOutput, StrategyName};

pub struct DeterministicMap;

#[async_trait]
impl Strategy for DeterministicMap {
  fn name(&self) -> StrategyName {
    StrategyName::Deterministic
  }

  async fn run(
    &self,
    input: &ModuleData,
    _context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    let mapped = classify(input.intents.as_deref());
    Ok(StepOutput::Mapped {
      mapped: Arc::new(mapped),
    })
  }
}
