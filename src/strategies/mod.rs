//! Strategy implementations, one per (step, strategy) pair.
//!
//! Every strategy satisfies the same contract: read the accumulated [ModuleData] plus the
//! [StepContext], return one [StepOutput]. Deterministic strategies never suspend; the
//! agent-backed ones await the external agent process.

mod extract;
mod gap_questions;
mod generate;
mod map;
pub mod recognizer;
mod resolve_gaps;
#[cfg(test)]
mod test_agent;

use async_trait::async_trait;

use crate::context::StepContext;
use crate::error::StrategyError;
use crate::types::{ModuleData, StepOutput, StrategyName};

pub use extract::{LlmExtract, MockExtract};
pub use gap_questions::{LlmGapQuestions, SkipGapQuestions};
pub use generate::{FullGenerate, MechanicalGenerate};
pub use map::DeterministicMap;
pub use resolve_gaps::{AutoResolveGaps, SkipResolveGaps};

/// One swappable implementation of a pipeline step.
#[async_trait]
pub trait Strategy: Send + Sync {
  /// Registry name of this strategy.
  fn name(&self) -> StrategyName;

  /// Runs the strategy against the accumulated module data.
  async fn run(&self, input: &ModuleData, context: &StepContext)
  -> Result<StepOutput, StrategyError>;
}
