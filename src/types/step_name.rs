//! The five pipeline steps, in execution order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// One stage of the fixed pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepName {
  Extract,
  Map,
  GapQuestions,
  ResolveGaps,
  Generate,
}

impl StepName {
  /// Fixed execution order.
  pub const ALL: [StepName; 5] = [
    StepName::Extract,
    StepName::Map,
    StepName::GapQuestions,
    StepName::ResolveGaps,
    StepName::Generate,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      StepName::Extract => "extract",
      StepName::Map => "map",
      StepName::GapQuestions => "gap-questions",
      StepName::ResolveGaps => "resolve-gaps",
      StepName::Generate => "generate",
    }
  }
}

impl fmt::Display for StepName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StepName {
  type Err = PipelineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    StepName::ALL
      .into_iter()
      .find(|step| step.as_str() == s)
      .ok_or_else(|| PipelineError::UnknownStep(s.to_string()))
  }
}
