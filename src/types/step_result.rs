//! Step outputs and run results.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{
  GapQuestion, GenerateStats, MappedOutput, ModuleData, ModuleStatus, Procedure, StepName,
  StrategyName,
};

/// What a strategy produced. Each variant names the accumulator field it replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepOutput {
  Extracted {
    procedures: Vec<Procedure>,
  },
  Mapped {
    mapped: Arc<MappedOutput>,
  },
  Questions {
    questions: Vec<GapQuestion>,
  },
  /// `changed == false` means `mapped` is the caller's value, untouched.
  Resolved {
    mapped: Arc<MappedOutput>,
    changed: bool,
  },
  Generated {
    source: String,
    stats: GenerateStats,
  },
}

/// One executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
  pub step: StepName,
  pub strategy: StrategyName,
  pub result: StepOutput,
  pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
  Complete,
  Failed,
}

/// Result of [crate::runner::run_pipeline].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
  pub status: RunStatus,
  /// Results of the steps that ran, in order. On failure, only the completed ones.
  pub results: Vec<StepResult>,
  #[serde(rename = "moduleStatus")]
  pub module_status: ModuleStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Final accumulator.
  pub data: ModuleData,
}

impl RunResult {
  pub fn is_complete(&self) -> bool {
    self.status == RunStatus::Complete
  }

  /// Steps that actually ran, in order.
  pub fn steps(&self) -> Vec<StepName> {
    self.results.iter().map(|r| r.step).collect()
  }
}
