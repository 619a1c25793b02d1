//! Where a module stands in the pipeline: next step and whether work remains.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Next step to run, or `complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusStep {
  Extract,
  Map,
  ResolveGaps,
  Generate,
  Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
  Pending,
  Complete,
}

/// Result of [crate::gaps::get_module_status].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStatus {
  pub step: StatusStep,
  pub status: StatusState,
}

impl ModuleStatus {
  pub fn pending(step: StatusStep) -> Self {
    Self {
      step,
      status: StatusState::Pending,
    }
  }

  pub fn complete() -> Self {
    Self {
      step: StatusStep::Complete,
      status: StatusState::Complete,
    }
  }

  pub fn is_complete(&self) -> bool {
    self.status == StatusState::Complete
  }
}

impl fmt::Display for StatusStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StatusStep::Extract => write!(f, "extract"),
      StatusStep::Map => write!(f, "map"),
      StatusStep::ResolveGaps => write!(f, "resolve-gaps"),
      StatusStep::Generate => write!(f, "generate"),
      StatusStep::Complete => write!(f, "complete"),
    }
  }
}

impl fmt::Display for StatusState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StatusState::Pending => write!(f, "pending"),
      StatusState::Complete => write!(f, "complete"),
    }
  }
}
