//! Output of the generate step.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStats {
  pub total_procedures: usize,
  pub mechanical_count: usize,
  pub gap_count: usize,
}

/// Generated target source plus counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedOutput {
  pub source: String,
  pub stats: GenerateStats,
}
