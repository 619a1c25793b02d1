//! Output of the map step: classified procedures, aggregate stats and the flat gap list.

use serde::{Deserialize, Serialize};

use super::Intent;

/// Classified procedure. `intents` carry `classification` (and `gap_id` on gaps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedProcedure {
  pub name: String,
  #[serde(default)]
  pub trigger: String,
  #[serde(default)]
  pub intents: Vec<Intent>,
}

/// Leaf classification counts. Branch nodes are not counted themselves; their children are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapStats {
  pub total: usize,
  pub mechanical: usize,
  pub gap: usize,
}

/// Flattened view of one gap node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapEntry {
  pub procedure: String,
  pub gap_id: String,
  pub vba_line: String,
  pub reason: String,
}

/// Result of classifying all procedures of a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappedOutput {
  pub procedures: Vec<MappedProcedure>,
  pub stats: MapStats,
  pub gaps: Vec<GapEntry>,
}

impl MappedOutput {
  pub fn has_gaps(&self) -> bool {
    self.stats.gap > 0
  }
}
