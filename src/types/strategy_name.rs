//! Names of the strategies that can be registered for a step.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
  Llm,
  Mock,
  Deterministic,
  Skip,
  Auto,
  Full,
  Mechanical,
}

impl StrategyName {
  pub const ALL: [StrategyName; 7] = [
    StrategyName::Llm,
    StrategyName::Mock,
    StrategyName::Deterministic,
    StrategyName::Skip,
    StrategyName::Auto,
    StrategyName::Full,
    StrategyName::Mechanical,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      StrategyName::Llm => "llm",
      StrategyName::Mock => "mock",
      StrategyName::Deterministic => "deterministic",
      StrategyName::Skip => "skip",
      StrategyName::Auto => "auto",
      StrategyName::Full => "full",
      StrategyName::Mechanical => "mechanical",
    }
  }

  /// Parses a wire name; `None` if no strategy anywhere carries it.
  pub fn parse(s: &str) -> Option<StrategyName> {
    StrategyName::ALL.into_iter().find(|n| n.as_str() == s)
  }
}

impl fmt::Display for StrategyName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
