//! A legacy event procedure as produced by the extract step.

use serde::{Deserialize, Serialize};

use super::Intent;

/// One event procedure: its name (the grouping key), trigger and ordered intents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
  pub name: String,
  #[serde(default)]
  pub trigger: String,
  #[serde(default)]
  pub intents: Vec<Intent>,
}

impl Procedure {
  pub fn new(name: impl Into<String>, trigger: impl Into<String>, intents: Vec<Intent>) -> Self {
    Self {
      name: name.into(),
      trigger: trigger.into(),
      intents,
    }
  }
}
