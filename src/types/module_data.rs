//! Canonical module shape: the pipeline accumulator and its persisted record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
  GapQuestion, GenerateStats, MappedOutput, ModuleStatus, Procedure, RunResult, RunStatus,
  StepOutput,
};

/// Accumulated pipeline data for one module. Seeded by the caller, grown step by step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleData {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub intents: Option<Vec<Procedure>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mapped: Option<Arc<MappedOutput>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub questions: Option<Vec<GapQuestion>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub generated_source: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub generate_stats: Option<GenerateStats>,
}

impl ModuleData {
  pub fn from_source(source: impl Into<String>) -> Self {
    Self {
      source: Some(source.into()),
      ..Self::default()
    }
  }

  /// Merges the one field a step output carries.
  pub fn merge(&mut self, output: &StepOutput) {
    match output {
      StepOutput::Extracted { procedures } => self.intents = Some(procedures.clone()),
      StepOutput::Mapped { mapped } => self.mapped = Some(Arc::clone(mapped)),
      StepOutput::Questions { questions } => self.questions = Some(questions.clone()),
      StepOutput::Resolved { mapped, changed } => {
        if *changed {
          self.mapped = Some(Arc::clone(mapped));
        }
      }
      StepOutput::Generated { source, stats } => {
        self.generated_source = Some(source.clone());
        self.generate_stats = Some(*stats);
      }
    }
  }
}

/// Persisted module: identity, version and status around the canonical data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
  pub name: String,
  #[serde(default)]
  pub version: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<ModuleStatus>,
  #[serde(flatten)]
  pub data: ModuleData,
}

impl ModuleRecord {
  pub fn new(name: impl Into<String>, data: ModuleData) -> Self {
    Self {
      name: name.into(),
      version: 0,
      status: None,
      data,
    }
  }

  /// Supersedes the record's pipeline fields with a finished run's data and bumps the version.
  /// Failed runs only refresh `status`; their partial data is not persisted.
  pub fn apply_run(&mut self, run: &RunResult) {
    if run.status == RunStatus::Complete {
      let source = self.data.source.take();
      self.data = run.data.clone();
      if self.data.source.is_none() {
        self.data.source = source;
      }
      self.version += 1;
    }
    self.status = Some(run.module_status);
  }
}
