//! Intents: the tagged, recursive units of behaviour extracted from a legacy procedure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification assigned by the map step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
  Mechanical,
  Gap,
}

/// One extracted unit of behaviour, optionally classified.
///
/// On the wire the kind is flattened, so an intent reads
/// `{"type": "save-record", "classification": "mechanical"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
  #[serde(flatten)]
  pub kind: IntentKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub classification: Option<Classification>,
}

impl Intent {
  pub fn new(kind: IntentKind) -> Self {
    Self {
      kind,
      classification: None,
    }
  }

  /// Builds an unclassified gap for a source fragment.
  pub fn gap(vba_line: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::new(IntentKind::Gap(Gap {
      vba_line: vba_line.into(),
      reason: reason.into(),
      gap_id: None,
      resolution: None,
    }))
  }

  pub fn branch(condition: Condition, then: Vec<Intent>, otherwise: Vec<Intent>) -> Self {
    Self::new(IntentKind::Branch(Branch {
      condition,
      then,
      otherwise,
      mapping: None,
    }))
  }

  pub fn is_gap(&self) -> bool {
    matches!(self.kind, IntentKind::Gap(_))
  }

  pub fn as_gap(&self) -> Option<&Gap> {
    match &self.kind {
      IntentKind::Gap(g) => Some(g),
      _ => None,
    }
  }
}

impl From<IntentKind> for Intent {
  fn from(kind: IntentKind) -> Self {
    Self::new(kind)
  }
}

/// Discriminated intent payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum IntentKind {
  ValidateRequired { field: String, message: String },
  SaveRecord,
  ShowMessage { message: String },
  SetValue { field: String, value: String },
  SetEnabled { control: String, enabled: bool },
  SetVisible { control: String, visible: bool },
  OpenForm { form: String },
  CloseForm,
  Requery,
  Branch(Branch),
  Gap(Gap),
}

impl IntentKind {
  /// Wire tag of this kind (e.g. `"save-record"`).
  pub fn type_name(&self) -> &'static str {
    match self {
      IntentKind::ValidateRequired { .. } => "validate-required",
      IntentKind::SaveRecord => "save-record",
      IntentKind::ShowMessage { .. } => "show-message",
      IntentKind::SetValue { .. } => "set-value",
      IntentKind::SetEnabled { .. } => "set-enabled",
      IntentKind::SetVisible { .. } => "set-visible",
      IntentKind::OpenForm { .. } => "open-form",
      IntentKind::CloseForm => "close-form",
      IntentKind::Requery => "requery",
      IntentKind::Branch(_) => "branch",
      IntentKind::Gap(_) => "gap",
    }
  }
}

/// Conditional with nested `then` / `else` intent sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
  pub condition: Condition,
  #[serde(default)]
  pub then: Vec<Intent>,
  #[serde(rename = "else", default)]
  pub otherwise: Vec<Intent>,
  /// Structural translation descriptor, set by the map step.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mapping: Option<Mapping>,
}

/// Branch condition, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Condition {
  FieldBlank { field: String },
  FieldEquals { field: String, value: String },
  Confirm { message: String },
  NewRecord,
}

/// Mapping descriptor attached to branches, e.g. `{"type": "structural", "target": null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
  #[serde(rename = "type")]
  pub mapping_type: String,
  pub target: Option<String>,
}

impl Mapping {
  pub fn structural() -> Self {
    Self {
      mapping_type: "structural".to_string(),
      target: None,
    }
  }
}

/// A construct that could not be translated mechanically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
  pub vba_line: String,
  pub reason: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gap_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resolution: Option<Resolution>,
}

impl Gap {
  pub fn is_resolved(&self) -> bool {
    self.resolution.is_some()
  }
}

/// Answer attached to a gap by a resolve-gaps strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
  pub answer: String,
  pub resolved_by: String,
  pub resolved_at: DateTime<Utc>,
}

impl Resolution {
  pub fn now(answer: impl Into<String>, resolved_by: impl Into<String>) -> Self {
    Self {
      answer: answer.into(),
      resolved_by: resolved_by.into(),
      resolved_at: Utc::now(),
    }
  }
}
