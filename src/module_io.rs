//! Module record load/save (JSON) and normalization of persisted shapes.
//!
//! Older records keep mapped data under `intents.mapped` and generated source under
//! `cljs_source` or `cljsSource`; everything is folded into [ModuleRecord] here so the
//! pipeline only ever sees the canonical shape.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::instrument;

use crate::classifier::recount;
use crate::types::ModuleRecord;

/// Keys that may hold generated source, in order of preference.
const GENERATED_SOURCE_KEYS: [&str; 3] = ["generated_source", "cljs_source", "cljsSource"];

#[derive(Debug, Error)]
pub enum ModuleIoError {
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  #[error("invalid module shape: {0}")]
  Shape(String),
}

fn non_null(v: Option<Value>) -> Option<Value> {
  v.filter(|v| !v.is_null())
}

/// Folds a persisted module (any known shape) into a [ModuleRecord].
#[instrument(level = "trace", skip(value))]
pub fn normalize_module(value: Value) -> Result<ModuleRecord, ModuleIoError> {
  let Value::Object(mut obj) = value else {
    return Err(ModuleIoError::Shape("module must be a JSON object".to_string()));
  };

  let mut nested_mapped = None;
  let intents = match non_null(obj.remove("intents")) {
    None => None,
    Some(Value::Array(items)) => Some(Value::Array(items)),
    Some(Value::Object(mut inner)) => {
      nested_mapped = non_null(inner.remove("mapped"));
      Some(non_null(inner.remove("procedures")).unwrap_or_else(|| Value::Array(Vec::new())))
    }
    Some(_) => {
      return Err(ModuleIoError::Shape(
        "intents must be an array or an object".to_string(),
      ));
    }
  };
  let top_mapped = non_null(obj.remove("mapped"));
  let mapped = nested_mapped.or(top_mapped);
  let missing_stats = mapped
    .as_ref()
    .is_some_and(|m| m.get("stats").is_none_or(Value::is_null));

  let mut generated = None;
  for key in GENERATED_SOURCE_KEYS {
    let v = non_null(obj.remove(key));
    if generated.is_none() {
      generated = v;
    }
  }

  let mut canonical = Map::new();
  for (k, v) in obj {
    canonical.insert(k, v);
  }
  if let Some(v) = intents {
    canonical.insert("intents".to_string(), v);
  }
  if let Some(v) = mapped {
    canonical.insert("mapped".to_string(), v);
  }
  if let Some(v) = generated {
    canonical.insert("generated_source".to_string(), v);
  }
  let mut record: ModuleRecord = serde_json::from_value(Value::Object(canonical))?;
  if missing_stats && let Some(mapped) = record.data.mapped.as_mut() {
    recount(Arc::make_mut(mapped));
  }
  Ok(record)
}

/// Loads and normalizes a module record from `path`.
#[instrument(level = "trace", skip(path))]
pub fn load_module(path: &Path) -> Result<ModuleRecord, ModuleIoError> {
  let bytes = std::fs::read(path)?;
  normalize_module(serde_json::from_slice(&bytes)?)
}

/// Saves a module record to `path` as pretty JSON, creating parent directories.
#[instrument(level = "trace", skip(path, record))]
pub fn save_module(path: &Path, record: &ModuleRecord) -> Result<(), ModuleIoError> {
  let json = serde_json::to_string_pretty(record)?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)?;
  Ok(())
}

/// Loads gap answers (`{"<gap_id>": "<answer>"}`) from `path`.
pub fn load_answers(path: &Path) -> Result<HashMap<String, String>, ModuleIoError> {
  let bytes = std::fs::read(path)?;
  Ok(serde_json::from_slice(&bytes)?)
}
