//! Tests for module load/save and shape normalization.

use serde_json::json;

use crate::gaps::get_module_status;
use crate::module_io::{ModuleIoError, load_answers, load_module, normalize_module, save_module};
use crate::types::{ModuleData, ModuleRecord, StatusStep};

fn mapped_json() -> serde_json::Value {
  json!({
    "procedures": [{"name": "p", "intents": [{"type": "save-record", "classification": "mechanical"}]}],
    "stats": {"total": 1, "mechanical": 1, "gap": 0},
    "gaps": []
  })
}

#[test]
fn intents_array_and_top_level_mapped() {
  let record = normalize_module(json!({
    "name": "Orders",
    "version": 3,
    "intents": [{"name": "p", "trigger": "click", "intents": []}],
    "mapped": mapped_json(),
    "generated_source": "(ns forms.orders)"
  }))
  .unwrap();
  assert_eq!(record.name, "Orders");
  assert_eq!(record.version, 3);
  assert_eq!(record.data.intents.as_ref().map(Vec::len), Some(1));
  assert_eq!(record.data.mapped.as_ref().unwrap().stats.total, 1);
  assert_eq!(get_module_status(Some(&record.data)).step, StatusStep::Complete);
}

#[test]
fn nested_mapped_under_intents() {
  let record = normalize_module(json!({
    "name": "Orders",
    "intents": {
      "procedures": [{"name": "p", "intents": []}],
      "mapped": mapped_json()
    }
  }))
  .unwrap();
  assert_eq!(record.data.intents.as_ref().map(Vec::len), Some(1));
  assert!(record.data.mapped.is_some());
  assert_eq!(get_module_status(Some(&record.data)).step, StatusStep::Generate);
}

#[test]
fn nested_mapped_wins_over_top_level() {
  let mut other = mapped_json();
  other["stats"]["total"] = json!(99);
  let record = normalize_module(json!({
    "name": "Orders",
    "intents": {"procedures": [], "mapped": mapped_json()},
    "mapped": other
  }))
  .unwrap();
  assert_eq!(record.data.mapped.as_ref().unwrap().stats.total, 1);
}

#[test]
fn generated_source_spellings() {
  for key in ["cljs_source", "cljsSource", "generated_source"] {
    let mut value = json!({"name": "Orders", "intents": [], "mapped": {}});
    value[key] = json!("(ns forms.orders)");
    let record = normalize_module(value).unwrap();
    assert_eq!(
      record.data.generated_source.as_deref(),
      Some("(ns forms.orders)"),
      "key {}",
      key
    );
  }
}

#[test]
fn null_fields_are_absent() {
  let record = normalize_module(json!({
    "name": "Orders",
    "intents": null,
    "mapped": null,
    "cljs_source": null
  }))
  .unwrap();
  assert_eq!(record.data, ModuleData::default());
  assert_eq!(get_module_status(Some(&record.data)).step, StatusStep::Extract);
}

#[test]
fn rejects_non_object() {
  assert!(matches!(
    normalize_module(json!([1, 2])),
    Err(ModuleIoError::Shape(_))
  ));
  assert!(matches!(
    normalize_module(json!({"name": "x", "intents": "nope"})),
    Err(ModuleIoError::Shape(_))
  ));
}

#[test]
fn save_load_roundtrip() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("orders.json");
  let mut record = ModuleRecord::new("Orders", ModuleData::from_source("Sub x()\nEnd Sub"));
  record.version = 2;
  save_module(&path, &record).unwrap();
  assert!(path.exists());
  let loaded = load_module(&path).unwrap();
  assert_eq!(loaded, record);
}

#[test]
fn load_missing_file_returns_error() {
  let dir = tempfile::tempdir().unwrap();
  let r = load_module(&dir.path().join("nonexistent.json"));
  assert!(matches!(r, Err(ModuleIoError::Io(_))));
}

#[test]
fn answers_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("answers.json");
  std::fs::write(&path, r#"{"p_Click:0": "use the export helper"}"#).unwrap();
  let answers = load_answers(&path).unwrap();
  assert_eq!(
    answers.get("p_Click:0").map(String::as_str),
    Some("use the export helper")
  );
}

#[test]
fn mapped_without_stats_is_recounted() {
  let record = normalize_module(json!({
    "name": "Orders",
    "intents": [],
    "mapped": {
      "procedures": [{"name": "p", "intents": [
        {"type": "save-record", "classification": "mechanical"},
        {"type": "gap", "vba_line": "DoCmd.TransferText", "reason": "export", "gap_id": "p:0", "classification": "gap"}
      ]}]
    }
  }))
  .unwrap();
  let mapped = record.data.mapped.as_deref().unwrap();
  assert_eq!(mapped.stats.total, 2);
  assert_eq!(mapped.stats.gap, 1);
  assert_eq!(mapped.stats.mechanical, 1);
  assert_eq!(mapped.gaps.len(), 1);
  assert_eq!(mapped.gaps[0].gap_id, "p:0");
  assert_eq!(get_module_status(Some(&record.data)).step, StatusStep::ResolveGaps);
}

#[test]
fn stored_stats_are_kept() {
  let mut mapped = mapped_json();
  mapped["stats"]["total"] = json!(5);
  let record = normalize_module(json!({"name": "Orders", "mapped": mapped})).unwrap();
  assert_eq!(record.data.mapped.as_ref().unwrap().stats.total, 5);
}
