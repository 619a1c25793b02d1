//! Tests for `Intent` wire format.

use serde_json::json;

use super::{Classification, Condition, Intent, IntentKind, Resolution};

#[test]
fn unit_kind_reads_type_tag() {
  let i: Intent = serde_json::from_value(json!({"type": "save-record"})).unwrap();
  assert_eq!(i.kind, IntentKind::SaveRecord);
  assert_eq!(i.classification, None);
}

#[test]
fn classification_is_flattened_next_to_type() {
  let mut i = Intent::new(IntentKind::ShowMessage {
    message: "Saved".to_string(),
  });
  i.classification = Some(Classification::Mechanical);
  let v = serde_json::to_value(&i).unwrap();
  assert_eq!(
    v,
    json!({"type": "show-message", "message": "Saved", "classification": "mechanical"})
  );
}

#[test]
fn branch_uses_else_key() {
  let v = json!({
    "type": "branch",
    "condition": {"kind": "field-blank", "field": "txtName"},
    "then": [{"type": "show-message", "message": "Required"}],
    "else": [{"type": "save-record"}]
  });
  let i: Intent = serde_json::from_value(v).unwrap();
  let IntentKind::Branch(b) = &i.kind else {
    panic!("expected branch");
  };
  assert_eq!(
    b.condition,
    Condition::FieldBlank {
      field: "txtName".to_string()
    }
  );
  assert_eq!(b.then.len(), 1);
  assert_eq!(b.otherwise, vec![Intent::new(IntentKind::SaveRecord)]);
  assert!(b.mapping.is_none());
}

#[test]
fn gap_round_trips_resolution() {
  let mut i = Intent::gap("DoCmd.TransferText acExport", "file export");
  if let IntentKind::Gap(g) = &mut i.kind {
    g.gap_id = Some("btnExport_Click:0".to_string());
    g.resolution = Some(Resolution::now("use the download helper", "user"));
  }
  let text = serde_json::to_string(&i).unwrap();
  let back: Intent = serde_json::from_str(&text).unwrap();
  let gap = back.as_gap().unwrap();
  assert_eq!(gap.gap_id.as_deref(), Some("btnExport_Click:0"));
  assert!(gap.is_resolved());
  assert_eq!(gap.resolution.as_ref().unwrap().resolved_by, "user");
}

#[test]
fn type_name_matches_wire_tag() {
  let kinds = vec![
    IntentKind::SaveRecord,
    IntentKind::CloseForm,
    IntentKind::OpenForm {
      form: "Orders".to_string(),
    },
  ];
  for kind in kinds {
    let v = serde_json::to_value(Intent::new(kind.clone())).unwrap();
    assert_eq!(v["type"], kind.type_name());
  }
}

#[test]
fn unknown_type_is_rejected() {
  let r: Result<Intent, _> = serde_json::from_value(json!({"type": "teleport"}));
  assert!(r.is_err());
}
