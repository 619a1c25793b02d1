//! Tests for `ModuleStatus`.

use super::{ModuleStatus, StatusState, StatusStep};

#[test]
fn display_steps() {
  assert_eq!(StatusStep::ResolveGaps.to_string(), "resolve-gaps");
  assert_eq!(StatusStep::Complete.to_string(), "complete");
  assert_eq!(StatusState::Pending.to_string(), "pending");
}

#[test]
fn pending_and_complete() {
  let p = ModuleStatus::pending(StatusStep::Map);
  assert_eq!(p.status, StatusState::Pending);
  assert!(!p.is_complete());
  assert!(ModuleStatus::complete().is_complete());
}

#[test]
fn serializes_as_step_and_status() {
  let v = serde_json::to_value(ModuleStatus::pending(StatusStep::ResolveGaps)).unwrap();
  assert_eq!(
    v,
    serde_json::json!({"step": "resolve-gaps", "status": "pending"})
  );
}
