//! Tests for the `map` classifier.

use proptest::prelude::*;
use regex::Regex;

use crate::classifier::{classify, recount};
use crate::types::{
  Classification, Condition, Intent, IntentKind, Mapping, MappedOutput, Procedure,
};

fn show(msg: &str) -> Intent {
  Intent::new(IntentKind::ShowMessage {
    message: msg.to_string(),
  })
}

fn blank(field: &str) -> Condition {
  Condition::FieldBlank {
    field: field.to_string(),
  }
}

fn gap_ids(mapped: &MappedOutput) -> Vec<String> {
  mapped.gaps.iter().map(|g| g.gap_id.clone()).collect()
}

#[test]
fn none_is_zero_procedures() {
  let mapped = classify(None);
  assert!(mapped.procedures.is_empty());
  assert_eq!(mapped.stats.total, 0);
  assert!(mapped.gaps.is_empty());
}

#[test]
fn show_message_and_gap() {
  let procs = vec![Procedure::new(
    "btnSave_Click",
    "click",
    vec![show("Saved"), Intent::gap("DoCmd.TransferText", "export")],
  )];
  let mapped = classify(Some(procs.as_slice()));
  assert_eq!(mapped.stats.total, 2);
  assert_eq!(mapped.stats.mechanical, 1);
  assert_eq!(mapped.stats.gap, 1);
  assert_eq!(gap_ids(&mapped), vec!["btnSave_Click:0"]);
  let intents = &mapped.procedures[0].intents;
  assert_eq!(intents[0].classification, Some(Classification::Mechanical));
  assert_eq!(intents[1].classification, Some(Classification::Gap));
  assert_eq!(
    intents[1].as_gap().unwrap().gap_id.as_deref(),
    Some("btnSave_Click:0")
  );
}

#[test]
fn gap_ids_count_gaps_only_and_descend_into_branches() {
  let procs = vec![Procedure::new(
    "Form_Load",
    "load",
    vec![
      show("a"),
      Intent::gap("x", "r0"),
      Intent::branch(
        blank("txtId"),
        vec![show("b"), Intent::gap("y", "r1")],
        vec![Intent::gap("z", "r2")],
      ),
      show("c"),
      Intent::gap("w", "r3"),
    ],
  )];
  let mapped = classify(Some(procs.as_slice()));
  assert_eq!(
    gap_ids(&mapped),
    vec!["Form_Load:0", "Form_Load:1", "Form_Load:2", "Form_Load:3"]
  );
  let reasons: Vec<&str> = mapped.gaps.iter().map(|g| g.reason.as_str()).collect();
  assert_eq!(reasons, vec!["r0", "r1", "r2", "r3"]);
  assert_eq!(mapped.stats.total, 7);
  assert_eq!(mapped.stats.gap, 4);
}

#[test]
fn counters_are_per_procedure() {
  let procs = vec![
    Procedure::new("a_Click", "click", vec![Intent::gap("x", "r")]),
    Procedure::new("b_Click", "click", vec![Intent::gap("y", "r")]),
  ];
  let mapped = classify(Some(procs.as_slice()));
  assert_eq!(gap_ids(&mapped), vec!["a_Click:0", "b_Click:0"]);
  assert_eq!(mapped.gaps[1].procedure, "b_Click");
}

#[test]
fn recount_rebuilds_lost_summary() {
  let procs = vec![Procedure::new(
    "Form_Load",
    "load",
    vec![
      show("a"),
      Intent::gap("x", "r0"),
      Intent::branch(blank("txtId"), vec![show("b")], vec![Intent::gap("z", "r1")]),
    ],
  )];
  let classified = classify(Some(procs.as_slice()));
  let mut stripped = classified.clone();
  stripped.stats = Default::default();
  stripped.gaps.clear();
  recount(&mut stripped);
  assert_eq!(stripped, classified);
  assert_eq!(stripped.stats.mechanical + stripped.stats.gap, stripped.stats.total);
}

#[test]
fn recount_numbers_gaps_missing_an_id() {
  let mut mapped = classify(Some(
    vec![Procedure::new(
      "p",
      "",
      vec![Intent::gap("x", "r"), Intent::gap("y", "s")],
    )]
    .as_slice(),
  ));
  if let IntentKind::Gap(g) = &mut mapped.procedures[0].intents[1].kind {
    g.gap_id = None;
  }
  recount(&mut mapped);
  assert_eq!(gap_ids(&mapped), vec!["p:0", "p:1"]);
  assert_eq!(mapped.stats.gap, 2);
  assert_eq!(
    mapped.procedures[0].intents[1].as_gap().unwrap().gap_id.as_deref(),
    Some("p:1")
  );
}

#[test]
fn branch_is_gap_iff_descendant_is_gap() {
  let procs = vec![Procedure::new(
    "p",
    "",
    vec![
      Intent::branch(blank("f"), vec![show("ok")], vec![]),
      Intent::branch(
        blank("f"),
        vec![Intent::branch(blank("g"), vec![], vec![Intent::gap("q", "deep")])],
        vec![],
      ),
    ],
  )];
  let mapped = classify(Some(procs.as_slice()));
  let intents = &mapped.procedures[0].intents;
  assert_eq!(intents[0].classification, Some(Classification::Mechanical));
  assert_eq!(intents[1].classification, Some(Classification::Gap));
  let IntentKind::Branch(b) = &intents[0].kind else {
    panic!("expected branch");
  };
  assert_eq!(b.mapping, Some(Mapping::structural()));
  // Branches are not counted; only their leaves.
  assert_eq!(mapped.stats.total, 2);
}

#[test]
fn rerun_is_stable() {
  let procs = vec![Procedure::new(
    "p",
    "",
    vec![show("a"), Intent::gap("x", "r"), Intent::gap("y", "s")],
  )];
  let first = classify(Some(procs.as_slice()));
  let reclassified: Vec<Procedure> = first
    .procedures
    .iter()
    .map(|p| Procedure::new(p.name.clone(), p.trigger.clone(), p.intents.clone()))
    .collect();
  let second = classify(Some(reclassified.as_slice()));
  assert_eq!(first, second);
}

#[test]
fn resolution_survives_classification() {
  let mut gap = Intent::gap("x", "r");
  if let IntentKind::Gap(g) = &mut gap.kind {
    g.resolution = Some(crate::types::Resolution::now("done", "user"));
  }
  let procs = vec![Procedure::new("p", "", vec![gap])];
  let mapped = classify(Some(procs.as_slice()));
  let g = mapped.procedures[0].intents[0].as_gap().unwrap();
  assert!(g.is_resolved());
  assert_eq!(mapped.stats.gap, 1);
}

fn leaf() -> impl Strategy<Value = Intent> {
  prop_oneof![
    Just(Intent::new(IntentKind::SaveRecord)),
    Just(Intent::new(IntentKind::Requery)),
    "[a-z]{1,8}".prop_map(|m| show(&m)),
    "[a-z]{1,8}".prop_map(|l| Intent::gap(l, "unmapped")),
  ]
}

fn intent_tree() -> impl Strategy<Value = Intent> {
  leaf().prop_recursive(3, 24, 4, |inner| {
    (
      prop::collection::vec(inner.clone(), 0..4),
      prop::collection::vec(inner, 0..4),
    )
      .prop_map(|(then, otherwise)| Intent::branch(Condition::NewRecord, then, otherwise))
  })
}

fn procedures() -> impl Strategy<Value = Vec<Procedure>> {
  prop::collection::vec(
    ("[A-Za-z]{1,6}_[A-Za-z]{1,6}", prop::collection::vec(intent_tree(), 0..6)),
    0..4,
  )
  .prop_map(|procs| {
    procs
      .into_iter()
      .map(|(name, intents)| Procedure::new(name, "", intents))
      .collect()
  })
}

proptest! {
  #[test]
  fn stats_add_up(procs in procedures()) {
    let mapped = classify(Some(procs.as_slice()));
    prop_assert_eq!(mapped.stats.mechanical + mapped.stats.gap, mapped.stats.total);
    prop_assert_eq!(mapped.gaps.len(), mapped.stats.gap);
  }

  #[test]
  fn gap_ids_are_sequential_per_procedure(procs in procedures()) {
    let mapped = classify(Some(procs.as_slice()));
    for procedure in &mapped.procedures {
      let pattern = Regex::new(&format!("^{}:(\\d+)$", regex::escape(&procedure.name))).unwrap();
      let ks: Vec<usize> = mapped
        .gaps
        .iter()
        .filter(|g| g.procedure == procedure.name)
        .map(|g| {
          let caps = pattern.captures(&g.gap_id).expect("gap id format");
          caps[1].parse().unwrap()
        })
        .collect();
      let expected: Vec<usize> = (0..ks.len()).collect();
      prop_assert_eq!(ks, expected);
    }
  }
}
