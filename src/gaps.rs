//! Gap state machine: unresolved-gap detection and next-step resolution for a module.

use tracing::instrument;

use crate::fold::{IntentFolder, fold_intents};
use crate::types::{Branch, GapEntry, Intent, MappedOutput, ModuleData, ModuleStatus, StatusStep};

/// Folds to `true` when a gap without a resolution is found.
struct UnresolvedScan;

impl IntentFolder for UnresolvedScan {
  type Output = bool;

  fn leaf(&mut self, intent: &Intent) -> bool {
    intent.as_gap().is_some_and(|g| !g.is_resolved())
  }

  fn branch(&mut self, _: &Intent, _: &Branch, then: Vec<bool>, otherwise: Vec<bool>) -> bool {
    then.into_iter().chain(otherwise).any(|b| b)
  }
}

/// True iff at least one gap node, at any depth, lacks a `resolution`.
/// `None` and empty outputs have no gaps.
#[instrument(level = "trace", skip(mapped))]
pub fn has_unresolved_gaps(mapped: Option<&MappedOutput>) -> bool {
  let Some(mapped) = mapped else {
    return false;
  };
  mapped
    .procedures
    .iter()
    .any(|p| fold_intents(&mut UnresolvedScan, &p.intents).into_iter().any(|b| b))
}

/// Collects the ids of unresolved gaps.
#[derive(Default)]
struct UnresolvedIds(Vec<String>);

impl IntentFolder for UnresolvedIds {
  type Output = ();

  fn leaf(&mut self, intent: &Intent) {
    if let Some(gap) = intent.as_gap()
      && !gap.is_resolved()
      && let Some(id) = &gap.gap_id
    {
      self.0.push(id.clone());
    }
  }

  fn branch(&mut self, _: &Intent, _: &Branch, _: Vec<()>, _: Vec<()>) {}
}

/// Entries of `mapped.gaps` whose gap node has no resolution yet, in gap order.
pub fn unresolved_gaps(mapped: &MappedOutput) -> Vec<&GapEntry> {
  let mut ids = UnresolvedIds::default();
  for procedure in &mapped.procedures {
    fold_intents(&mut ids, &procedure.intents);
  }
  mapped
    .gaps
    .iter()
    .filter(|g| ids.0.contains(&g.gap_id))
    .collect()
}

/// Decides which step a module needs next, from whatever data it already holds.
#[instrument(level = "trace", skip(module))]
pub fn get_module_status(module: Option<&ModuleData>) -> ModuleStatus {
  let Some(module) = module else {
    return ModuleStatus::pending(StatusStep::Extract);
  };
  if module.intents.is_none() {
    return ModuleStatus::pending(StatusStep::Extract);
  }
  let Some(mapped) = module.mapped.as_deref() else {
    return ModuleStatus::pending(StatusStep::Map);
  };
  if has_unresolved_gaps(Some(mapped)) {
    return ModuleStatus::pending(StatusStep::ResolveGaps);
  }
  if module.generated_source.is_none() {
    return ModuleStatus::pending(StatusStep::Generate);
  }
  ModuleStatus::complete()
}
