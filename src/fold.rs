//! Generic depth-first fold over intent trees.
//!
//! The classifier, the generator and the gap scanner all walk the same recursive shape:
//! leaves in document order, and for each branch its `then` list before its `else` list.

use crate::types::{Branch, Gap, Intent, IntentKind};

/// Visitor driven by [fold_intent].
pub trait IntentFolder {
  type Output;

  /// Called for every non-branch intent.
  fn leaf(&mut self, intent: &Intent) -> Self::Output;

  /// Called after both child lists of a branch have been folded.
  fn branch(
    &mut self,
    intent: &Intent,
    branch: &Branch,
    then: Vec<Self::Output>,
    otherwise: Vec<Self::Output>,
  ) -> Self::Output;
}

/// Folds one intent, descending into branches.
pub fn fold_intent<F: IntentFolder>(folder: &mut F, intent: &Intent) -> F::Output {
  match &intent.kind {
    IntentKind::Branch(branch) => {
      let then = fold_intents(folder, &branch.then);
      let otherwise = fold_intents(folder, &branch.otherwise);
      folder.branch(intent, branch, then, otherwise)
    }
    _ => folder.leaf(intent),
  }
}

/// Folds a sequence of intents in order.
pub fn fold_intents<F: IntentFolder>(folder: &mut F, intents: &[Intent]) -> Vec<F::Output> {
  intents.iter().map(|i| fold_intent(folder, i)).collect()
}

/// Calls `f` on every gap node, mutably, in depth-first document order.
pub fn for_each_gap_mut(intents: &mut [Intent], f: &mut impl FnMut(&mut Gap)) {
  for intent in intents {
    match &mut intent.kind {
      IntentKind::Branch(branch) => {
        for_each_gap_mut(&mut branch.then, f);
        for_each_gap_mut(&mut branch.otherwise, f);
      }
      IntentKind::Gap(gap) => f(gap),
      _ => {}
    }
  }
}
