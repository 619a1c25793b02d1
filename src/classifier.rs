//! Deterministic classifier behind the `map` step.
//!
//! Walks each procedure's intents depth-first, marks every node `mechanical` or `gap`,
//! numbers gap nodes per procedure (`"<procedure>:<k>"`), and aggregates stats and the
//! flat gap list in the same order the ids were assigned.

use tracing::{debug, instrument};

use crate::fold::{IntentFolder, fold_intents, for_each_gap_mut};
use crate::types::{
  Branch, Classification, GapEntry, Intent, IntentKind, MapStats, MappedOutput, MappedProcedure,
  Mapping, Procedure,
};

/// Classifies one procedure at a time; the gap counter is scoped to `procedure`.
struct Classifier<'a> {
  procedure: &'a str,
  next_gap: usize,
  stats: MapStats,
  gaps: Vec<GapEntry>,
}

impl<'a> Classifier<'a> {
  fn new(procedure: &'a str) -> Self {
    Self {
      procedure,
      next_gap: 0,
      stats: MapStats::default(),
      gaps: Vec::new(),
    }
  }
}

impl IntentFolder for Classifier<'_> {
  type Output = Intent;

  fn leaf(&mut self, intent: &Intent) -> Intent {
    let mut out = intent.clone();
    self.stats.total += 1;
    match &mut out.kind {
      IntentKind::Gap(gap) => {
        let gap_id = format!("{}:{}", self.procedure, self.next_gap);
        self.next_gap += 1;
        self.stats.gap += 1;
        self.gaps.push(GapEntry {
          procedure: self.procedure.to_string(),
          gap_id: gap_id.clone(),
          vba_line: gap.vba_line.clone(),
          reason: gap.reason.clone(),
        });
        gap.gap_id = Some(gap_id);
        out.classification = Some(Classification::Gap);
      }
      _ => {
        self.stats.mechanical += 1;
        out.classification = Some(Classification::Mechanical);
      }
    }
    out
  }

  fn branch(
    &mut self,
    _intent: &Intent,
    branch: &Branch,
    then: Vec<Intent>,
    otherwise: Vec<Intent>,
  ) -> Intent {
    let has_gap = then
      .iter()
      .chain(otherwise.iter())
      .any(|i| i.classification == Some(Classification::Gap));
    let classification = if has_gap {
      Classification::Gap
    } else {
      Classification::Mechanical
    };
    Intent {
      kind: IntentKind::Branch(Branch {
        condition: branch.condition.clone(),
        then,
        otherwise,
        mapping: Some(branch.mapping.clone().unwrap_or_else(Mapping::structural)),
      }),
      classification: Some(classification),
    }
  }
}

/// Classifies extracted procedures. `None` is treated as zero procedures.
#[instrument(level = "trace", skip(procedures))]
pub fn classify(procedures: Option<&[Procedure]>) -> MappedOutput {
  let mut out = MappedOutput::default();
  for procedure in procedures.unwrap_or_default() {
    let mut classifier = Classifier::new(&procedure.name);
    let intents = fold_intents(&mut classifier, &procedure.intents);
    out.stats.total += classifier.stats.total;
    out.stats.mechanical += classifier.stats.mechanical;
    out.stats.gap += classifier.stats.gap;
    out.gaps.append(&mut classifier.gaps);
    out.procedures.push(MappedProcedure {
      name: procedure.name.clone(),
      trigger: procedure.trigger.clone(),
      intents,
    });
  }
  debug!(
    procedures = out.procedures.len(),
    total = out.stats.total,
    mechanical = out.stats.mechanical,
    gap = out.stats.gap,
    "classified intents"
  );
  out
}

/// Counts non-branch nodes.
struct Leaves;

impl IntentFolder for Leaves {
  type Output = usize;

  fn leaf(&mut self, _: &Intent) -> usize {
    1
  }

  fn branch(&mut self, _: &Intent, _: &Branch, then: Vec<usize>, otherwise: Vec<usize>) -> usize {
    then.into_iter().chain(otherwise).sum()
  }
}

/// Rebuilds `stats` and `gaps` from an already classified tree whose summary was lost.
///
/// Existing gap ids are kept; a gap without one gets `"<procedure>:<k>"` for its position.
#[instrument(level = "trace", skip(mapped))]
pub fn recount(mapped: &mut MappedOutput) {
  let mut stats = MapStats::default();
  let mut gaps = Vec::new();
  for procedure in &mut mapped.procedures {
    stats.total += fold_intents(&mut Leaves, &procedure.intents)
      .into_iter()
      .sum::<usize>();
    let name = procedure.name.clone();
    let mut position = 0;
    for_each_gap_mut(&mut procedure.intents, &mut |gap| {
      let gap_id = gap
        .gap_id
        .get_or_insert_with(|| format!("{}:{}", name, position))
        .clone();
      position += 1;
      gaps.push(GapEntry {
        procedure: name.clone(),
        gap_id,
        vba_line: gap.vba_line.clone(),
        reason: gap.reason.clone(),
      });
    });
  }
  stats.gap = gaps.len();
  stats.mechanical = stats.total - stats.gap;
  debug!(total = stats.total, gap = stats.gap, "recounted mapped output");
  mapped.stats = stats;
  mapped.gaps = gaps;
}
