//! `resolve-gaps` strategies.
//!
//! Resolutions are attached by `gap_id`. Ids are stable as long as the set of gaps ahead of
//! them in a procedure does not change, so answers must be collected against the mapped
//! output they are applied to.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::Strategy;
use crate::context::StepContext;
use crate::error::StrategyError;
use crate::fold::for_each_gap_mut;
use crate::types::{MappedOutput, ModuleData, Resolution, StepOutput, StrategyName};

/// `resolved_by` for answers supplied by the caller.
pub const RESOLVED_BY_USER: &str = "user";
/// `resolved_by` for suggestions adopted without a human.
pub const RESOLVED_BY_AUTO: &str = "auto";

fn mapped_of(input: &ModuleData) -> Result<&Arc<MappedOutput>, StrategyError> {
  input
    .mapped
    .as_ref()
    .ok_or(StrategyError::MissingInput("mapped"))
}

/// Passthrough: hands back the caller's `mapped` itself, flagged unchanged.
pub struct SkipResolveGaps;

#[async_trait]
impl Strategy for SkipResolveGaps {
  fn name(&self) -> StrategyName {
    StrategyName::Skip
  }

  async fn run(
    &self,
    input: &ModuleData,
    _context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    Ok(StepOutput::Resolved {
      mapped: Arc::clone(mapped_of(input)?),
      changed: false,
    })
  }
}

/// Best-effort resolver: caller answers first, then suggested answers from gap questions.
pub struct AutoResolveGaps;

/// Attaches resolutions to unresolved gaps; returns how many were attached.
pub(crate) fn attach_resolutions(
  mapped: &mut MappedOutput,
  answers: &HashMap<String, (String, &'static str)>,
) -> usize {
  let mut attached = 0;
  for procedure in &mut mapped.procedures {
    for_each_gap_mut(&mut procedure.intents, &mut |gap| {
      if gap.is_resolved() {
        return;
      }
      let Some((answer, by)) = gap.gap_id.as_ref().and_then(|id| answers.get(id)) else {
        return;
      };
      gap.resolution = Some(Resolution::now(answer.clone(), *by));
      attached += 1;
    });
  }
  attached
}

#[async_trait]
impl Strategy for AutoResolveGaps {
  fn name(&self) -> StrategyName {
    StrategyName::Auto
  }

  #[instrument(level = "trace", skip_all)]
  async fn run(
    &self,
    input: &ModuleData,
    context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    let current = mapped_of(input)?;

    let mut answers: HashMap<String, (String, &'static str)> = HashMap::new();
    for question in input.questions.iter().flatten() {
      if let Some(suggested) = question
        .suggested_answer
        .as_ref()
        .filter(|s| !s.trim().is_empty())
      {
        answers.insert(question.gap_id.clone(), (suggested.clone(), RESOLVED_BY_AUTO));
      }
    }
    for (gap_id, answer) in &context.answers {
      answers.insert(gap_id.clone(), (answer.clone(), RESOLVED_BY_USER));
    }

    if answers.is_empty() {
      return Ok(StepOutput::Resolved {
        mapped: Arc::clone(current),
        changed: false,
      });
    }
    let mut next = MappedOutput::clone(current);
    let attached = attach_resolutions(&mut next, &answers);
    debug!(attached, candidates = answers.len(), "attached gap resolutions");
    if attached == 0 {
      return Ok(StepOutput::Resolved {
        mapped: Arc::clone(current),
        changed: false,
      });
    }
    Ok(StepOutput::Resolved {
      mapped: Arc::new(next),
      changed: true,
    })
  }
}
