//! `gap-questions` strategies: turn open gaps into questions for a human.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::Strategy;
use crate::agent_run::run_agent;
use crate::context::StepContext;
use crate::error::StrategyError;
use crate::gaps::unresolved_gaps;
use crate::types::{GapEntry, GapQuestion, ModuleData, StepOutput, StrategyName};

/// No-op: asks nothing.
pub struct SkipGapQuestions;

#[async_trait]
impl Strategy for SkipGapQuestions {
  fn name(&self) -> StrategyName {
    StrategyName::Skip
  }

  async fn run(
    &self,
    _input: &ModuleData,
    _context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    Ok(StepOutput::Questions {
      questions: Vec::new(),
    })
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsReply {
  Wrapped { questions: Vec<GapQuestion> },
  Bare(Vec<GapQuestion>),
}

pub(crate) fn questions_prompt(module_name: &str, gaps: &[&GapEntry]) -> Result<String, StrategyError> {
  let gaps_json = serde_json::to_string_pretty(gaps)?;
  Ok(format!(
    "The legacy module `{module_name}` has constructs that could not be translated mechanically.\n\
     For each gap below, write one question a developer can answer to resolve it, and a \
     suggested_answer if you have a confident guess.\n\
     Reply with JSON only: {{\"questions\": [{{\"procedure\", \"gap_id\", \"question\", \"suggested_answer\"}}]}}.\n\n\
     Gaps:\n{gaps_json}\n"
  ))
}

/// Agent-backed question writer. Questions for unknown gap ids are dropped.
pub struct LlmGapQuestions;

#[async_trait]
impl Strategy for LlmGapQuestions {
  fn name(&self) -> StrategyName {
    StrategyName::Llm
  }

  #[instrument(level = "trace", skip_all)]
  async fn run(
    &self,
    input: &ModuleData,
    context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    let mapped = input
      .mapped
      .as_deref()
      .ok_or(StrategyError::MissingInput("mapped"))?;
    let open = unresolved_gaps(mapped);
    if open.is_empty() {
      return Ok(StepOutput::Questions {
        questions: Vec::new(),
      });
    }
    let agent_cmd = context.require_agent()?;
    let prompt = questions_prompt(&context.module_name, &open)?;
    let reply = run_agent(agent_cmd, &prompt).await?;
    let questions = match serde_json::from_value(reply)? {
      QuestionsReply::Wrapped { questions } | QuestionsReply::Bare(questions) => questions,
    };
    let total = questions.len();
    let questions: Vec<GapQuestion> = questions
      .into_iter()
      .filter(|q| open.iter().any(|g| g.gap_id == q.gap_id))
      .collect();
    debug!(kept = questions.len(), dropped = total - questions.len(), "gap questions");
    Ok(StepOutput::Questions { questions })
  }
}
