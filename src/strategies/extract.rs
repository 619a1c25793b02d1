//! `extract` strategies: source text to procedures.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::Strategy;
use super::recognizer::recognize;
use crate::agent_run::run_agent;
use crate::context::StepContext;
use crate::error::StrategyError;
use crate::types::{ModuleData, Procedure, StepOutput, StrategyName};

fn source_of(input: &ModuleData) -> Result<&str, StrategyError> {
  input
    .source
    .as_deref()
    .ok_or(StrategyError::MissingInput("source"))
}

/// Deterministic recognizer; needs no agent.
pub struct MockExtract;

#[async_trait]
impl Strategy for MockExtract {
  fn name(&self) -> StrategyName {
    StrategyName::Mock
  }

  #[instrument(level = "trace", skip_all)]
  async fn run(
    &self,
    input: &ModuleData,
    _context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    let procedures = recognize(source_of(input)?);
    debug!(procedures = procedures.len(), "recognized procedures");
    Ok(StepOutput::Extracted { procedures })
  }
}

/// Agent reply: either `{"procedures": [...]}` or the bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtractReply {
  Wrapped { procedures: Vec<Procedure> },
  Bare(Vec<Procedure>),
}

pub(crate) fn extract_prompt(module_name: &str, source: &str) -> String {
  format!(
    "Extract the event procedures of the legacy module `{module_name}` as structured intents.\n\
     Reply with JSON only: {{\"procedures\": [{{\"name\", \"trigger\", \"intents\": [...]}}]}}.\n\
     Intent types: validate-required {{field, message}}, save-record, show-message {{message}}, \
     set-value {{field, value}}, set-enabled {{control, enabled}}, set-visible {{control, visible}}, \
     open-form {{form}}, close-form, requery, \
     branch {{condition: {{kind: field-blank|field-equals|confirm|new-record, ...}}, then, else}}, \
     gap {{vba_line, reason}} for anything else.\n\n\
     Source:\n{source}\n"
  )
}

/// Agent-backed extraction.
pub struct LlmExtract;

#[async_trait]
impl Strategy for LlmExtract {
  fn name(&self) -> StrategyName {
    StrategyName::Llm
  }

  #[instrument(level = "trace", skip_all)]
  async fn run(
    &self,
    input: &ModuleData,
    context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    let source = source_of(input)?;
    let agent_cmd = context.require_agent()?;
    let reply = run_agent(agent_cmd, &extract_prompt(&context.module_name, source)).await?;
    let procedures = match serde_json::from_value(reply)? {
      ExtractReply::Wrapped { procedures } | ExtractReply::Bare(procedures) => procedures,
    };
    Ok(StepOutput::Extracted { procedures })
  }
}
