//! `generate` strategies: mapped output to target source.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::Strategy;
use crate::agent_run::run_agent;
use crate::context::StepContext;
use crate::error::StrategyError;
use crate::generator::generate;
use crate::types::{GeneratedOutput, MappedOutput, ModuleData, StepOutput, StrategyName};

fn mapped_of(input: &ModuleData) -> Result<&MappedOutput, StrategyError> {
  input
    .mapped
    .as_deref()
    .ok_or(StrategyError::MissingInput("mapped"))
}

fn into_output(generated: GeneratedOutput) -> StepOutput {
  StepOutput::Generated {
    source: generated.source,
    stats: generated.stats,
  }
}

/// Deterministic emission; gaps stay as comment markers.
pub struct MechanicalGenerate;

#[async_trait]
impl Strategy for MechanicalGenerate {
  fn name(&self) -> StrategyName {
    StrategyName::Mechanical
  }

  async fn run(
    &self,
    input: &ModuleData,
    context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    Ok(into_output(generate(mapped_of(input)?, &context.module_name)))
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceReply {
  Wrapped { source: String },
  Bare(String),
}

pub(crate) fn completion_prompt(skeleton: &str, mapped: &MappedOutput) -> Result<String, StrategyError> {
  let gaps_json = serde_json::to_string_pretty(&mapped.gaps)?;
  Ok(format!(
    "Complete this generated module. Replace every `;; GAP` marker with an implementation \
     and every `;; GAP RESOLVED` marker with code following its answer. Keep all other \
     forms unchanged and use only the `rt` runtime helpers already referenced.\n\
     Reply with JSON only: {{\"source\": \"...\"}}.\n\n\
     Gaps:\n{gaps_json}\n\nSkeleton:\n{skeleton}\n"
  ))
}

/// Mechanical skeleton completed by the agent. Without gaps the agent is not called.
pub struct FullGenerate;

#[async_trait]
impl Strategy for FullGenerate {
  fn name(&self) -> StrategyName {
    StrategyName::Full
  }

  #[instrument(level = "trace", skip_all)]
  async fn run(
    &self,
    input: &ModuleData,
    context: &StepContext,
  ) -> Result<StepOutput, StrategyError> {
    let mapped = mapped_of(input)?;
    let skeleton = generate(mapped, &context.module_name);
    if skeleton.stats.gap_count == 0 {
      debug!("no gaps; using mechanical output");
      return Ok(into_output(skeleton));
    }
    let agent_cmd = context.require_agent()?;
    let reply = run_agent(agent_cmd, &completion_prompt(&skeleton.source, mapped)?).await?;
    let source = match serde_json::from_value(reply)? {
      SourceReply::Wrapped { source } | SourceReply::Bare(source) => source,
    };
    if source.trim().is_empty() {
      return Err(StrategyError::InvalidResponse("agent returned empty source".to_string()));
    }
    Ok(StepOutput::Generated {
      source,
      stats: skeleton.stats,
    })
  }
}
