//! Per-run context handed to every strategy.

use std::collections::HashMap;

/// Caller-supplied inputs that are not part of the module data.
#[derive(Debug, Clone, Default)]
pub struct StepContext {
  /// Module name; the generator derives the namespace from it.
  pub module_name: String,
  /// Command for agent-backed strategies (e.g. `claude -p`). `None` disables them.
  pub agent_cmd: Option<String>,
  /// Human answers keyed by `gap_id`, consumed by `resolve-gaps/auto`.
  pub answers: HashMap<String, String>,
}

impl StepContext {
  pub fn new(module_name: impl Into<String>) -> Self {
    Self {
      module_name: module_name.into(),
      ..Self::default()
    }
  }

  pub fn with_agent_cmd(mut self, agent_cmd: impl Into<String>) -> Self {
    self.agent_cmd = Some(agent_cmd.into());
    self
  }

  pub fn with_answer(mut self, gap_id: impl Into<String>, answer: impl Into<String>) -> Self {
    self.answers.insert(gap_id.into(), answer.into());
    self
  }

  /// Agent command, or [crate::error::StrategyError::NoAgentCommand] when unset or blank.
  pub(crate) fn require_agent(&self) -> Result<&str, crate::error::StrategyError> {
    self
      .agent_cmd
      .as_deref()
      .filter(|c| !c.trim().is_empty())
      .ok_or(crate::error::StrategyError::NoAgentCommand)
  }
}
