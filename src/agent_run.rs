//! Agent invocation: run the agent command (`agent_cmd`) with the prompt on stdin and read
//! its JSON reply from stdout. Shared by the `llm` and `full` strategies.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::StrategyError;

/// Parses an agent reply: bare JSON, a fenced ```json block, or JSON embedded in prose.
pub(crate) fn parse_agent_json(stdout: &str) -> Result<serde_json::Value, StrategyError> {
  let text = stdout.trim();
  if let Ok(v) = serde_json::from_str(text) {
    return Ok(v);
  }
  if let Some(fenced) = fenced_block(text)
    && let Ok(v) = serde_json::from_str(fenced)
  {
    return Ok(v);
  }
  let start = text.find(['{', '[']);
  let end = text.rfind(['}', ']']);
  if let (Some(start), Some(end)) = (start, end)
    && start < end
    && let Ok(v) = serde_json::from_str(&text[start..=end])
  {
    return Ok(v);
  }
  Err(StrategyError::InvalidResponse(
    "agent output contains no JSON document".to_string(),
  ))
}

/// Body of the first ``` fence, without the info string.
fn fenced_block(text: &str) -> Option<&str> {
  let open = text.find("```")?;
  let after = &text[open + 3..];
  let body_start = after.find('\n')? + 1;
  let body = &after[body_start..];
  let close = body.find("```")?;
  Some(body[..close].trim())
}

/// Runs the agent command with `prompt` as stdin and parses stdout as JSON.
/// The child is killed if the returned future is dropped.
#[instrument(level = "trace", skip(agent_cmd, prompt))]
pub(crate) async fn run_agent(
  agent_cmd: &str,
  prompt: &str,
) -> Result<serde_json::Value, StrategyError> {
  let parts: Vec<&str> = agent_cmd.split_whitespace().collect();
  let (bin, args) = parts.split_first().ok_or(StrategyError::NoAgentCommand)?;

  let mut child = Command::new(bin)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::inherit())
    .kill_on_drop(true)
    .spawn()
    .map_err(|e| StrategyError::Agent(format!("agent spawn: {}", e)))?;

  let stdin = child.stdin.take();
  let write = async move {
    if let Some(mut stdin) = stdin {
      stdin.write_all(prompt.as_bytes()).await?;
      stdin.write_all(b"\n").await?;
    }
    Ok::<_, std::io::Error>(())
  };
  let (written, output) = tokio::join!(write, child.wait_with_output());
  if let Err(e) = written {
    // The agent may exit without reading all of stdin; its exit status decides.
    debug!(error = %e, "agent stdin closed early");
  }
  let output = output.map_err(|e| StrategyError::Agent(format!("agent wait: {}", e)))?;

  if !output.status.success() {
    let msg = output
      .status
      .code()
      .map(|c| format!("agent exit {}", c))
      .unwrap_or_else(|| "agent signal".to_string());
    return Err(StrategyError::Agent(msg));
  }
  let stdout = String::from_utf8_lossy(&output.stdout);
  debug!(bytes = stdout.len(), "agent replied");
  parse_agent_json(&stdout)
}
