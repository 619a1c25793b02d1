//! Scripted stand-in for the agent command.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A shell script that records its stdin to `prompt.txt` and prints `reply`.
pub(crate) struct ScriptAgent {
  dir: TempDir,
  pub(crate) cmd: String,
}

impl ScriptAgent {
  pub(crate) fn replying(reply: &str) -> Self {
    Self::with_body(&format!("cat <<'REPLY'\n{reply}\nREPLY\n"))
  }

  pub(crate) fn failing(code: i32) -> Self {
    Self::with_body(&format!("exit {code}\n"))
  }

  fn with_body(body: &str) -> Self {
    let dir = tempfile::tempdir().unwrap();
    let prompt = dir.path().join("prompt.txt");
    let script = dir.path().join("agent.sh");
    fs::write(
      &script,
      format!("cat > '{}'\n{body}", prompt.display()),
    )
    .unwrap();
    let cmd = format!("sh {}", script.display());
    Self { dir, cmd }
  }

  fn prompt_path(&self) -> PathBuf {
    self.dir.path().join("prompt.txt")
  }

  /// What the strategy wrote to the agent's stdin.
  pub(crate) fn prompt(&self) -> String {
    fs::read_to_string(self.prompt_path()).unwrap_or_default()
  }
}
