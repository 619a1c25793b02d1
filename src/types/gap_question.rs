//! Question put to a human (or an automatic resolver) about one gap.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapQuestion {
  pub procedure: String,
  pub gap_id: String,
  pub question: String,
  /// Best guess offered alongside the question; used by the `auto` resolver.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suggested_answer: Option<String>,
}
