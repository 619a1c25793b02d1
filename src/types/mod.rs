//! Pipeline data types: intents, procedures, mapped output, module records and run results.
//!
//! All types serialize to plain nested JSON records, which is the boundary exchange format.

mod gap_question;
mod generated;
mod intent;
#[cfg(test)]
mod intent_test;
mod mapped_output;
mod module_data;
mod module_status;
#[cfg(test)]
mod module_status_test;
mod procedure;
mod step_name;
mod step_result;
mod strategy_name;

pub use gap_question::GapQuestion;
pub use generated::{GenerateStats, GeneratedOutput};
pub use intent::{Branch, Classification, Condition, Gap, Intent, IntentKind, Mapping, Resolution};
pub use mapped_output::{GapEntry, MapStats, MappedOutput, MappedProcedure};
pub use module_data::{ModuleData, ModuleRecord};
pub use module_status::{ModuleStatus, StatusState, StatusStep};
pub use procedure::Procedure;
pub use step_name::StepName;
pub use step_result::{RunResult, RunStatus, StepOutput, StepResult};
pub use strategy_name::StrategyName;
