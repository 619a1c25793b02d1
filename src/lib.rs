//! # procedure-translate
//!
//! Translates legacy event-procedure source into generated scripts through a fixed,
//! resumable pipeline:
//!
//! extract → map → gap-questions → resolve-gaps → generate
//!
//! ## Architecture
//!
//! Each step has named, swappable strategies (see [registry]). Two of them are core
//! deterministic algorithms: the [classifier] behind `map` and the mechanical [generator].
//! The [runner] skips steps whose output a module already holds, and [gaps] decides what a
//! module needs next from whatever data it has.

pub(crate) mod agent_run;
pub mod classifier;
#[cfg(test)]
mod classifier_test;
pub mod context;
pub mod error;
pub mod fold;
pub mod gaps;
pub mod generator;
pub mod module_io;
#[cfg(test)]
mod module_io_test;
pub mod registry;
pub mod runner;
pub mod strategies;
pub mod types;

pub use classifier::classify;
pub use context::StepContext;
pub use error::{PipelineError, StrategyError};
pub use gaps::{get_module_status, has_unresolved_gaps};
pub use generator::generate;
pub use registry::{StepDefinition, get_step, list_strategies};
pub use runner::{StrategyConfig, run_pipeline, run_step};
pub use types::{
  Intent, IntentKind, MappedOutput, ModuleData, ModuleRecord, ModuleStatus, Procedure, RunResult,
  RunStatus, StepName, StepResult, StrategyName,
};
