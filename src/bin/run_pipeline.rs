//! CLI: run the translation pipeline on a module record or a legacy source file.
//!
//! Usage: `run_pipeline run [OPTIONS] <module.json|source.bas>`
//! Example: run_pipeline run --strategy extract=mock --strategy generate=mechanical Form_Orders.bas
//!
//! Updated module records are written to .pipeline/<name>.json unless --out is given
//! (JSON inputs are updated in place).
//!
//! Set RUST_LOG=procedure_translate=trace for TRACE-level span enter/exit and events.

use clap::{Parser, Subcommand};
use procedure_translate::module_io::{load_answers, load_module, save_module};
use procedure_translate::types::StepName;
use procedure_translate::{
  ModuleData, ModuleRecord, StepContext, StrategyConfig, get_module_status, list_strategies,
  run_pipeline,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

const RUN_DIR: &str = ".pipeline";

/// Translate legacy event procedures into generated scripts.
#[derive(Parser, Debug)]
#[command(name = "run_pipeline")]
#[command(
  after_help = r#"Environment variables (override --agent-cmd when set):
  PIPELINE_AGENT_CMD    Command for agent-backed strategies (extract/llm, gap-questions/llm,
                        generate/full). The prompt is written to its stdin; it must print JSON.

Examples:
  run_pipeline run --strategy extract=mock Form_Orders.bas
  run_pipeline run --answers answers.json .pipeline/Form_Orders.json
  run_pipeline status .pipeline/Form_Orders.json
  run_pipeline strategies generate"#
)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run every step the module still needs.
  Run {
    /// Module name (defaults to the record name or the source file stem).
    #[arg(long)]
    name: Option<String>,

    /// Strategy override as step=strategy; repeatable.
    #[arg(long = "strategy", value_name = "STEP=STRATEGY", value_parser = parse_strategy)]
    strategies: Vec<(String, String)>,

    /// JSON file mapping gap ids to answers, used by resolve-gaps/auto.
    #[arg(long, value_name = "FILE")]
    answers: Option<PathBuf>,

    /// Command for agent-backed strategies. Overridden by PIPELINE_AGENT_CMD if set.
    #[arg(long, value_name = "CMD")]
    agent_cmd: Option<String>,

    /// Discard extracted, mapped and generated data and start again from the source.
    #[arg(long)]
    fresh: bool,

    /// Where to write the updated module record.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Module record (.json) or legacy source file.
    #[arg(value_name = "INPUT")]
    input: PathBuf,
  },
  /// Print the next step a module record needs.
  Status {
    #[arg(value_name = "MODULE")]
    module: PathBuf,
  },
  /// List steps and their strategies.
  Strategies {
    /// Only this step.
    step: Option<String>,
  },
}

fn parse_strategy(s: &str) -> Result<(String, String), String> {
  let (step, strategy) = s
    .split_once('=')
    .ok_or_else(|| format!("expected STEP=STRATEGY, got '{}'", s))?;
  Ok((step.trim().to_string(), strategy.trim().to_string()))
}

fn is_json(path: &Path) -> bool {
  path
    .extension()
    .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn fail(msg: impl std::fmt::Display) -> ! {
  eprintln!("{}", msg);
  process::exit(1);
}

/// Loads a module record, or wraps a source file in a fresh one.
fn load_input(input: &Path, name: Option<String>) -> ModuleRecord {
  if is_json(input) {
    let mut record = load_module(input)
      .unwrap_or_else(|e| fail(format!("Error reading {}: {}", input.display(), e)));
    if let Some(name) = name {
      record.name = name;
    }
    return record;
  }
  let source = fs::read_to_string(input)
    .unwrap_or_else(|e| fail(format!("Error reading {}: {}", input.display(), e)));
  let name = name.unwrap_or_else(|| {
    input
      .file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_else(|| "module".to_string())
  });
  ModuleRecord::new(name, ModuleData::from_source(source))
}

async fn run(command: Command) {
  let Command::Run {
    name,
    strategies,
    answers,
    agent_cmd,
    fresh,
    out,
    input,
  } = command
  else {
    return;
  };

  // Env var overrides the flag.
  let agent_cmd = env::var("PIPELINE_AGENT_CMD").ok().or(agent_cmd);
  let mut record = load_input(&input, name);
  if fresh {
    record.data = ModuleData {
      source: record.data.source.take(),
      ..ModuleData::default()
    };
  }

  let mut context = StepContext::new(record.name.clone());
  context.agent_cmd = agent_cmd;
  if let Some(path) = &answers {
    context.answers = load_answers(path)
      .unwrap_or_else(|e| fail(format!("Error reading {}: {}", path.display(), e)));
  }
  let config: StrategyConfig = strategies.into_iter().collect();
  info!(module = %record.name, agent_cmd = ?context.agent_cmd, ?config, "options (env or flags)");

  let result = run_pipeline(record.data.clone(), &context, &config)
    .await
    .unwrap_or_else(|e| fail(format!("Bad request: {}", e)));

  record.apply_run(&result);
  let out = out.unwrap_or_else(|| {
    if is_json(&input) {
      input.clone()
    } else {
      PathBuf::from(RUN_DIR).join(format!("{}.json", record.name))
    }
  });
  if result.is_complete() {
    save_module(&out, &record)
      .unwrap_or_else(|e| fail(format!("Error writing {}: {}", out.display(), e)));
  }

  let steps: Vec<String> = result
    .results
    .iter()
    .map(|r| format!("{}:{}", r.step, r.strategy))
    .collect();
  info!(status = ?result.status, steps = ?steps, "pipeline finished");
  if let Some(err) = &result.error {
    eprintln!("Pipeline failed: {}", err);
    eprintln!("  Completed steps: {:?}", steps);
    process::exit(1);
  }
  println!("Pipeline completed.");
  println!("  Steps: {:?}", steps);
  println!(
    "  Next: {} ({})",
    result.module_status.step, result.module_status.status
  );
  println!("  Version: {}", record.version);
  println!("  Written: {}", out.display());
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  match args.command {
    Command::Status { module } => {
      let record = load_module(&module)
        .unwrap_or_else(|e| fail(format!("Error reading {}: {}", module.display(), e)));
      let status = get_module_status(Some(&record.data));
      println!("{}: {} ({})", record.name, status.step, status.status);
    }
    Command::Strategies { step } => {
      let steps: Vec<String> = match step {
        Some(s) => vec![s],
        None => StepName::ALL.iter().map(|s| s.to_string()).collect(),
      };
      for s in steps {
        let names = list_strategies(&s).unwrap_or_else(|e| fail(e));
        let default = procedure_translate::get_step(&s)
          .map(|d| d.default_strategy.to_string())
          .unwrap_or_default();
        println!("{}: {} (default: {})", s, names.join(", "), default);
      }
    }
    command @ Command::Run { .. } => run(command).await,
  }
}
