//! Mechanical generator behind `generate/mechanical`.
//!
//! Emits one namespace per module and one function per procedure. Every mechanical intent
//! kind has exactly one emission rule; gaps become comment markers so the output stays a
//! valid, reviewable skeleton.

use tracing::{debug, instrument};

use crate::fold::{IntentFolder, fold_intents};
use crate::types::{
  Branch, Condition, GenerateStats, GeneratedOutput, Intent, IntentKind, MappedOutput,
  MappedProcedure,
};

/// Namespace prefix for generated form modules.
pub const NAMESPACE_PREFIX: &str = "forms";
/// Runtime namespace every generated module requires as `rt`.
pub const RUNTIME_NAMESPACE: &str = "app.forms.runtime";
/// Marker written for answered gaps.
pub const GAP_RESOLVED_MARKER: &str = "GAP RESOLVED";

const INDENT: &str = "  ";

/// Converts mixed, Pascal or snake case to lowercase hyphen-separated words.
///
/// Splits on underscores, whitespace and lowercase-to-uppercase boundaries:
/// `btnSave_Click` becomes `btn-save-click`, `PipelineTest` becomes `pipeline-test`.
pub fn hyphenate(name: &str) -> String {
  let mut words = Vec::new();
  for part in name.split(|c: char| c == '_' || c.is_whitespace()) {
    let mut word = String::new();
    let mut prev_lower = false;
    for c in part.chars() {
      if c.is_uppercase() && prev_lower && !word.is_empty() {
        words.push(std::mem::take(&mut word));
      }
      prev_lower = c.is_lowercase();
      word.extend(c.to_lowercase());
    }
    if !word.is_empty() {
      words.push(word);
    }
  }
  words.join("-")
}

/// [hyphenate]d name, or `fallback` when nothing usable is left.
fn identifier(name: &str, fallback: &str) -> String {
  let hyphenated = hyphenate(name);
  if hyphenated.is_empty() {
    fallback.to_string()
  } else {
    hyphenated
  }
}

/// Quotes `s` as a string literal.
fn quote(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + 2);
  out.push('"');
  for c in s.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => {}
      _ => out.push(c),
    }
  }
  out.push('"');
  out
}

fn keyword(name: &str) -> String {
  let cleaned: String = name
    .chars()
    .map(|c| if c.is_whitespace() { '-' } else { c })
    .collect();
  format!(":{}", cleaned)
}

fn is_comment(line: &str) -> bool {
  line.trim_start().starts_with(";;")
}

fn indent(lines: Vec<String>) -> impl Iterator<Item = String> {
  lines.into_iter().map(|l| format!("{INDENT}{l}"))
}

/// Closes the form whose lines are in `lines`, keeping the paren out of trailing comments.
fn close(lines: &mut Vec<String>) {
  match lines.last_mut() {
    Some(last) if !is_comment(last) => last.push(')'),
    _ => lines.push(")".to_string()),
  }
}

/// `(head` followed by indented children, then the closing paren.
fn form(head: String, children: Vec<Vec<String>>) -> Vec<String> {
  let mut lines = vec![head];
  for child in children {
    lines.extend(indent(child));
  }
  close(&mut lines);
  lines
}

/// Single expression for a branch arm: the child itself, or a `(do ...)` block.
fn arm(children: Vec<Vec<String>>) -> Vec<String> {
  let single_expr = children.len() == 1 && !children[0].iter().all(|l| is_comment(l));
  if single_expr {
    children.into_iter().flatten().collect()
  } else {
    form("(do".to_string(), children)
  }
}

fn comment_lines(prefix: &str, text: &str) -> Vec<String> {
  let mut lines = Vec::new();
  for (i, line) in text.lines().enumerate() {
    if i == 0 {
      lines.push(format!(";; {prefix}{line}"));
    } else {
      lines.push(format!(";;   {line}"));
    }
  }
  if lines.is_empty() {
    lines.push(format!(";; {}", prefix.trim_end()));
  }
  lines
}

fn condition_expr(condition: &Condition) -> String {
  match condition {
    Condition::FieldBlank { field } => format!("(rt/blank? ctx {})", keyword(field)),
    Condition::FieldEquals { field, value } => {
      format!("(= (rt/value ctx {}) {})", keyword(field), quote(value))
    }
    Condition::Confirm { message } => format!("(rt/confirm? ctx {})", quote(message)),
    Condition::NewRecord => "(rt/new-record? ctx)".to_string(),
  }
}

/// Emits lines per intent and counts leaves by kind.
#[derive(Default)]
struct Emitter {
  mechanical: usize,
  gaps: usize,
}

impl IntentFolder for Emitter {
  type Output = Vec<String>;

  fn leaf(&mut self, intent: &Intent) -> Vec<String> {
    let line = match &intent.kind {
      IntentKind::ValidateRequired { field, message } => {
        format!("(rt/validate-required! ctx {} {})", keyword(field), quote(message))
      }
      IntentKind::SaveRecord => "(rt/save-record! ctx)".to_string(),
      IntentKind::ShowMessage { message } => format!("(rt/show-message! ctx {})", quote(message)),
      IntentKind::SetValue { field, value } => {
        format!("(rt/set-value! ctx {} {})", keyword(field), quote(value))
      }
      IntentKind::SetEnabled { control, enabled } => {
        format!("(rt/set-enabled! ctx {} {})", keyword(control), enabled)
      }
      IntentKind::SetVisible { control, visible } => {
        format!("(rt/set-visible! ctx {} {})", keyword(control), visible)
      }
      IntentKind::OpenForm { form } => format!("(rt/open-form! ctx {})", quote(form)),
      IntentKind::CloseForm => "(rt/close-form! ctx)".to_string(),
      IntentKind::Requery => "(rt/requery! ctx)".to_string(),
      IntentKind::Gap(gap) => {
        self.gaps += 1;
        let id = gap.gap_id.as_deref().unwrap_or("?");
        return match &gap.resolution {
          Some(resolution) => comment_lines(
            &format!("{GAP_RESOLVED_MARKER} [{id}] ({}): ", resolution.resolved_by),
            &resolution.answer,
          ),
          None => {
            let mut lines = comment_lines(&format!("GAP [{id}]: "), &gap.reason);
            lines.extend(comment_lines("  vba: ", &gap.vba_line));
            lines
          }
        };
      }
      // Branches never reach `leaf`.
      IntentKind::Branch(_) => return Vec::new(),
    };
    self.mechanical += 1;
    vec![line]
  }

  fn branch(
    &mut self,
    _intent: &Intent,
    branch: &Branch,
    then: Vec<Vec<String>>,
    otherwise: Vec<Vec<String>>,
  ) -> Vec<String> {
    let cond = condition_expr(&branch.condition);
    match (then.is_empty(), otherwise.is_empty()) {
      (_, true) => form(format!("(when {cond}"), then),
      (true, false) => form(format!("(when-not {cond}"), otherwise),
      (false, false) => form(format!("(if {cond}"), vec![arm(then), arm(otherwise)]),
    }
  }
}

fn emit_procedure(emitter: &mut Emitter, procedure: &MappedProcedure) -> Vec<String> {
  let doc = if procedure.trigger.is_empty() {
    procedure.name.clone()
  } else {
    format!("{} ({})", procedure.name, procedure.trigger)
  };
  let body = fold_intents(emitter, &procedure.intents);
  let mut lines = vec![
    format!("(defn {}", identifier(&procedure.name, "procedure")),
    format!("{INDENT}{}", quote(&doc)),
    format!("{INDENT}[ctx]"),
  ];
  for expr in body {
    lines.extend(indent(expr));
  }
  close(&mut lines);
  lines
}

/// Generates target source for a mapped module.
#[instrument(level = "trace", skip(mapped))]
pub fn generate(mapped: &MappedOutput, module_name: &str) -> GeneratedOutput {
  let namespace = identifier(module_name, "module");
  let mut sections = vec![format!(
    "(ns {NAMESPACE_PREFIX}.{namespace}\n{INDENT}{}\n{INDENT}(:require [{RUNTIME_NAMESPACE} :as rt]))",
    quote(&format!("Generated from legacy module {module_name}."))
  )];

  let mut emitter = Emitter::default();
  if mapped.procedures.is_empty() {
    sections.push(";; no event procedures".to_string());
  }
  for procedure in &mapped.procedures {
    sections.push(emit_procedure(&mut emitter, procedure).join("\n"));
  }

  let stats = GenerateStats {
    total_procedures: mapped.procedures.len(),
    mechanical_count: emitter.mechanical,
    gap_count: emitter.gaps,
  };
  debug!(namespace = %namespace, ?stats, "generated mechanical source");
  let mut source = sections.join("\n\n");
  source.push('\n');
  GeneratedOutput { source, stats }
}
