//! Line-oriented recognizer for legacy event-procedure source, used by `extract/mock`.
//!
//! Recognizes a fixed set of statement shapes. Anything else becomes a `gap` carrying the
//! source line, so the output is always a complete (if pessimistic) intent list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::generator::hyphenate;
use crate::types::{Condition, Intent, IntentKind, Procedure};

macro_rules! re {
  ($name:ident, $pat:expr) => {
    static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pat).expect("static regex"));
  };
}

re!(SUB_START, r#"(?i)^(?:(?:public|private|friend)\s+)?(?:static\s+)?(?:sub|function)\s+([A-Za-z_]\w*)"#);
re!(END_SUB, r#"(?i)^end\s+(?:sub|function)$"#);
re!(IF_BLOCK, r#"(?i)^if\s+(.+?)\s+then$"#);
re!(IF_INLINE, r#"(?i)^if\s+(.+?)\s+then\s+(.+?)(?:\s+else\s+(.+))?$"#);
re!(ELSE_IF, r#"(?i)^elseif\s+.+\s+then$"#);
re!(ELSE, r#"(?i)^else$"#);
re!(END_IF, r#"(?i)^end\s*if$"#);
re!(EXIT_SUB, r#"(?i)^exit\s+(?:sub|function)$"#);
re!(DECLARATION, r#"(?i)^(?:dim|const|static)\s"#);
re!(CANCEL, r#"(?i)^cancel\s*=\s*true$"#);
re!(SAVE, r#"(?i)^(?:(?:docmd\.)?runcommand\s+accmdsaverecord|docmd\.save\b.*|me\.dirty\s*=\s*false)$"#);
re!(MSGBOX, r#"(?i)^msgbox\s*\(?\s*"((?:[^"]|"")*)"\s*(?:,.*?)?\)?$"#);
re!(OPEN_FORM, r#"(?i)^docmd\.openform\s*\(?\s*"([^"]+)""#);
re!(CLOSE_FORM, r#"(?i)^docmd\.close\b"#);
re!(REQUERY, r#"(?i)^(?:me\.requery|docmd\.requery)$"#);
re!(PROPERTY, r#"(?i)^me[.!]\[?(\w+)\]?\.(enabled|visible)\s*=\s*(true|false)$"#);
re!(SET_FOCUS, r#"(?i)^me[.!]\[?(\w+)\]?\.setfocus$"#);
re!(ASSIGN, r#"(?i)^me[.!]\[?(\w+)\]?(?:\.value)?\s*=\s*(.+)$"#);
re!(COND_ISNULL, r#"(?i)^isnull\(\s*me[.!]\[?(\w+)\]?\s*\)$"#);
re!(COND_NZ, r#"(?i)^nz\(\s*me[.!]\[?(\w+)\]?\s*(?:,\s*""\s*)?\)\s*=\s*""$"#);
re!(COND_CONFIRM, r#"(?i)^msgbox\s*\(\s*"((?:[^"]|"")*)"[^)]*\)\s*=\s*vbyes$"#);
re!(COND_NEW_RECORD, r#"(?i)^me\.newrecord(?:\s*=\s*true)?$"#);
re!(STRING_LITERAL, r#"^"((?:[^"]|"")*)"$"#);
re!(SCALAR_LITERAL, r#"(?i)^(?:-?\d+(?:\.\d+)?|true|false|null)$"#);

/// A parsed statement before it is committed to an intent.
#[derive(Debug, Clone)]
enum Item {
  Intent(Intent),
  /// `Exit Sub`, kept with its line so it can become a gap.
  Exit(String),
  /// `Me.x.SetFocus` / `Cancel = True`: meaningful only inside validation blocks.
  Cosmetic(String),
}

/// Why `parse_block` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
  Else,
  ElseIf,
  EndIf,
  EndSub,
  Eof,
}

/// Joins `_` continuations, strips comments and blank lines.
fn logical_lines(source: &str) -> Vec<String> {
  let mut out = Vec::new();
  let mut pending = String::new();
  for raw in source.lines() {
    let line = strip_comment(raw).trim().to_string();
    if let Some(head) = line.strip_suffix(" _") {
      pending.push_str(head.trim());
      pending.push(' ');
      continue;
    }
    pending.push_str(&line);
    let full = std::mem::take(&mut pending).trim().to_string();
    if !full.is_empty() && !is_rem(&full) {
      out.push(full);
    }
  }
  let rest = pending.trim();
  if !rest.is_empty() {
    out.push(rest.to_string());
  }
  out
}

fn is_rem(line: &str) -> bool {
  line.eq_ignore_ascii_case("rem")
    || line
      .get(..4)
      .is_some_and(|head| head.eq_ignore_ascii_case("rem "))
}

/// Removes a `'` comment that is not inside a string literal.
fn strip_comment(line: &str) -> &str {
  let mut in_string = false;
  for (i, c) in line.char_indices() {
    match c {
      '"' => in_string = !in_string,
      '\'' if !in_string => return &line[..i],
      _ => {}
    }
  }
  line
}

fn unescape(s: &str) -> String {
  s.replace("\"\"", "\"")
}

/// Literal right-hand side as text, or `None` if it is computed.
fn literal(value: &str) -> Option<String> {
  let value = value.trim();
  if let Some(c) = STRING_LITERAL.captures(value) {
    return Some(unescape(&c[1]));
  }
  SCALAR_LITERAL.is_match(value).then(|| value.to_string())
}

fn parse_condition(cond: &str) -> Option<Condition> {
  let cond = cond.trim();
  if let Some(c) = COND_ISNULL.captures(cond).or_else(|| COND_NZ.captures(cond)) {
    return Some(Condition::FieldBlank {
      field: c[1].to_string(),
    });
  }
  if let Some(c) = COND_CONFIRM.captures(cond) {
    return Some(Condition::Confirm {
      message: unescape(&c[1]),
    });
  }
  if COND_NEW_RECORD.is_match(cond) {
    return Some(Condition::NewRecord);
  }
  if let Some(c) = ASSIGN.captures(cond) {
    let field = c[1].to_string();
    return match literal(&c[2])? {
      v if v.is_empty() => Some(Condition::FieldBlank { field }),
      value => Some(Condition::FieldEquals { field, value }),
    };
  }
  None
}

/// Recognizes a single-line statement.
fn parse_statement(line: &str) -> Option<Item> {
  if EXIT_SUB.is_match(line) {
    return Some(Item::Exit(line.to_string()));
  }
  if SET_FOCUS.is_match(line) || CANCEL.is_match(line) {
    return Some(Item::Cosmetic(line.to_string()));
  }
  let kind = if SAVE.is_match(line) {
    IntentKind::SaveRecord
  } else if let Some(c) = MSGBOX.captures(line) {
    IntentKind::ShowMessage {
      message: unescape(&c[1]),
    }
  } else if let Some(c) = OPEN_FORM.captures(line) {
    IntentKind::OpenForm {
      form: c[1].to_string(),
    }
  } else if CLOSE_FORM.is_match(line) {
    IntentKind::CloseForm
  } else if REQUERY.is_match(line) {
    IntentKind::Requery
  } else if let Some(c) = PROPERTY.captures(line) {
    let control = c[1].to_string();
    let on = c[3].eq_ignore_ascii_case("true");
    if c[2].eq_ignore_ascii_case("enabled") {
      IntentKind::SetEnabled {
        control,
        enabled: on,
      }
    } else {
      IntentKind::SetVisible {
        control,
        visible: on,
      }
    }
  } else if let Some(c) = ASSIGN.captures(line) {
    let value = literal(&c[2])?;
    IntentKind::SetValue {
      field: c[1].to_string(),
      value,
    }
  } else {
    return None;
  };
  Some(Item::Intent(Intent::new(kind)))
}

fn unrecognized(line: &str) -> Item {
  Item::Intent(Intent::gap(line, "statement has no mechanical mapping"))
}

/// Commits items to intents. A trailing `Exit Sub` at procedure level is dropped.
fn into_intents(items: Vec<Item>, top_level: bool) -> Vec<Intent> {
  let last = items.len().saturating_sub(1);
  items
    .into_iter()
    .enumerate()
    .filter_map(|(i, item)| match item {
      Item::Intent(intent) => Some(intent),
      Item::Exit(_) if top_level && i == last => None,
      Item::Exit(line) => Some(Intent::gap(
        line,
        "early exit has no structural equivalent",
      )),
      Item::Cosmetic(line) => Some(Intent::gap(line, "focus/cancel handling is not mapped")),
    })
    .collect()
}

/// `If <blank field> Then MsgBox ...: Exit Sub` (or `Cancel = True`) collapses to one
/// `validate-required`.
fn as_validation(condition: &Condition, then: &[Item], otherwise: &[Item]) -> Option<Intent> {
  let Condition::FieldBlank { field } = condition else {
    return None;
  };
  if !otherwise.is_empty() {
    return None;
  }
  let mut message = None;
  let mut exits = false;
  for item in then {
    match item {
      Item::Intent(Intent {
        kind: IntentKind::ShowMessage { message: m },
        ..
      }) if message.is_none() => message = Some(m.clone()),
      Item::Exit(_) => exits = true,
      Item::Cosmetic(line) => exits |= CANCEL.is_match(line),
      _ => return None,
    }
  }
  let message = message?;
  exits.then(|| {
    Intent::new(IntentKind::ValidateRequired {
      field: field.clone(),
      message,
    })
  })
}

struct Parser {
  lines: Vec<String>,
  pos: usize,
}

impl Parser {
  fn next_line(&mut self) -> Option<String> {
    let line = self.lines.get(self.pos).cloned();
    if line.is_some() {
      self.pos += 1;
    }
    line
  }

  /// Parses statements until a block terminator.
  fn parse_block(&mut self) -> (Vec<Item>, Terminator) {
    let mut items = Vec::new();
    while let Some(line) = self.next_line() {
      if END_SUB.is_match(&line) {
        return (items, Terminator::EndSub);
      }
      if END_IF.is_match(&line) {
        return (items, Terminator::EndIf);
      }
      if ELSE.is_match(&line) {
        return (items, Terminator::Else);
      }
      if ELSE_IF.is_match(&line) {
        return (items, Terminator::ElseIf);
      }
      if DECLARATION.is_match(&line) {
        continue;
      }
      if let Some(c) = IF_BLOCK.captures(&line) {
        let cond = c[1].to_string();
        items.push(self.parse_if_block(&line, &cond));
        continue;
      }
      if let Some(c) = IF_INLINE.captures(&line) {
        let then = parse_statement(&c[2]).unwrap_or_else(|| unrecognized(&c[2]));
        let otherwise = c
          .get(3)
          .map(|m| parse_statement(m.as_str()).unwrap_or_else(|| unrecognized(m.as_str())));
        items.push(build_branch(&line, &c[1], vec![then], otherwise.into_iter().collect()));
        continue;
      }
      items.push(parse_statement(&line).unwrap_or_else(|| unrecognized(&line)));
    }
    (items, Terminator::Eof)
  }

  fn parse_if_block(&mut self, line: &str, cond: &str) -> Item {
    let (then, term) = self.parse_block();
    match term {
      Terminator::EndIf => build_branch(line, cond, then, Vec::new()),
      Terminator::Else => {
        let (otherwise, term) = self.parse_block();
        match term {
          Terminator::EndIf => build_branch(line, cond, then, otherwise),
          _ => self.abandon_if(line, term),
        }
      }
      term => self.abandon_if(line, term),
    }
  }

  /// Skips the rest of an `If` that cannot be represented and returns one gap for it.
  fn abandon_if(&mut self, line: &str, term: Terminator) -> Item {
    if term == Terminator::ElseIf || term == Terminator::Else {
      let mut depth = 0usize;
      while let Some(next) = self.next_line() {
        if IF_BLOCK.is_match(&next) {
          depth += 1;
        } else if END_IF.is_match(&next) {
          if depth == 0 {
            break;
          }
          depth -= 1;
        } else if END_SUB.is_match(&next) {
          self.pos -= 1;
          break;
        }
      }
    } else if term == Terminator::EndSub {
      self.pos -= 1;
    }
    Item::Intent(Intent::gap(line, "multi-way or unterminated conditional"))
  }
}

fn build_branch(line: &str, cond: &str, then: Vec<Item>, otherwise: Vec<Item>) -> Item {
  let Some(condition) = parse_condition(cond) else {
    return Item::Intent(Intent::gap(line, format!("condition not recognized: {}", cond.trim())));
  };
  if let Some(validation) = as_validation(&condition, &then, &otherwise) {
    return Item::Intent(validation);
  }
  Item::Intent(Intent::branch(
    condition,
    into_intents(then, false),
    into_intents(otherwise, false),
  ))
}

/// Trigger from the `_Event` suffix of a procedure name (`btnSave_Click` -> `click`).
pub fn trigger_of(name: &str) -> String {
  name
    .rsplit_once('_')
    .map(|(_, event)| hyphenate(event))
    .unwrap_or_default()
}

/// Extracts every `Sub`/`Function` in `source` as a procedure.
pub fn recognize(source: &str) -> Vec<Procedure> {
  let mut parser = Parser {
    lines: logical_lines(source),
    pos: 0,
  };
  let mut procedures = Vec::new();
  while let Some(line) = parser.next_line() {
    let Some(c) = SUB_START.captures(&line) else {
      continue;
    };
    let name = c[1].to_string();
    let (mut items, mut term) = parser.parse_block();
    // Stray `Else` / `End If` at procedure level: keep it as a gap and carry on.
    while matches!(term, Terminator::Else | Terminator::ElseIf | Terminator::EndIf) {
      let stray = parser.lines[parser.pos - 1].clone();
      items.push(Item::Intent(Intent::gap(stray, "unbalanced conditional")));
      let (more, next) = parser.parse_block();
      items.extend(more);
      term = next;
    }
    procedures.push(Procedure::new(
      name.clone(),
      trigger_of(&name),
      into_intents(items, true),
    ));
  }
  procedures
}
