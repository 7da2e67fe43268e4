use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use swc_core::common::errors::{Diagnostic, DiagnosticBuilder, Emitter};
use swc_core::common::{Loc, Span};

/// Buffers the diagnostics swc emits while parsing so they can be turned
/// into a [`ParseError`] when no tree is produced.
#[derive(Clone, Debug, Default)]
pub struct ErrorBuffer {
  diagnostics: Rc<RefCell<Vec<Diagnostic>>>,
}

impl ErrorBuffer {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Emitter for ErrorBuffer {
  fn emit(&mut self, db: &DiagnosticBuilder) {
    self.diagnostics.borrow_mut().push((**db).clone());
  }
}

/// The parser yielded no tree. Carries the diagnostics it emitted, already
/// formatted as `message at specifier:line:col`.
#[derive(Clone, Debug)]
pub struct ParseError {
  pub specifier: String,
  pub diagnostics: Vec<String>,
}

impl ParseError {
  pub(crate) fn from_error_buffer<F>(buffer: &ErrorBuffer, specifier: &str, get_loc: F) -> Self
  where
    F: Fn(Span) -> Loc,
  {
    let diagnostics = buffer
      .diagnostics
      .borrow()
      .iter()
      .map(|d| {
        let msg = d.message();
        match d.span.primary_span() {
          Some(span) => {
            let loc = get_loc(span);
            format!("{} at {}:{}:{}", msg, specifier, loc.line, loc.col_display)
          }
          None => msg,
        }
      })
      .collect();
    ParseError {
      specifier: specifier.into(),
      diagnostics,
    }
  }
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.diagnostics.first() {
      Some(msg) => write!(f, "{}", msg),
      None => write!(f, "failed to parse {}", self.specifier),
    }
  }
}

impl std::error::Error for ParseError {}
