use std::path::Path;
use std::rc::Rc;

use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::errors::{Handler, HandlerFlags};
use swc_core::common::{FileName, Globals, Mark, SourceMap, GLOBALS};
use swc_core::ecma::ast::{EsVersion, ModuleItem, Program, Stmt};
use swc_core::ecma::parser::{lexer::Lexer, EsConfig, Parser, StringInput, Syntax};
use swc_core::ecma::transforms::base::resolver;
use swc_core::ecma::visit::VisitMutWith;

use crate::annotation::annotation_exports;
use crate::cjs::ExportsScanner;
use crate::error::{ErrorBuffer, ParseError};

pub struct ParsedSource {
  pub specifier: String,
  pub source: String,
  pub program: Program,
  pub source_map: Rc<SourceMap>,
  pub comments: SingleThreadedComments,
}

impl ParsedSource {
  /// Parses `source` and resolves identifier bindings so alias lookups work
  /// on canonical references. A parse that recovers with diagnostics is a
  /// success and the diagnostics are discarded; only a parse that yields no
  /// tree fails.
  pub fn parse(specifier: &str, source: &str) -> Result<Self, ParseError> {
    let source_map = SourceMap::default();
    let source_file = source_map.new_source_file(FileName::Real(Path::new(specifier).to_path_buf()), source.into());
    let error_buffer = ErrorBuffer::new();
    let comments = SingleThreadedComments::default();
    let lexer = Lexer::new(
      Syntax::Es(get_es_config()),
      EsVersion::Es2022,
      StringInput::from(&*source_file),
      Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);
    let handler = Handler::with_emitter_and_flags(
      Box::new(error_buffer.clone()),
      HandlerFlags {
        can_emit_warnings: true,
        dont_buffer_diagnostics: true,
        ..HandlerFlags::default()
      },
    );
    let sm = &source_map;
    let mut program = parser.parse_program().map_err(|err| {
      let mut diagnostic = err.into_diagnostic(&handler);
      diagnostic.emit();
      ParseError::from_error_buffer(&error_buffer, specifier, |span| sm.lookup_char_pos(span.lo))
    })?;

    GLOBALS.set(&Globals::new(), || {
      let unresolved_mark = Mark::new();
      let top_level_mark = Mark::new();
      program.visit_mut_with(&mut resolver(unresolved_mark, top_level_mark, false));
    });

    Ok(ParsedSource {
      specifier: specifier.into(),
      source: source.into(),
      program,
      source_map: Rc::new(source_map),
      comments,
    })
  }

  /// Detects the CommonJS exports surface of the parsed file: the named
  /// exports and the re-exported module specifiers, each sorted ascending
  /// and deduplicated.
  ///
  /// An empty `node_env` disables branch evaluation. With `call_mode` the
  /// body of a function assigned to `module.exports` is analyzed as if the
  /// consumer called it immediately.
  pub fn parse_cjs_exports(&self, node_env: &str, call_mode: bool) -> (Vec<String>, Vec<String>) {
    let mut scanner = ExportsScanner::new(node_env, call_mode, self.top_level_stmts());
    scanner.analyze();
    // The annotation idiom is recovered from the raw text, independently of
    // what the tree walk saw; the output set deduplicates the overlap.
    for name in annotation_exports(&self.source) {
      scanner.exports.insert(name);
    }
    scanner.into_exports()
  }

  fn top_level_stmts(&self) -> Vec<Stmt> {
    match &self.program {
      Program::Module(module) => module
        .body
        .iter()
        .filter_map(|item| match item {
          ModuleItem::Stmt(stmt) => Some(stmt.clone()),
          ModuleItem::ModuleDecl(_) => None,
        })
        .collect(),
      Program::Script(script) => script.body.clone(),
    }
  }
}

fn get_es_config() -> EsConfig {
  EsConfig {
    // CommonJS files may return from the top level
    allow_return_outside_function: true,
    export_default_from: false,
    import_assertions: false,
    jsx: false,
    ..EsConfig::default()
  }
}
