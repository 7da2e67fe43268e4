use once_cell::sync::Lazy;
use regex::Regex;

// Transpilers advertise tree-shaken names with `0 && (module.exports = { a, b })`.
// The object literal in that form is always flat, so the regex stops at the
// first closing brace and never needs to balance nesting.
static MODULE_EXPORTS_ANNOTATION_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?:^|[;\s])0\s*&&\s*\(\s*module\.exports\s*=\s*\{([^}]*)\}").unwrap());

/// Collects export names from every `0 && (module.exports = {...})`
/// annotation in the raw source text.
pub fn annotation_exports(source: &str) -> Vec<String> {
  let mut names = Vec::new();
  for caps in MODULE_EXPORTS_ANNOTATION_RE.captures_iter(source) {
    let body = match caps.get(1) {
      Some(m) => m.as_str(),
      None => continue,
    };
    for piece in body.split(',') {
      let mut name = piece.trim();
      if let Some(colon) = name.find(':') {
        name = name[..colon].trim_end();
      }
      let name = name.trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c.is_whitespace());
      if !name.is_empty() {
        names.push(name.to_owned());
      }
    }
  }
  names
}
