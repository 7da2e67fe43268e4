mod annotation;
mod cjs;
mod error;
mod swc;
#[cfg(test)]
mod test;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::{wasm_bindgen, JsValue};

pub use crate::error::ParseError;
pub use crate::swc::ParsedSource;

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Options {
  node_env: Option<String>,
  call_mode: Option<bool>,
}

/// Detected exports surface of a CommonJS module.
///
/// A `reexports` entry with trailing parens, like `"mod()"`, records the
/// `module.exports = require("mod")()` form: the consumer strips the parens
/// and calls through the required module.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
  pub exports: Vec<String>,
  pub reexports: Vec<String>,
}

#[wasm_bindgen(js_name = "parse")]
pub fn parse(specifier: &str, source: &str, options: JsValue) -> Result<JsValue, JsValue> {
  console_error_panic_hook::set_once();

  let options: Options = serde_wasm_bindgen::from_value(options).unwrap_or(Options {
    node_env: None,
    call_mode: None,
  });
  let parsed = ParsedSource::parse(specifier, source).map_err(|e| JsValue::from(e.to_string()))?;
  let (exports, reexports) = parsed.parse_cjs_exports(
    options.node_env.as_deref().unwrap_or(""),
    options.call_mode.unwrap_or(false),
  );
  serde_wasm_bindgen::to_value(&Output { exports, reexports }).map_err(|e| JsValue::from(e.to_string()))
}
