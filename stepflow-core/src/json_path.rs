//! Path syntax validation.
//!
//! Paths select parts of the JSON payload flowing through an execution
//! (`InputPath`, `OutputPath`, `ResultPath`, a comparator's `Variable`, ...).
//! The object model only needs a yes/no answer, so validation is consumed
//! through [`PathValidator`]; [`JsonPathValidator`] is the default.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FlowError, Result};

/// Decides whether a string is an acceptable path expression.
pub trait PathValidator: Send + Sync {
    /// Returns true if `path` is syntactically valid.
    fn is_valid_path(&self, path: &str) -> bool;
}

static JSON_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\$\$?(?:\.\.?[^.\[\]\s]+|\[(?:\d+|\*|'[^']*'|"[^"]*"|-?\d*:-?\d*(?::\d+)?|\?\(.+?\))\])*$"#,
    )
    .expect("json-path pattern compiles")
});

/// Reference-path validator for `$`- and `$$`-rooted JSONPath expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathValidator;

impl PathValidator for JsonPathValidator {
    fn is_valid_path(&self, path: &str) -> bool {
        JSON_PATH.is_match(path)
    }
}

/// Fails with [`FlowError::InvalidPath`] unless `validator` accepts `path`.
pub fn ensure_valid(validator: &dyn PathValidator, path: &str) -> Result<()> {
    if validator.is_valid_path(path) {
        Ok(())
    } else {
        Err(FlowError::invalid_path(path))
    }
}
