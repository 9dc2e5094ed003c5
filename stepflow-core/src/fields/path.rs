//! Input and output processing (`InputPath` / `OutputPath`).

use super::{Field, FieldKind};
use crate::{
    error::Result,
    json_path::{self, JsonPathValidator, PathValidator},
};

/// Optional input and output selectors of a state.
///
/// Setters validate eagerly: a rejected path leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathField {
    input: Option<String>,
    output: Option<String>,
}

impl PathField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the portion of the state input passed on to the state.
    pub fn set_input(&mut self, path: &str) -> Result<&mut Self> {
        self.set_input_with(&JsonPathValidator, path)
    }

    pub fn set_input_with(
        &mut self,
        validator: &dyn PathValidator,
        path: &str,
    ) -> Result<&mut Self> {
        json_path::ensure_valid(validator, path)?;
        self.input = Some(path.to_string());
        Ok(self)
    }

    /// Select the portion of the state output passed to the next state.
    pub fn set_output(&mut self, path: &str) -> Result<&mut Self> {
        self.set_output_with(&JsonPathValidator, path)
    }

    pub fn set_output_with(
        &mut self,
        validator: &dyn PathValidator,
        path: &str,
    ) -> Result<&mut Self> {
        json_path::ensure_valid(validator, path)?;
        self.output = Some(path.to_string());
        Ok(self)
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn reset(&mut self) -> &mut Self {
        self.input = None;
        self.output = None;
        self
    }
}

impl Field for PathField {
    fn kind(&self) -> FieldKind {
        FieldKind::Path
    }

    fn is_configured(&self) -> bool {
        self.input.is_some() || self.output.is_some()
    }
}
