//! Placement of a state's result (`ResultPath`).

use super::{Field, FieldKind};
use crate::{
    error::Result,
    json_path::{self, JsonPathValidator, PathValidator},
};

/// Where the result of a state ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPath {
    /// `"ResultPath": null`, the result is discarded and the input passes through.
    Discard,
    /// Result is written at the given path of the input.
    Path(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPathField {
    value: Option<ResultPath>,
}

impl ResultPathField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: &str) -> Result<&mut Self> {
        self.set_with(&JsonPathValidator, path)
    }

    pub fn set_with(&mut self, validator: &dyn PathValidator, path: &str) -> Result<&mut Self> {
        json_path::ensure_valid(validator, path)?;
        self.value = Some(ResultPath::Path(path.to_string()));
        Ok(self)
    }

    /// Discard the result. This counts as a configured value.
    pub fn discard(&mut self) -> &mut Self {
        self.value = Some(ResultPath::Discard);
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.value = None;
        self
    }

    /// The configured path; `None` when unset or discarding.
    pub fn get(&self) -> Option<&str> {
        match &self.value {
            Some(ResultPath::Path(path)) => Some(path),
            _ => None,
        }
    }

    pub fn is_discard(&self) -> bool {
        matches!(self.value, Some(ResultPath::Discard))
    }

    pub fn value(&self) -> Option<&ResultPath> {
        self.value.as_ref()
    }
}

impl Field for ResultPathField {
    fn kind(&self) -> FieldKind {
        FieldKind::ResultPath
    }

    fn is_configured(&self) -> bool {
        self.value.is_some()
    }
}
