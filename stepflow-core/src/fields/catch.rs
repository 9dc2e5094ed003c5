//! Fallback transitions on error (`Catch`).

use super::{ErrorType, Field, FieldKind, NextField, ResultPathField, error_type::check_selectors};
use crate::error::FlowError;

/// Transition taken when a matching error is raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catcher {
    error_types: Vec<ErrorType>,
    /// Fallback state.
    pub next: NextField,
    /// Where the error output is placed in the fallback state's input.
    pub result_path: ResultPathField,
}

impl Catcher {
    pub fn new<I, E>(error_types: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ErrorType>,
    {
        Self {
            error_types: error_types.into_iter().map(Into::into).collect(),
            next: NextField::new(),
            result_path: ResultPathField::new(),
        }
    }

    pub fn error_types(&self) -> &[ErrorType] {
        &self.error_types
    }
}

/// Ordered catchers; matched in sequence against a raised error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatchField {
    /// `None` while unset; `Some(vec![])` for an explicit empty list.
    catchers: Option<Vec<Catcher>>,
}

impl CatchField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a catcher matching any error (`States.ALL`).
    pub fn all(&mut self) -> &mut Catcher {
        self.errors([ErrorType::All])
    }

    /// Append a catcher matching the given error names.
    pub fn errors<I, E>(&mut self, error_types: I) -> &mut Catcher
    where
        I: IntoIterator<Item = E>,
        E: Into<ErrorType>,
    {
        self.push(Catcher::new(error_types))
    }

    pub fn push(&mut self, catcher: Catcher) -> &mut Catcher {
        let catchers = self.catchers.get_or_insert_with(Vec::new);
        catchers.push(catcher);
        let last = catchers.len() - 1;
        &mut catchers[last]
    }

    pub fn catchers(&self) -> &[Catcher] {
        self.catchers.as_deref().unwrap_or_default()
    }

    pub fn catchers_mut(&mut self) -> &mut [Catcher] {
        self.catchers.as_deref_mut().unwrap_or_default()
    }

    /// Configure an explicit empty list, dropping any entries.
    pub fn clear(&mut self) -> &mut Self {
        self.catchers = Some(Vec::new());
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.catchers = None;
        self
    }

    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = check_selectors(
            "Catcher",
            self.catchers().iter().map(Catcher::error_types),
        );
        for (index, catcher) in self.catchers().iter().enumerate() {
            if let Err(err) = catcher.next.validate() {
                errors.push(err.context(format_args!("Catcher #{index}")));
            }
        }
        errors
    }
}

impl Field for CatchField {
    fn kind(&self) -> FieldKind {
        FieldKind::Catch
    }

    fn is_configured(&self) -> bool {
        self.catchers.is_some()
    }
}
