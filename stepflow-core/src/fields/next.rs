//! Transition field (`Next` / `End`).

use super::{Field, FieldKind};
use crate::error::{FlowError, Result};

/// Where execution continues after a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Terminal state (`"End": true`).
    End,
    /// Named successor (`"Next": "<name>"`).
    Next(String),
}

/// Holds either the terminal marker or the name of the successor state.
///
/// Setting one replaces the other, so a configured field always holds
/// exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextField {
    transition: Option<Transition>,
}

impl NextField {
    /// Create an unconfigured field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the owner as a terminal state.
    pub fn end(&mut self) -> &mut Self {
        self.transition = Some(Transition::End);
        self
    }

    /// Continue with the state called `state`.
    pub fn set(&mut self, state: impl Into<String>) -> &mut Self {
        self.transition = Some(Transition::Next(state.into()));
        self
    }

    /// Forget the configured transition.
    pub fn reset(&mut self) -> &mut Self {
        self.transition = None;
        self
    }

    pub fn is_end(&self) -> bool {
        matches!(self.transition, Some(Transition::End))
    }

    /// Name of the successor state, if one is configured.
    pub fn get(&self) -> Option<&str> {
        match &self.transition {
            Some(Transition::Next(name)) => Some(name),
            _ => None,
        }
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// A transition must be configured and a successor name must not be empty.
    pub fn validate(&self) -> Result<()> {
        match &self.transition {
            None => Err(FlowError::validation(
                "next state is not configured; call end() or set a successor",
            )),
            Some(Transition::Next(name)) if name.is_empty() => {
                Err(FlowError::validation("next state name is empty"))
            }
            Some(_) => Ok(()),
        }
    }
}

impl Field for NextField {
    fn kind(&self) -> FieldKind {
        FieldKind::Next
    }

    fn is_configured(&self) -> bool {
        self.transition.is_some()
    }
}
