//! Error types for StepFlow definitions.

use std::fmt;

use thiserror::Error;

/// Result type for definition operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Error types that can occur while building, validating or mapping a
/// workflow definition.
#[derive(Error, Debug)]
pub enum FlowError {
    /// A structural or semantic invariant is violated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A path expression was rejected by the path validator.
    #[error("Invalid json-path: {0:?}")]
    InvalidPath(String),

    /// A document key holds a value of the wrong shape.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// Wire key
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// No hydrator or constructor is registered for a discriminant or kind.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A transition target does not resolve within its namespace.
    #[error("State '{state}' refers to unknown state '{target}'")]
    GraphIntegrity {
        /// State holding the reference
        state: String,
        /// Name that failed to resolve
        target: String,
    },

    /// The declared start state is not part of its collection.
    #[error("Start state '{0}' is not defined")]
    MissingStartState(String),

    /// JSON encoding error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML encoding error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FlowError {
    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new invalid path error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Create a new invalid field error.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new lookup error.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a new graph integrity error.
    pub fn graph_integrity(state: impl Into<String>, target: impl Into<String>) -> Self {
        Self::GraphIntegrity {
            state: state.into(),
            target: target.into(),
        }
    }

    /// Prefix the message of a validation or field error with `context`.
    ///
    /// Other variants already identify their subject and are returned as is.
    pub fn context(self, context: impl fmt::Display) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(format!("{context}: {msg}")),
            Self::InvalidField { field, message } => Self::InvalidField {
                field,
                message: format!("{context}: {message}"),
            },
            other => other,
        }
    }

    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::InvalidPath(_) | Self::InvalidField { .. } => {
                ErrorCategory::Validation
            }
            Self::Lookup(_) => ErrorCategory::Lookup,
            Self::GraphIntegrity { .. } | Self::MissingStartState(_) => {
                ErrorCategory::GraphIntegrity
            }
            Self::Serialization(_) | Self::Yaml(_) => ErrorCategory::Serialization,
        }
    }

    /// Check if the error belongs to the validation family.
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Check if the error is a registry lookup failure.
    pub fn is_lookup(&self) -> bool {
        self.category() == ErrorCategory::Lookup
    }

    /// Check if the error is an unresolved graph reference.
    pub fn is_graph_integrity(&self) -> bool {
        self.category() == ErrorCategory::GraphIntegrity
    }
}

/// Error categories for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Lookup,
    GraphIntegrity,
    Serialization,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Lookup => write!(f, "lookup"),
            ErrorCategory::GraphIntegrity => write!(f, "graph_integrity"),
            ErrorCategory::Serialization => write!(f, "serialization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(FlowError::invalid_path("-.x").is_validation());
        assert!(FlowError::invalid_field("Seconds", "expected an integer").is_validation());
        assert!(FlowError::lookup("Type 'Map'").is_lookup());
        assert!(FlowError::graph_integrity("a", "b").is_graph_integrity());
        assert!(FlowError::MissingStartState("x".into()).is_graph_integrity());
        assert_eq!(ErrorCategory::GraphIntegrity.to_string(), "graph_integrity");
    }

    #[test]
    fn test_context_prefixes_messages() {
        let err = FlowError::validation("no Variable").context("Choices[0]");
        assert_eq!(err.to_string(), "Validation error: Choices[0]: no Variable");

        let err = FlowError::lookup("Type 'Map'").context("ignored");
        assert_eq!(err.to_string(), "Lookup error: Type 'Map'");
    }

    #[test]
    fn test_error_messages() {
        let err = FlowError::graph_integrity("Route", "Nowhere");
        assert_eq!(
            err.to_string(),
            "State 'Route' refers to unknown state 'Nowhere'"
        );
        assert_eq!(
            FlowError::invalid_path("-.test").to_string(),
            "Invalid json-path: \"-.test\""
        );
    }
}
