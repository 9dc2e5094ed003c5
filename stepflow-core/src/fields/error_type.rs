//! Error names matched by retriers and catchers (`ErrorEquals`).

use std::fmt;

use crate::error::FlowError;

/// Error name selector.
///
/// The predefined names of the States language have their own variants;
/// anything else (for example an exception name raised by a task) is
/// [`ErrorType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// `States.ALL`, matches any error name.
    All,
    HeartbeatTimeout,
    Timeout,
    TaskFailed,
    Permissions,
    ResultPathMatchFailure,
    ParameterPathFailure,
    BranchFailed,
    NoChoiceMatched,
    IntrinsicFailure,
    Custom(String),
}

impl ErrorType {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorType::All => "States.ALL",
            ErrorType::HeartbeatTimeout => "States.HeartbeatTimeout",
            ErrorType::Timeout => "States.Timeout",
            ErrorType::TaskFailed => "States.TaskFailed",
            ErrorType::Permissions => "States.Permissions",
            ErrorType::ResultPathMatchFailure => "States.ResultPathMatchFailure",
            ErrorType::ParameterPathFailure => "States.ParameterPathFailure",
            ErrorType::BranchFailed => "States.BranchFailed",
            ErrorType::NoChoiceMatched => "States.NoChoiceMatched",
            ErrorType::IntrinsicFailure => "States.IntrinsicFailure",
            ErrorType::Custom(name) => name,
        }
    }
}

impl From<&str> for ErrorType {
    fn from(name: &str) -> Self {
        match name {
            "States.ALL" => ErrorType::All,
            "States.HeartbeatTimeout" => ErrorType::HeartbeatTimeout,
            "States.Timeout" => ErrorType::Timeout,
            "States.TaskFailed" => ErrorType::TaskFailed,
            "States.Permissions" => ErrorType::Permissions,
            "States.ResultPathMatchFailure" => ErrorType::ResultPathMatchFailure,
            "States.ParameterPathFailure" => ErrorType::ParameterPathFailure,
            "States.BranchFailed" => ErrorType::BranchFailed,
            "States.NoChoiceMatched" => ErrorType::NoChoiceMatched,
            "States.IntrinsicFailure" => ErrorType::IntrinsicFailure,
            other => ErrorType::Custom(other.to_string()),
        }
    }
}

impl From<String> for ErrorType {
    fn from(name: String) -> Self {
        ErrorType::from(name.as_str())
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check an ordered list of `ErrorEquals` selectors.
///
/// Every entry needs at least one error name, and `States.ALL` may only appear
/// alone in the last entry.
pub(crate) fn check_selectors<'a>(
    owner: &str,
    entries: impl ExactSizeIterator<Item = &'a [ErrorType]>,
) -> Vec<FlowError> {
    let count = entries.len();
    let mut errors = Vec::new();
    for (index, error_types) in entries.enumerate() {
        if error_types.is_empty() {
            errors.push(FlowError::validation(format!(
                "{owner} #{index} must match at least one error name"
            )));
            continue;
        }
        if error_types.contains(&ErrorType::All) && (error_types.len() > 1 || index + 1 != count) {
            errors.push(FlowError::validation(format!(
                "{owner} #{index}: States.ALL must appear alone in the last entry"
            )));
        }
    }
    errors
}
