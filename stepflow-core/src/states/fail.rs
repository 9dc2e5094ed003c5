use crate::{
    error::FlowError,
    fields::{FieldMut, FieldRef},
};

/// Stops an execution and marks it as a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Fail {
    pub(super) name: String,
    pub(super) comment: Option<String>,
    error: Option<String>,
    cause: Option<String>,
}

impl Fail {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            error: None,
            cause: None,
        }
    }

    /// Builder form setting both the error name and the human readable cause.
    pub fn with_error(mut self, error: impl Into<String>, cause: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.cause = Some(cause.into());
        self
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.error = Some(error.into());
        self
    }

    pub fn set_cause(&mut self, cause: impl Into<String>) -> &mut Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        Vec::new()
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        Vec::new()
    }

    pub fn validate(&self) -> Vec<FlowError> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ErrorType;

    #[test]
    fn test_with_error() {
        let fail =
            Fail::new("Rejected").with_error(ErrorType::TaskFailed.as_str(), "order was rejected");
        assert_eq!(fail.error(), Some("States.TaskFailed"));
        assert_eq!(fail.cause(), Some("order was rejected"));
        assert!(fail.validate().is_empty());
    }
}
