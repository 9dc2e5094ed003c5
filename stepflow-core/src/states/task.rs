use super::check_next;
use crate::{
    error::FlowError,
    fields::{CatchField, FieldMut, FieldRef, NextField, PathField, ResultPathField, RetryField},
};

/// Performs a unit of work identified by a resource URI.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub(super) name: String,
    pub(super) comment: Option<String>,
    resource: Option<String>,
    timeout_seconds: Option<u64>,
    heartbeat_seconds: Option<u64>,
    pub path: PathField,
    pub next: NextField,
    pub result_path: ResultPathField,
    pub retry: RetryField,
    pub catch: CatchField,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            resource: None,
            timeout_seconds: None,
            heartbeat_seconds: None,
            path: PathField::new(),
            next: NextField::new(),
            result_path: ResultPathField::new(),
            retry: RetryField::new(),
            catch: CatchField::new(),
        }
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn set_resource(&mut self, resource: impl Into<String>) -> &mut Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    /// Maximum run time of the task.
    pub fn set_timeout_seconds(&mut self, seconds: u64) -> &mut Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn heartbeat_seconds(&self) -> Option<u64> {
        self.heartbeat_seconds
    }

    /// Maximum time between two heartbeats of the task.
    pub fn set_heartbeat_seconds(&mut self, seconds: u64) -> &mut Self {
        self.heartbeat_seconds = Some(seconds);
        self
    }

    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        vec![
            FieldRef::Path(&self.path),
            FieldRef::Next(&self.next),
            FieldRef::ResultPath(&self.result_path),
            FieldRef::Retry(&self.retry),
            FieldRef::Catch(&self.catch),
        ]
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        vec![
            FieldMut::Path(&mut self.path),
            FieldMut::Next(&mut self.next),
            FieldMut::ResultPath(&mut self.result_path),
            FieldMut::Retry(&mut self.retry),
            FieldMut::Catch(&mut self.catch),
        ]
    }

    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = Vec::new();
        match self.resource.as_deref() {
            Some(resource) if !resource.is_empty() => {}
            _ => errors.push(FlowError::validation("Resource is required")),
        }
        if self.timeout_seconds == Some(0) {
            errors.push(FlowError::validation("TimeoutSeconds must be positive"));
        }
        if self.heartbeat_seconds == Some(0) {
            errors.push(FlowError::validation("HeartbeatSeconds must be positive"));
        }
        if let (Some(heartbeat), Some(timeout)) = (self.heartbeat_seconds, self.timeout_seconds) {
            if heartbeat >= timeout {
                errors.push(FlowError::validation(format!(
                    "HeartbeatSeconds ({heartbeat}) must be smaller than TimeoutSeconds ({timeout})"
                )));
            }
        }
        check_next(&self.next, &mut errors);
        errors.extend(self.retry.validate());
        errors.extend(self.catch.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_task() {
        let mut task = Task::new("foo");
        task.set_resource("xy").next.end();
        assert_eq!(task.resource(), Some("xy"));
        assert!(task.validate().is_empty());
    }

    #[test]
    fn test_missing_resource() {
        let mut task = Task::new("foo");
        task.next.end();
        let errors = task.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Resource"));
    }

    #[test]
    fn test_timeouts() {
        let mut task = Task::new("foo");
        task.set_resource("arn:aws:lambda:us-east-1:123456789012:function:Work")
            .set_timeout_seconds(30)
            .set_heartbeat_seconds(30)
            .next
            .end();
        assert_eq!(task.validate().len(), 1);

        task.set_heartbeat_seconds(10);
        assert!(task.validate().is_empty());

        task.set_timeout_seconds(0);
        // zero timeout, and the heartbeat is no longer smaller
        assert_eq!(task.validate().len(), 2);
    }
}
