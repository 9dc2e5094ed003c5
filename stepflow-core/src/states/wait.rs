use chrono::DateTime;

use super::check_next;
use crate::{
    error::{FlowError, Result},
    fields::{FieldMut, FieldRef, NextField, PathField},
    json_path::{self, JsonPathValidator, PathValidator},
};

/// Delays the execution for a fixed time or until a point in time.
///
/// Exactly one of the four delay attributes must be set.
#[derive(Debug, Clone, PartialEq)]
pub struct Wait {
    pub(super) name: String,
    pub(super) comment: Option<String>,
    seconds: Option<u64>,
    timestamp: Option<String>,
    seconds_path: Option<String>,
    timestamp_path: Option<String>,
    pub path: PathField,
    pub next: NextField,
}

impl Wait {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            seconds: None,
            timestamp: None,
            seconds_path: None,
            timestamp_path: None,
            path: PathField::new(),
            next: NextField::new(),
        }
    }

    pub fn seconds(&self) -> Option<u64> {
        self.seconds
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn seconds_path(&self) -> Option<&str> {
        self.seconds_path.as_deref()
    }

    pub fn timestamp_path(&self) -> Option<&str> {
        self.timestamp_path.as_deref()
    }

    pub fn set_seconds(&mut self, seconds: u64) -> &mut Self {
        self.seconds = Some(seconds);
        self
    }

    /// Wait until an RFC 3339 point in time, e.g. `2016-03-14T01:59:00Z`.
    pub fn set_timestamp(&mut self, timestamp: &str) -> Result<&mut Self> {
        DateTime::parse_from_rfc3339(timestamp).map_err(|err| {
            FlowError::validation(format!("Timestamp {timestamp:?} is not RFC 3339: {err}"))
        })?;
        self.timestamp = Some(timestamp.to_string());
        Ok(self)
    }

    pub fn set_seconds_path(&mut self, path: &str) -> Result<&mut Self> {
        self.set_seconds_path_with(&JsonPathValidator, path)
    }

    pub fn set_seconds_path_with(
        &mut self,
        validator: &dyn PathValidator,
        path: &str,
    ) -> Result<&mut Self> {
        json_path::ensure_valid(validator, path)?;
        self.seconds_path = Some(path.to_string());
        Ok(self)
    }

    pub fn set_timestamp_path(&mut self, path: &str) -> Result<&mut Self> {
        self.set_timestamp_path_with(&JsonPathValidator, path)
    }

    pub fn set_timestamp_path_with(
        &mut self,
        validator: &dyn PathValidator,
        path: &str,
    ) -> Result<&mut Self> {
        json_path::ensure_valid(validator, path)?;
        self.timestamp_path = Some(path.to_string());
        Ok(self)
    }

    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        vec![FieldRef::Path(&self.path), FieldRef::Next(&self.next)]
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        vec![FieldMut::Path(&mut self.path), FieldMut::Next(&mut self.next)]
    }

    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = Vec::new();
        let configured = [
            self.seconds.is_some(),
            self.timestamp.is_some(),
            self.seconds_path.is_some(),
            self.timestamp_path.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();
        if configured != 1 {
            errors.push(FlowError::validation(format!(
                "exactly one of Seconds, Timestamp, SecondsPath or TimestampPath is required, found {configured}"
            )));
        }
        check_next(&self.next, &mut errors);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_delay() {
        let mut wait = Wait::new("Hold");
        wait.next.set("Go");
        assert_eq!(wait.validate().len(), 1);

        wait.set_seconds(1);
        assert!(wait.validate().is_empty());

        wait.set_seconds_path("$.delay").unwrap();
        assert_eq!(wait.validate().len(), 1);
    }

    #[test]
    fn test_timestamp_must_parse() {
        let mut wait = Wait::new("Hold");
        assert!(wait.set_timestamp("tomorrow").is_err());
        assert_eq!(wait.timestamp(), None);
        wait.set_timestamp("2016-03-14T01:59:00Z").unwrap();
        assert_eq!(wait.timestamp(), Some("2016-03-14T01:59:00Z"));
    }

    #[test]
    fn test_paths_are_checked() {
        let mut wait = Wait::new("Hold");
        assert!(wait.set_timestamp_path("expiry").unwrap_err().is_validation());
        wait.set_timestamp_path("$.expiry").unwrap();
        assert_eq!(wait.timestamp_path(), Some("$.expiry"));
    }
}
