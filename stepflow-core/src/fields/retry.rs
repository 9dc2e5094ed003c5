//! Retry policies (`Retry`).

use serde_json::Number;

use super::{ErrorType, Field, FieldKind, error_type::check_selectors};
use crate::error::{FlowError, Result};

/// One retry policy: which errors it matches and how retries are spaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrier {
    error_types: Vec<ErrorType>,
    max_attempts: Option<u32>,
    backoff_rate: Option<Number>,
    interval: Option<u32>,
}

impl Retrier {
    pub fn new<I, E>(error_types: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ErrorType>,
    {
        Self {
            error_types: error_types.into_iter().map(Into::into).collect(),
            max_attempts: None,
            backoff_rate: None,
            interval: None,
        }
    }

    pub fn error_types(&self) -> &[ErrorType] {
        &self.error_types
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn backoff_rate(&self) -> Option<f64> {
        self.backoff_rate.as_ref().and_then(Number::as_f64)
    }

    /// Backoff rate exactly as it appears on the wire.
    pub fn backoff_rate_number(&self) -> Option<&Number> {
        self.backoff_rate.as_ref()
    }

    /// Seconds before the first retry.
    pub fn interval(&self) -> Option<u32> {
        self.interval
    }

    pub fn set_max_attempts(&mut self, attempts: u32) -> &mut Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Multiplier applied to the interval after each attempt; must be finite and >= 1.0.
    pub fn set_backoff_rate(&mut self, rate: f64) -> Result<&mut Self> {
        if !rate.is_finite() || rate < 1.0 {
            return Err(FlowError::validation(format!(
                "backoff rate must be a finite number >= 1.0, got {rate}"
            )));
        }
        let number = if rate.fract() == 0.0 && rate <= u32::MAX as f64 {
            Number::from(rate as u32)
        } else {
            Number::from_f64(rate).ok_or_else(|| {
                FlowError::validation(format!("backoff rate {rate} is not representable"))
            })?
        };
        self.backoff_rate = Some(number);
        Ok(self)
    }

    /// Install the backoff rate verbatim, keeping its integer/float representation.
    pub fn set_backoff_rate_number(&mut self, rate: Number) -> Result<&mut Self> {
        match rate.as_f64() {
            Some(value) if value >= 1.0 => {
                self.backoff_rate = Some(rate);
                Ok(self)
            }
            _ => Err(FlowError::validation(format!(
                "backoff rate must be >= 1.0, got {rate}"
            ))),
        }
    }

    pub fn set_interval(&mut self, seconds: u32) -> &mut Self {
        self.interval = Some(seconds);
        self
    }

    fn validate(&self, index: usize) -> Vec<FlowError> {
        let mut errors = Vec::new();
        if self.interval == Some(0) {
            errors.push(FlowError::validation(format!(
                "Retrier #{index}: IntervalSeconds must be positive"
            )));
        }
        errors
    }
}

/// Ordered retry policies; the first retrier matching a raised error wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryField {
    /// `None` while unset; `Some(vec![])` for an explicit empty list.
    retriers: Option<Vec<Retrier>>,
}

impl RetryField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a retrier matching any error (`States.ALL`).
    pub fn all(&mut self) -> &mut Retrier {
        self.errors([ErrorType::All])
    }

    /// Append a retrier matching the given error names.
    pub fn errors<I, E>(&mut self, error_types: I) -> &mut Retrier
    where
        I: IntoIterator<Item = E>,
        E: Into<ErrorType>,
    {
        self.push(Retrier::new(error_types))
    }

    pub fn push(&mut self, retrier: Retrier) -> &mut Retrier {
        let retriers = self.retriers.get_or_insert_with(Vec::new);
        retriers.push(retrier);
        let last = retriers.len() - 1;
        &mut retriers[last]
    }

    pub fn retries(&self) -> &[Retrier] {
        self.retriers.as_deref().unwrap_or_default()
    }

    /// Configure an explicit empty list, dropping any entries.
    pub fn clear(&mut self) -> &mut Self {
        self.retriers = Some(Vec::new());
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.retriers = None;
        self
    }

    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = check_selectors(
            "Retrier",
            self.retries().iter().map(Retrier::error_types),
        );
        for (index, retrier) in self.retries().iter().enumerate() {
            errors.extend(retrier.validate(index));
        }
        errors
    }
}

impl Field for RetryField {
    fn kind(&self) -> FieldKind {
        FieldKind::Retry
    }

    fn is_configured(&self) -> bool {
        self.retriers.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_retrier() {
        let mut field = RetryField::new();
        assert!(!field.is_configured());

        field
            .all()
            .set_max_attempts(1)
            .set_interval(3)
            .set_backoff_rate(2.0)
            .unwrap();

        assert!(field.is_configured());
        let [retrier] = field.retries() else {
            panic!("expected one retrier");
        };
        assert_eq!(retrier.error_types(), &[ErrorType::All]);
        assert_eq!(retrier.max_attempts(), Some(1));
        assert_eq!(retrier.backoff_rate(), Some(2.0));
        assert_eq!(retrier.backoff_rate_number(), Some(&Number::from(2u32)));
        assert_eq!(retrier.interval(), Some(3));
    }

    #[test]
    fn test_empty_list_is_configured() {
        let mut field = RetryField::new();
        field.clear();
        assert!(field.is_configured());
        assert!(field.retries().is_empty());
        assert!(field.validate().is_empty());

        field.all();
        field.clear();
        assert!(field.retries().is_empty());

        field.reset();
        assert!(!field.is_configured());
        let mut empty = RetryField::new();
        empty.clear();
        assert_ne!(field, empty);
    }

    #[test]
    fn test_order_is_preserved() {
        let mut field = RetryField::new();
        field.errors(["States.BranchFailed", "States.Permissions"]);
        field.all();

        let names: Vec<_> = field
            .retries()
            .iter()
            .map(|r| r.error_types()[0].clone())
            .collect();
        assert_eq!(names, vec![ErrorType::BranchFailed, ErrorType::All]);
        assert!(field.validate().is_empty());
    }

    #[test]
    fn test_backoff_rate_bounds() {
        let mut retrier = Retrier::new([ErrorType::Timeout]);
        assert!(retrier.set_backoff_rate(0.5).is_err());
        assert!(retrier.set_backoff_rate(f64::NAN).is_err());
        assert_eq!(retrier.backoff_rate(), None);

        retrier.set_backoff_rate(1.5).unwrap();
        assert_eq!(retrier.backoff_rate(), Some(1.5));
    }

    #[test]
    fn test_validation_rules() {
        let mut field = RetryField::new();
        field.all();
        field.errors([ErrorType::Timeout]).set_interval(0);
        let errors = field.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(FlowError::is_validation));
    }
}
