//! Manager configuration.

use serde::{Deserialize, Serialize};
use stepflow_core::error::Result;

/// What to do with keys no hydrator knows about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeyPolicy {
    /// Skip them silently.
    #[default]
    Ignore,
    /// Fail with an invalid field error.
    Reject,
}

/// Settings of a [`HydratorManager`](crate::manager::HydratorManager).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydratorConfig {
    pub unknown_keys: UnknownKeyPolicy,
    /// Validate states (and the whole graph for machines) before extracting them.
    pub validate_on_extract: bool,
}

impl HydratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict preset: unknown keys are rejected and extraction validates.
    pub fn strict() -> Self {
        Self {
            unknown_keys: UnknownKeyPolicy::Reject,
            validate_on_extract: true,
        }
    }

    /// Load settings from a YAML (or JSON) snippet. Missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn with_validate_on_extract(mut self, validate: bool) -> Self {
        self.validate_on_extract = validate;
        self
    }
}
