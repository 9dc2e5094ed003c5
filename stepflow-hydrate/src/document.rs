//! Definition documents in JSON or YAML text form.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stepflow_core::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Guess the format from a file extension (`json`, `yaml`, `yml`, `asl`).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" | "asl" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

/// A parsed definition document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    value: Value,
    format: Format,
}

impl Document {
    pub fn new(value: Value, format: Format) -> Self {
        Self { value, format }
    }

    pub fn parse(text: &str, format: Format) -> Result<Self> {
        let value = match format {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
        };
        Ok(Self { value, format })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Render the document; `pretty` only affects JSON output.
    pub fn render(&self, pretty: bool) -> Result<String> {
        let text = match (self.format, pretty) {
            (Format::Json, true) => serde_json::to_string_pretty(&self.value)?,
            (Format::Json, false) => serde_json::to_string(&self.value)?,
            (Format::Yaml, _) => serde_yaml::to_string(&self.value)?,
        };
        Ok(text)
    }
}
