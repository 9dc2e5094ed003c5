//! Literal result of a Pass state (`Result`).

use serde_json::{Map, Value};

use super::{Field, FieldKind};

/// Literal payload substituted as the output of a virtual task.
///
/// The payload is usually an object built key by key with [`ResultField::set`],
/// but any JSON value can be installed with [`ResultField::replace`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultField {
    value: Option<Value>,
}

impl ResultField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a single key of the result object.
    ///
    /// A non-object payload is replaced by an empty object first.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let payload = self
            .value
            .get_or_insert_with(|| Value::Object(Map::new()));
        if !payload.is_object() {
            *payload = Value::Object(Map::new());
        }
        if let Value::Object(map) = payload {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Install `value` as the whole payload.
    pub fn replace(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.as_ref().and_then(|value| value.get(key))
    }

    /// The whole payload; an empty object while unconfigured.
    pub fn get_all(&self) -> Value {
        self.value
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn reset(&mut self) -> &mut Self {
        self.value = None;
        self
    }
}

impl Field for ResultField {
    fn kind(&self) -> FieldKind {
        FieldKind::Result
    }

    fn is_configured(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_result_by_default() {
        let field = ResultField::new();
        assert_eq!(field.get_all(), json!({}));
        assert!(!field.is_configured());
    }

    #[test]
    fn test_incremental_assignment() {
        let mut field = ResultField::new();
        field.set("test", 0).set("test2", 1);
        assert!(field.is_configured());
        assert_eq!(field.get_all(), json!({"test": 0, "test2": 1}));
        assert_eq!(field.get("test"), Some(&json!(0)));
    }

    #[test]
    fn test_replace_with_scalar_then_set() {
        let mut field = ResultField::new();
        field.replace("$.test");
        assert_eq!(field.value(), Some(&json!("$.test")));

        field.set("k", true);
        assert_eq!(field.get_all(), json!({"k": true}));
    }
}
