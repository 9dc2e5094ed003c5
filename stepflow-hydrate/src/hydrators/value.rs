//! Typed accessors over JSON objects for hydrator implementations.
//!
//! Every accessor treats a missing key as `None` and a key holding a value of
//! the wrong shape as [`FlowError::InvalidField`].

use serde_json::{Number, Value};
use stepflow_core::{
    error::{FlowError, Result},
    fields::{ErrorType, FieldKind},
    states::StateKind,
};

use crate::{Object, config::UnknownKeyPolicy, manager::HydratorManager};

pub fn as_object<'a>(key: &str, value: &'a Value) -> Result<&'a Object> {
    value
        .as_object()
        .ok_or_else(|| FlowError::invalid_field(key, format!("expected an object, got {value}")))
}

pub fn get_str<'a>(data: &'a Object, key: &str) -> Result<Option<&'a str>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(FlowError::invalid_field(
            key,
            format!("expected a string, got {other}"),
        )),
    }
}

pub fn get_bool(data: &Object, key: &str) -> Result<Option<bool>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(other) => Err(FlowError::invalid_field(
            key,
            format!("expected a boolean, got {other}"),
        )),
    }
}

pub fn get_u64(data: &Object, key: &str) -> Result<Option<u64>> {
    match data.get(key) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            FlowError::invalid_field(key, format!("expected a non-negative integer, got {value}"))
        }),
    }
}

pub fn get_u32(data: &Object, key: &str) -> Result<Option<u32>> {
    match get_u64(data, key)? {
        None => Ok(None),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| FlowError::invalid_field(key, format!("{value} is out of range"))),
    }
}

pub fn get_number<'a>(data: &'a Object, key: &str) -> Result<Option<&'a Number>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Number(number)) => Ok(Some(number)),
        Some(other) => Err(FlowError::invalid_field(
            key,
            format!("expected a number, got {other}"),
        )),
    }
}

pub fn get_array<'a>(data: &'a Object, key: &str) -> Result<Option<&'a Vec<Value>>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(FlowError::invalid_field(
            key,
            format!("expected an array, got {other}"),
        )),
    }
}

pub fn require<T>(key: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| FlowError::invalid_field(key, "is required"))
}

/// Elements of the array under `key`, each required to be an object.
pub fn get_objects<'a>(data: &'a Object, key: &str) -> Result<Option<Vec<&'a Object>>> {
    let Some(items) = get_array(data, key)? else {
        return Ok(None);
    };
    items
        .iter()
        .map(|item| as_object(key, item))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Required, non-empty `ErrorEquals` list.
pub fn get_error_types(data: &Object) -> Result<Vec<ErrorType>> {
    let items = require("ErrorEquals", get_array(data, "ErrorEquals")?)?;
    if items.is_empty() {
        return Err(FlowError::invalid_field(
            "ErrorEquals",
            "must name at least one error",
        ));
    }
    items
        .iter()
        .map(|item| match item {
            Value::String(name) => Ok(ErrorType::from(name.as_str())),
            other => Err(FlowError::invalid_field(
                "ErrorEquals",
                format!("expected error names, got {other}"),
            )),
        })
        .collect()
}

pub fn error_types_value(error_types: &[ErrorType]) -> Value {
    Value::Array(
        error_types
            .iter()
            .map(|error| Value::String(error.as_str().to_string()))
            .collect(),
    )
}

/// Under [`UnknownKeyPolicy::Reject`], fail on the first key of `data` that is
/// not in `allowed`.
pub fn check_keys(
    manager: &HydratorManager,
    owner: &str,
    data: &Object,
    allowed: &[&str],
) -> Result<()> {
    if manager.config().unknown_keys == UnknownKeyPolicy::Ignore {
        return Ok(());
    }
    match data.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(FlowError::invalid_field(
            key.as_str(),
            format!("unknown key for {owner}"),
        )),
        None => Ok(()),
    }
}

pub fn state_mismatch(expected: StateKind, actual: StateKind) -> FlowError {
    FlowError::lookup(format!("{expected} hydrator cannot map a {actual} state"))
}

pub fn field_mismatch(expected: FieldKind, actual: FieldKind) -> FlowError {
    FlowError::lookup(format!("{expected} hydrator cannot map a {actual}"))
}
