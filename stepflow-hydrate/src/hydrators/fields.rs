//! Field hydrators.

use serde_json::Value;
use stepflow_core::{
    error::{FlowError, Result},
    fields::{
        CatchField, Catcher, Field, FieldKind, FieldMut, FieldRef, ResultPath, Retrier, RetryField,
        Transition,
    },
};

use super::value::{
    check_keys, error_types_value, field_mismatch, get_bool, get_error_types, get_number,
    get_objects, get_str, get_u32,
};
use crate::{Object, manager::HydratorManager, registry::FieldHydrator};

/// `Next` / `End`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextHydrator;

impl FieldHydrator for NextHydrator {
    fn name(&self) -> &'static str {
        "NextFieldHydrator"
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Next
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Next", "End"]
    }

    fn hydrate(
        &self,
        _manager: &HydratorManager,
        field: FieldMut<'_>,
        data: &Object,
    ) -> Result<()> {
        let kind = field.kind();
        let FieldMut::Next(next) = field else {
            return Err(field_mismatch(self.kind(), kind));
        };
        match (get_str(data, "Next")?, get_bool(data, "End")?) {
            (Some(_), Some(_)) => Err(FlowError::invalid_field(
                "End",
                "Next and End are mutually exclusive",
            )),
            (_, Some(false)) => Err(FlowError::invalid_field(
                "End",
                "End must be true when present",
            )),
            (Some(name), None) => {
                next.set(name);
                Ok(())
            }
            (None, Some(true)) => {
                next.end();
                Ok(())
            }
            (None, None) => Ok(()),
        }
    }

    fn extract(&self, _manager: &HydratorManager, field: FieldRef<'_>) -> Result<Object> {
        let FieldRef::Next(next) = field else {
            return Err(field_mismatch(self.kind(), field.kind()));
        };
        let mut data = Object::new();
        match next.transition() {
            Some(Transition::End) => {
                data.insert("End".into(), Value::Bool(true));
            }
            Some(Transition::Next(name)) => {
                data.insert("Next".into(), Value::String(name.clone()));
            }
            None => {}
        }
        Ok(data)
    }
}

/// `InputPath` / `OutputPath`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathHydrator;

impl FieldHydrator for PathHydrator {
    fn name(&self) -> &'static str {
        "PathFieldHydrator"
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Path
    }

    fn keys(&self) -> &'static [&'static str] {
        &["InputPath", "OutputPath"]
    }

    fn hydrate(&self, manager: &HydratorManager, field: FieldMut<'_>, data: &Object) -> Result<()> {
        let kind = field.kind();
        let FieldMut::Path(path) = field else {
            return Err(field_mismatch(self.kind(), kind));
        };
        let input = get_str(data, "InputPath")?;
        let output = get_str(data, "OutputPath")?;
        let mut hydrated = path.clone();
        if let Some(input) = input {
            hydrated.set_input_with(manager.path_validator(), input)?;
        }
        if let Some(output) = output {
            hydrated.set_output_with(manager.path_validator(), output)?;
        }
        *path = hydrated;
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, field: FieldRef<'_>) -> Result<Object> {
        let FieldRef::Path(path) = field else {
            return Err(field_mismatch(self.kind(), field.kind()));
        };
        let mut data = Object::new();
        if let Some(input) = path.input() {
            data.insert("InputPath".into(), Value::String(input.to_string()));
        }
        if let Some(output) = path.output() {
            data.insert("OutputPath".into(), Value::String(output.to_string()));
        }
        Ok(data)
    }
}

/// `Result`, copied verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultHydrator;

impl FieldHydrator for ResultHydrator {
    fn name(&self) -> &'static str {
        "ResultFieldHydrator"
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Result
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Result"]
    }

    fn hydrate(
        &self,
        _manager: &HydratorManager,
        field: FieldMut<'_>,
        data: &Object,
    ) -> Result<()> {
        let kind = field.kind();
        let FieldMut::Result(result) = field else {
            return Err(field_mismatch(self.kind(), kind));
        };
        if let Some(value) = data.get("Result") {
            result.replace(value.clone());
        }
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, field: FieldRef<'_>) -> Result<Object> {
        let FieldRef::Result(result) = field else {
            return Err(field_mismatch(self.kind(), field.kind()));
        };
        let mut data = Object::new();
        if let Some(value) = result.value() {
            data.insert("Result".into(), value.clone());
        }
        Ok(data)
    }
}

/// `ResultPath`; JSON `null` discards the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPathHydrator;

impl FieldHydrator for ResultPathHydrator {
    fn name(&self) -> &'static str {
        "ResultPathFieldHydrator"
    }

    fn kind(&self) -> FieldKind {
        FieldKind::ResultPath
    }

    fn keys(&self) -> &'static [&'static str] {
        &["ResultPath"]
    }

    fn hydrate(&self, manager: &HydratorManager, field: FieldMut<'_>, data: &Object) -> Result<()> {
        let kind = field.kind();
        let FieldMut::ResultPath(result_path) = field else {
            return Err(field_mismatch(self.kind(), kind));
        };
        match data.get("ResultPath") {
            None => {}
            Some(Value::Null) => {
                result_path.discard();
            }
            Some(Value::String(path)) => {
                result_path.set_with(manager.path_validator(), path)?;
            }
            Some(other) => {
                return Err(FlowError::invalid_field(
                    "ResultPath",
                    format!("expected a path or null, got {other}"),
                ));
            }
        }
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, field: FieldRef<'_>) -> Result<Object> {
        let FieldRef::ResultPath(result_path) = field else {
            return Err(field_mismatch(self.kind(), field.kind()));
        };
        let mut data = Object::new();
        match result_path.value() {
            Some(ResultPath::Discard) => {
                data.insert("ResultPath".into(), Value::Null);
            }
            Some(ResultPath::Path(path)) => {
                data.insert("ResultPath".into(), Value::String(path.clone()));
            }
            None => {}
        }
        Ok(data)
    }
}

const RETRIER_KEYS: &[&str] = &["ErrorEquals", "IntervalSeconds", "MaxAttempts", "BackoffRate"];

/// `Retry`, an ordered list of retriers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryHydrator;

impl FieldHydrator for RetryHydrator {
    fn name(&self) -> &'static str {
        "RetryFieldHydrator"
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Retry
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Retry"]
    }

    fn hydrate(&self, manager: &HydratorManager, field: FieldMut<'_>, data: &Object) -> Result<()> {
        let kind = field.kind();
        let FieldMut::Retry(retry) = field else {
            return Err(field_mismatch(self.kind(), kind));
        };
        let Some(items) = get_objects(data, "Retry")? else {
            return Ok(());
        };
        let mut hydrated = RetryField::new();
        hydrated.clear();
        for (index, item) in items.into_iter().enumerate() {
            check_keys(manager, "a retrier", item, RETRIER_KEYS)?;
            let retrier = hydrated.push(Retrier::new(get_error_types(item)?));
            if let Some(interval) = get_u32(item, "IntervalSeconds")? {
                retrier.set_interval(interval);
            }
            if let Some(attempts) = get_u32(item, "MaxAttempts")? {
                retrier.set_max_attempts(attempts);
            }
            if let Some(rate) = get_number(item, "BackoffRate")? {
                retrier
                    .set_backoff_rate_number(rate.clone())
                    .map_err(|err| err.context(format_args!("Retry[{index}]")))?;
            }
        }
        *retry = hydrated;
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, field: FieldRef<'_>) -> Result<Object> {
        let FieldRef::Retry(retry) = field else {
            return Err(field_mismatch(self.kind(), field.kind()));
        };
        let mut data = Object::new();
        if !retry.is_configured() {
            return Ok(data);
        }
        let retriers = retry
            .retries()
            .iter()
            .map(|retrier| {
                let mut item = Object::new();
                item.insert("ErrorEquals".into(), error_types_value(retrier.error_types()));
                if let Some(interval) = retrier.interval() {
                    item.insert("IntervalSeconds".into(), interval.into());
                }
                if let Some(attempts) = retrier.max_attempts() {
                    item.insert("MaxAttempts".into(), attempts.into());
                }
                if let Some(rate) = retrier.backoff_rate_number() {
                    item.insert("BackoffRate".into(), Value::Number(rate.clone()));
                }
                Value::Object(item)
            })
            .collect();
        data.insert("Retry".into(), Value::Array(retriers));
        Ok(data)
    }
}

const CATCHER_KEYS: &[&str] = &["ErrorEquals", "Next", "End", "ResultPath"];

/// `Catch`, an ordered list of catchers.
///
/// Each catcher's transition and result path are mapped through the manager
/// like any other field.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatchHydrator;

impl FieldHydrator for CatchHydrator {
    fn name(&self) -> &'static str {
        "CatchFieldHydrator"
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Catch
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Catch"]
    }

    fn hydrate(&self, manager: &HydratorManager, field: FieldMut<'_>, data: &Object) -> Result<()> {
        let kind = field.kind();
        let FieldMut::Catch(catch) = field else {
            return Err(field_mismatch(self.kind(), kind));
        };
        let Some(items) = get_objects(data, "Catch")? else {
            return Ok(());
        };
        let mut hydrated = CatchField::new();
        hydrated.clear();
        for item in items {
            check_keys(manager, "a catcher", item, CATCHER_KEYS)?;
            let catcher = hydrated.push(Catcher::new(get_error_types(item)?));
            manager.hydrate_field(FieldMut::Next(&mut catcher.next), item)?;
            manager.hydrate_field(FieldMut::ResultPath(&mut catcher.result_path), item)?;
        }
        *catch = hydrated;
        Ok(())
    }

    fn extract(&self, manager: &HydratorManager, field: FieldRef<'_>) -> Result<Object> {
        let FieldRef::Catch(catch) = field else {
            return Err(field_mismatch(self.kind(), field.kind()));
        };
        let mut data = Object::new();
        if !catch.is_configured() {
            return Ok(data);
        }
        let mut catchers = Vec::with_capacity(catch.catchers().len());
        for catcher in catch.catchers() {
            let mut item = Object::new();
            item.insert("ErrorEquals".into(), error_types_value(catcher.error_types()));
            item.extend(manager.extract_field(FieldRef::Next(&catcher.next))?);
            item.extend(manager.extract_field(FieldRef::ResultPath(&catcher.result_path))?);
            catchers.push(Value::Object(item));
        }
        data.insert("Catch".into(), Value::Array(catchers));
        Ok(data)
    }
}
