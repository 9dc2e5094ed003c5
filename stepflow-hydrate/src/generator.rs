//! One-way serializer that walks the object model directly.
//!
//! Unlike [`HydratorManager`](crate::manager::HydratorManager) it has no
//! registry and publishes no events; each state is validated before it is
//! written. For valid definitions both produce the same maps.

use serde_json::{Value, json};
use stepflow_core::{
    choice::{ChoiceOperation, LogicRule},
    error::{FlowError, Result},
    fields::{
        CatchField, ErrorType, Field, NextField, PathField, ResultPath, ResultPathField,
        RetryField, Transition,
    },
    machine::{StateCollection, StateMachine},
    states::State,
};

use crate::Object;

pub fn generate_state_machine(machine: &StateMachine) -> Result<Object> {
    let mut data = Object::new();
    if let Some(comment) = machine.comment() {
        data.insert("Comment".into(), json!(comment));
    }
    data.extend(generate_states(&machine.states)?);
    if let Some(version) = machine.version() {
        data.insert("Version".into(), json!(version));
    }
    if let Some(timeout) = machine.timeout_seconds() {
        data.insert("TimeoutSeconds".into(), json!(timeout));
    }
    Ok(data)
}

pub fn generate_states(states: &StateCollection) -> Result<Object> {
    let mut definitions = Object::new();
    for state in states.iter() {
        definitions.insert(state.name().to_string(), Value::Object(generate_state(state)?));
    }
    let mut data = Object::new();
    if let Some(start) = states.start_state_name() {
        data.insert("StartAt".into(), json!(start));
    }
    data.insert("States".into(), Value::Object(definitions));
    Ok(data)
}

pub fn generate_state(state: &State) -> Result<Object> {
    if let Some(err) = state.validate().into_iter().next() {
        return Err(err);
    }

    let mut data = Object::new();
    data.insert("Type".into(), json!(state.kind().type_name()));
    if let Some(comment) = state.comment() {
        data.insert("Comment".into(), json!(comment));
    }

    match state {
        State::Pass(pass) => {
            path(&mut data, &pass.path);
            next(&mut data, &pass.next);
            if let Some(result) = pass.result.value() {
                data.insert("Result".into(), result.clone());
            }
            result_path(&mut data, &pass.result_path);
        }
        State::Task(task) => {
            insert_opt(&mut data, "Resource", task.resource().map(Value::from));
            insert_opt(&mut data, "TimeoutSeconds", task.timeout_seconds().map(Value::from));
            insert_opt(&mut data, "HeartbeatSeconds", task.heartbeat_seconds().map(Value::from));
            path(&mut data, &task.path);
            next(&mut data, &task.next);
            result_path(&mut data, &task.result_path);
            retry(&mut data, &task.retry);
            catch(&mut data, &task.catch);
        }
        State::Wait(wait) => {
            insert_opt(&mut data, "Seconds", wait.seconds().map(Value::from));
            insert_opt(&mut data, "Timestamp", wait.timestamp().map(Value::from));
            insert_opt(&mut data, "SecondsPath", wait.seconds_path().map(Value::from));
            insert_opt(&mut data, "TimestampPath", wait.timestamp_path().map(Value::from));
            path(&mut data, &wait.path);
            next(&mut data, &wait.next);
        }
        State::Succeed(succeed) => path(&mut data, &succeed.path),
        State::Fail(fail) => {
            insert_opt(&mut data, "Error", fail.error().map(Value::from));
            insert_opt(&mut data, "Cause", fail.cause().map(Value::from));
        }
        State::Choice(choice) => {
            let choices = choice
                .operations()
                .iter()
                .map(|operation| operation_value(operation, true))
                .collect::<Result<Vec<_>>>()?;
            data.insert("Choices".into(), Value::Array(choices));
            insert_opt(&mut data, "Default", choice.default().map(Value::from));
            path(&mut data, &choice.path);
        }
        State::Parallel(parallel) => {
            let branches = parallel
                .branches()
                .iter()
                .map(|branch| generate_states(&branch.states).map(Value::Object))
                .collect::<Result<Vec<_>>>()?;
            data.insert("Branches".into(), Value::Array(branches));
            path(&mut data, &parallel.path);
            next(&mut data, &parallel.next);
            result_path(&mut data, &parallel.result_path);
            retry(&mut data, &parallel.retry);
            catch(&mut data, &parallel.catch);
        }
    }
    Ok(data)
}

fn insert_opt(data: &mut Object, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        data.insert(key.to_string(), value);
    }
}

fn path(data: &mut Object, field: &PathField) {
    insert_opt(data, "InputPath", field.input().map(Value::from));
    insert_opt(data, "OutputPath", field.output().map(Value::from));
}

fn next(data: &mut Object, field: &NextField) {
    match field.transition() {
        Some(Transition::End) => {
            data.insert("End".into(), Value::Bool(true));
        }
        Some(Transition::Next(name)) => {
            data.insert("Next".into(), json!(name));
        }
        None => {}
    }
}

fn result_path(data: &mut Object, field: &ResultPathField) {
    match field.value() {
        Some(ResultPath::Discard) => {
            data.insert("ResultPath".into(), Value::Null);
        }
        Some(ResultPath::Path(path)) => {
            data.insert("ResultPath".into(), json!(path));
        }
        None => {}
    }
}

fn error_equals(error_types: &[ErrorType]) -> Value {
    error_types.iter().map(|error| json!(error.as_str())).collect()
}

fn retry(data: &mut Object, field: &RetryField) {
    if !field.is_configured() {
        return;
    }
    let retriers = field
        .retries()
        .iter()
        .map(|retrier| {
            let mut item = Object::new();
            item.insert("ErrorEquals".into(), error_equals(retrier.error_types()));
            insert_opt(&mut item, "IntervalSeconds", retrier.interval().map(Value::from));
            insert_opt(&mut item, "MaxAttempts", retrier.max_attempts().map(Value::from));
            insert_opt(
                &mut item,
                "BackoffRate",
                retrier.backoff_rate_number().cloned().map(Value::Number),
            );
            Value::Object(item)
        })
        .collect();
    data.insert("Retry".into(), retriers);
}

fn catch(data: &mut Object, field: &CatchField) {
    if !field.is_configured() {
        return;
    }
    let catchers = field
        .catchers()
        .iter()
        .map(|catcher| {
            let mut item = Object::new();
            item.insert("ErrorEquals".into(), error_equals(catcher.error_types()));
            next(&mut item, &catcher.next);
            result_path(&mut item, &catcher.result_path);
            Value::Object(item)
        })
        .collect();
    data.insert("Catch".into(), catchers);
}

fn operation_value(operation: &ChoiceOperation, top_level: bool) -> Result<Value> {
    let mut data = Object::new();
    match operation {
        ChoiceOperation::Comparator(comparator) => {
            insert_opt(&mut data, "Variable", comparator.variable().map(Value::from));
            insert_opt(&mut data, comparator.rule().keyword(), comparator.value().cloned());
        }
        ChoiceOperation::Logic(logic) => {
            let children = logic.operations();
            let value = match (logic.rule(), children) {
                (LogicRule::Not, [child]) => operation_value(child, false)?,
                (LogicRule::Not, _) => {
                    return Err(FlowError::validation(format!(
                        "Not requires exactly one rule, found {}",
                        children.len()
                    )));
                }
                (LogicRule::And | LogicRule::Or, _) => Value::Array(
                    children
                        .iter()
                        .map(|child| operation_value(child, false))
                        .collect::<Result<Vec<_>>>()?,
                ),
            };
            data.insert(logic.rule().keyword().into(), value);
        }
    }
    if top_level {
        next(&mut data, operation.next());
    }
    Ok(Value::Object(data))
}
