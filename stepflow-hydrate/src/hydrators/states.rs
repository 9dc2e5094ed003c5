//! State hydrators: the variant attributes of each state type.

use serde_json::Value;
use stepflow_core::{
    error::Result,
    machine::Branch,
    states::{State, StateKind},
};

use super::{
    choice::{extract_operation, hydrate_operation},
    value::{check_keys, get_objects, get_str, get_u64, require, state_mismatch},
};
use crate::{Object, manager::HydratorManager, registry::StateHydrator};

fn insert_str(data: &mut Object, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        data.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn insert_u64(data: &mut Object, key: &str, value: Option<u64>) {
    if let Some(value) = value {
        data.insert(key.to_string(), value.into());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PassHydrator;

impl StateHydrator for PassHydrator {
    fn name(&self) -> &'static str {
        "PassStateHydrator"
    }

    fn kind(&self) -> StateKind {
        StateKind::Pass
    }

    fn keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn hydrate(&self, _manager: &HydratorManager, state: &mut State, _data: &Object) -> Result<()> {
        match state {
            State::Pass(_) => Ok(()),
            other => Err(state_mismatch(self.kind(), other.kind())),
        }
    }

    fn extract(&self, _manager: &HydratorManager, state: &State) -> Result<Object> {
        match state {
            State::Pass(_) => Ok(Object::new()),
            other => Err(state_mismatch(self.kind(), other.kind())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskHydrator;

impl StateHydrator for TaskHydrator {
    fn name(&self) -> &'static str {
        "TaskStateHydrator"
    }

    fn kind(&self) -> StateKind {
        StateKind::Task
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Resource", "TimeoutSeconds", "HeartbeatSeconds"]
    }

    fn hydrate(&self, _manager: &HydratorManager, state: &mut State, data: &Object) -> Result<()> {
        let kind = state.kind();
        let State::Task(task) = state else {
            return Err(state_mismatch(self.kind(), kind));
        };
        if let Some(resource) = get_str(data, "Resource")? {
            task.set_resource(resource);
        }
        if let Some(timeout) = get_u64(data, "TimeoutSeconds")? {
            task.set_timeout_seconds(timeout);
        }
        if let Some(heartbeat) = get_u64(data, "HeartbeatSeconds")? {
            task.set_heartbeat_seconds(heartbeat);
        }
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, state: &State) -> Result<Object> {
        let State::Task(task) = state else {
            return Err(state_mismatch(self.kind(), state.kind()));
        };
        let mut data = Object::new();
        insert_str(&mut data, "Resource", task.resource());
        insert_u64(&mut data, "TimeoutSeconds", task.timeout_seconds());
        insert_u64(&mut data, "HeartbeatSeconds", task.heartbeat_seconds());
        Ok(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaitHydrator;

impl StateHydrator for WaitHydrator {
    fn name(&self) -> &'static str {
        "WaitStateHydrator"
    }

    fn kind(&self) -> StateKind {
        StateKind::Wait
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Seconds", "Timestamp", "SecondsPath", "TimestampPath"]
    }

    fn hydrate(&self, manager: &HydratorManager, state: &mut State, data: &Object) -> Result<()> {
        let kind = state.kind();
        let State::Wait(wait) = state else {
            return Err(state_mismatch(self.kind(), kind));
        };
        if let Some(seconds) = get_u64(data, "Seconds")? {
            wait.set_seconds(seconds);
        }
        if let Some(timestamp) = get_str(data, "Timestamp")? {
            wait.set_timestamp(timestamp)?;
        }
        if let Some(path) = get_str(data, "SecondsPath")? {
            wait.set_seconds_path_with(manager.path_validator(), path)?;
        }
        if let Some(path) = get_str(data, "TimestampPath")? {
            wait.set_timestamp_path_with(manager.path_validator(), path)?;
        }
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, state: &State) -> Result<Object> {
        let State::Wait(wait) = state else {
            return Err(state_mismatch(self.kind(), state.kind()));
        };
        let mut data = Object::new();
        insert_u64(&mut data, "Seconds", wait.seconds());
        insert_str(&mut data, "Timestamp", wait.timestamp());
        insert_str(&mut data, "SecondsPath", wait.seconds_path());
        insert_str(&mut data, "TimestampPath", wait.timestamp_path());
        Ok(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SucceedHydrator;

impl StateHydrator for SucceedHydrator {
    fn name(&self) -> &'static str {
        "SucceedStateHydrator"
    }

    fn kind(&self) -> StateKind {
        StateKind::Succeed
    }

    fn keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn hydrate(&self, _manager: &HydratorManager, state: &mut State, _data: &Object) -> Result<()> {
        match state {
            State::Succeed(_) => Ok(()),
            other => Err(state_mismatch(self.kind(), other.kind())),
        }
    }

    fn extract(&self, _manager: &HydratorManager, state: &State) -> Result<Object> {
        match state {
            State::Succeed(_) => Ok(Object::new()),
            other => Err(state_mismatch(self.kind(), other.kind())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailHydrator;

impl StateHydrator for FailHydrator {
    fn name(&self) -> &'static str {
        "FailStateHydrator"
    }

    fn kind(&self) -> StateKind {
        StateKind::Fail
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Error", "Cause"]
    }

    fn hydrate(&self, _manager: &HydratorManager, state: &mut State, data: &Object) -> Result<()> {
        let kind = state.kind();
        let State::Fail(fail) = state else {
            return Err(state_mismatch(self.kind(), kind));
        };
        if let Some(error) = get_str(data, "Error")? {
            fail.set_error(error);
        }
        if let Some(cause) = get_str(data, "Cause")? {
            fail.set_cause(cause);
        }
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, state: &State) -> Result<Object> {
        let State::Fail(fail) = state else {
            return Err(state_mismatch(self.kind(), state.kind()));
        };
        let mut data = Object::new();
        insert_str(&mut data, "Error", fail.error());
        insert_str(&mut data, "Cause", fail.cause());
        Ok(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceHydrator;

impl StateHydrator for ChoiceHydrator {
    fn name(&self) -> &'static str {
        "ChoiceStateHydrator"
    }

    fn kind(&self) -> StateKind {
        StateKind::Choice
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Choices", "Default"]
    }

    fn hydrate(&self, manager: &HydratorManager, state: &mut State, data: &Object) -> Result<()> {
        let kind = state.kind();
        let State::Choice(choice) = state else {
            return Err(state_mismatch(self.kind(), kind));
        };
        for item in require("Choices", get_objects(data, "Choices")?)? {
            choice.push_operation(hydrate_operation(manager, item, true)?);
        }
        if let Some(default) = get_str(data, "Default")? {
            choice.default_to(default);
        }
        Ok(())
    }

    fn extract(&self, manager: &HydratorManager, state: &State) -> Result<Object> {
        let State::Choice(choice) = state else {
            return Err(state_mismatch(self.kind(), state.kind()));
        };
        let choices = choice
            .operations()
            .iter()
            .map(|operation| extract_operation(manager, operation, true).map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        let mut data = Object::new();
        data.insert("Choices".into(), Value::Array(choices));
        insert_str(&mut data, "Default", choice.default());
        Ok(data)
    }
}

const BRANCH_KEYS: &[&str] = &["StartAt", "States"];

/// Branches are mapped with the same collection codec as the machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelHydrator;

impl StateHydrator for ParallelHydrator {
    fn name(&self) -> &'static str {
        "ParallelStateHydrator"
    }

    fn kind(&self) -> StateKind {
        StateKind::Parallel
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Branches"]
    }

    fn hydrate(&self, manager: &HydratorManager, state: &mut State, data: &Object) -> Result<()> {
        let kind = state.kind();
        let State::Parallel(parallel) = state else {
            return Err(state_mismatch(self.kind(), kind));
        };
        let items = require("Branches", get_objects(data, "Branches")?)?;
        for (index, item) in items.into_iter().enumerate() {
            check_keys(manager, "a branch", item, BRANCH_KEYS)?;
            let states = manager
                .hydrate_states(item)
                .map_err(|err| err.context(format_args!("Branches[{index}]")))?;
            parallel.push_branch(Branch { states });
        }
        Ok(())
    }

    fn extract(&self, manager: &HydratorManager, state: &State) -> Result<Object> {
        let State::Parallel(parallel) = state else {
            return Err(state_mismatch(self.kind(), state.kind()));
        };
        let branches = parallel
            .branches()
            .iter()
            .map(|branch| manager.extract_states(&branch.states).map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        let mut data = Object::new();
        data.insert("Branches".into(), Value::Array(branches));
        Ok(data)
    }
}
