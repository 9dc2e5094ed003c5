//! Codec for state collections, shared by the machine and parallel branches.

use serde_json::Value;
use stepflow_core::{error::Result, machine::StateCollection};

use super::value::{as_object, get_str, require};
use crate::{Object, manager::HydratorManager};

/// Decode `StartAt` and `States`, keeping the document's state order.
pub fn hydrate_collection(manager: &HydratorManager, data: &Object) -> Result<StateCollection> {
    let definitions = as_object("States", require("States", data.get("States"))?)?;
    let mut states = StateCollection::new();
    for (name, definition) in definitions {
        let state = manager
            .hydrate_state(name, definition)
            .map_err(|err| err.context(format_args!("States.{name}")))?;
        states.add(state)?;
    }
    if let Some(start) = get_str(data, "StartAt")? {
        states.set_start(start);
    }
    Ok(states)
}

pub fn extract_collection(manager: &HydratorManager, states: &StateCollection) -> Result<Object> {
    let mut definitions = Object::new();
    for state in states.iter() {
        let definition = manager.extract_state_unchecked(state)?;
        definitions.insert(state.name().to_string(), Value::Object(definition));
    }
    let mut data = Object::new();
    if let Some(start) = states.start_state_name() {
        data.insert("StartAt".into(), Value::String(start.to_string()));
    }
    data.insert("States".into(), Value::Object(definitions));
    Ok(data)
}
