//! Codec for choice rule trees.
//!
//! `Not` wraps its single child directly, `And`/`Or` always hold an array
//! (even with one child). `Next`/`End` belong to top-level rules only.

use serde_json::Value;
use stepflow_core::{
    choice::{ChoiceOperation, ComparatorOperation, ComparatorRule, LogicOperation, LogicRule},
    error::{FlowError, Result},
    fields::{FieldMut, FieldRef},
};

use super::value::{as_object, check_keys, get_objects, get_str, require};
use crate::{Object, manager::HydratorManager};

enum Keyword {
    Comparator(ComparatorRule),
    Logic(LogicRule),
}

fn rule_keyword(data: &Object) -> Result<Keyword> {
    let mut found = data.keys().filter_map(|key| {
        ComparatorRule::from_keyword(key)
            .map(Keyword::Comparator)
            .or_else(|| LogicRule::from_keyword(key).map(Keyword::Logic))
    });
    match (found.next(), found.next()) {
        (Some(keyword), None) => Ok(keyword),
        (None, _) => Err(FlowError::invalid_field(
            "Choices",
            "rule has no comparator or logic keyword",
        )),
        (Some(_), Some(_)) => Err(FlowError::invalid_field(
            "Choices",
            "rule has more than one comparator or logic keyword",
        )),
    }
}

fn allowed_keys<'a>(own: &[&'a str], top_level: bool) -> Vec<&'a str> {
    let mut keys = own.to_vec();
    if top_level {
        keys.extend(["Next", "End"]);
    }
    keys
}

/// Decode one rule; `Next`/`End` are only read for top-level rules.
pub fn hydrate_operation(
    manager: &HydratorManager,
    data: &Object,
    top_level: bool,
) -> Result<ChoiceOperation> {
    let mut operation = match rule_keyword(data)? {
        Keyword::Comparator(rule) => {
            let keyword = rule.keyword();
            check_keys(manager, keyword, data, &allowed_keys(&[keyword, "Variable"], top_level))?;

            let mut comparator = ComparatorOperation::new(rule);
            let variable = require("Variable", get_str(data, "Variable")?)?;
            comparator.set_variable_with(manager.path_validator(), variable)?;
            let value = require(keyword, data.get(keyword))?;
            if !rule.family().accepts(value) {
                return Err(FlowError::invalid_field(
                    keyword,
                    format!("expected a {} value, got {value}", rule.family()),
                ));
            }
            comparator.set_value(value.clone())?;
            ChoiceOperation::Comparator(comparator)
        }
        Keyword::Logic(rule) => {
            let keyword = rule.keyword();
            check_keys(manager, keyword, data, &allowed_keys(&[keyword], top_level))?;

            let mut logic = LogicOperation::new(rule);
            match rule {
                LogicRule::Not => {
                    let child = as_object(keyword, require(keyword, data.get(keyword))?)?;
                    logic.push(hydrate_operation(manager, child, false)?);
                }
                LogicRule::And | LogicRule::Or => {
                    let children = require(keyword, get_objects(data, keyword)?)?;
                    for child in children {
                        logic.push(hydrate_operation(manager, child, false)?);
                    }
                }
            }
            ChoiceOperation::Logic(logic)
        }
    };
    if top_level {
        manager.hydrate_field(FieldMut::Next(operation.next_mut()), data)?;
    }
    Ok(operation)
}

/// Encode one rule; the transition is only written for top-level rules.
pub fn extract_operation(
    manager: &HydratorManager,
    operation: &ChoiceOperation,
    top_level: bool,
) -> Result<Object> {
    let mut data = Object::new();
    match operation {
        ChoiceOperation::Comparator(comparator) => {
            if let Some(variable) = comparator.variable() {
                data.insert("Variable".into(), Value::String(variable.to_string()));
            }
            if let Some(value) = comparator.value() {
                data.insert(comparator.rule().keyword().into(), value.clone());
            }
        }
        ChoiceOperation::Logic(logic) => {
            let keyword = logic.rule().keyword();
            match (logic.rule(), logic.operations()) {
                (LogicRule::Not, [child]) => {
                    let child = extract_operation(manager, child, false)?;
                    data.insert(keyword.into(), Value::Object(child));
                }
                (LogicRule::Not, children) => {
                    return Err(FlowError::validation(format!(
                        "Not requires exactly one rule, found {}",
                        children.len()
                    )));
                }
                (LogicRule::And | LogicRule::Or, children) => {
                    let children = children
                        .iter()
                        .map(|child| extract_operation(manager, child, false).map(Value::Object))
                        .collect::<Result<Vec<_>>>()?;
                    data.insert(keyword.into(), Value::Array(children));
                }
            }
        }
    }
    if top_level {
        data.extend(manager.extract_field(FieldRef::Next(operation.next()))?);
    }
    Ok(data)
}
