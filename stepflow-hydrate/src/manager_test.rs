use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use stepflow_core::{
    choice::{ComparatorRule, LogicRule},
    error::{FlowError, Result},
    fields::{FieldKind, FieldRef, NextField},
    json_path::PathValidator,
    machine::StateMachine,
    states::{Choice, Pass, State, StateKind, Task, Wait},
};
use tracing_test::traced_test;

use crate::{
    Object,
    config::UnknownKeyPolicy,
    hydrators::value::get_str,
    lifecycle::{Subject, Subscription, TracingObserver},
    manager::HydratorManager,
    registry::StateHydrator,
};

#[test]
fn test_extract_wait_state() {
    let manager = HydratorManager::new();
    let mut wait = Wait::new("foo");
    wait.set_seconds(1);

    let data = manager.extract_state(&State::from(wait)).unwrap();
    assert_eq!(Value::Object(data), json!({"Type": "Wait", "Seconds": 1}));
}

#[test]
fn test_extract_task_state() {
    let manager = HydratorManager::new();
    let mut task = Task::new("foo");
    task.set_resource("xy").next.end();

    let data = manager.extract_state(&State::from(task)).unwrap();
    assert_eq!(
        Value::Object(data),
        json!({"Type": "Task", "Resource": "xy", "End": true})
    );
}

#[test]
fn test_extract_next_field() {
    let manager = HydratorManager::new();
    let mut field = NextField::new();
    field.end();

    let data = manager.extract_field(FieldRef::Next(&field)).unwrap();
    assert_eq!(Value::Object(data), json!({"End": true}));
}

#[test]
fn test_extract_linked_state_machine() {
    let manager = HydratorManager::new();
    let mut task = Task::new("foo");
    task.set_resource("xy");
    let mut machine = StateMachine::new();
    machine.states.add(task).unwrap().link();

    let data = manager.extract_state_machine(&machine).unwrap();
    assert_eq!(
        Value::Object(data),
        json!({
            "StartAt": "foo",
            "States": {
                "foo": {"Type": "Task", "Resource": "xy", "End": true}
            }
        })
    );
}

#[test]
fn test_unconfigured_fields_are_omitted() {
    let manager = HydratorManager::new();
    let data = manager.extract_state(&State::from(Pass::new("idle"))).unwrap();
    assert_eq!(Value::Object(data), json!({"Type": "Pass"}));
}

#[test]
fn test_hydrate_state() {
    let manager = HydratorManager::new();
    let state = manager
        .hydrate_state(
            "foo",
            &json!({
                "Type": "Pass",
                "Comment": "inject defaults",
                "Result": {"test": 0},
                "ResultPath": null,
                "Next": "bar"
            }),
        )
        .unwrap();

    assert_eq!(state.kind(), StateKind::Pass);
    assert_eq!(state.name(), "foo");
    assert_eq!(state.comment(), Some("inject defaults"));
    let pass = state.as_pass().unwrap();
    assert_eq!(pass.result.get("test"), Some(&json!(0)));
    assert!(pass.result_path.is_discard());
    assert_eq!(pass.next.get(), Some("bar"));
}

#[test]
fn test_unknown_type_is_a_lookup_error() {
    let manager = HydratorManager::new();
    let err = manager
        .hydrate_state("foo", &json!({"Type": "Map", "End": true}))
        .unwrap_err();
    assert!(err.is_lookup());

    let err = manager.hydrate_state("foo", &json!({"End": true})).unwrap_err();
    assert!(matches!(err, FlowError::InvalidField { ref field, .. } if field == "Type"));
}

#[test]
fn test_wrong_value_types() {
    let manager = HydratorManager::new();
    for definition in [
        json!({"Type": "Wait", "Seconds": "1", "End": true}),
        json!({"Type": "Task", "Resource": 1, "End": true}),
        json!({"Type": "Task", "Resource": "xy", "Retry": {"ErrorEquals": ["States.ALL"]}}),
        json!({"Type": "Pass", "End": "yes"}),
        json!({"Type": "Pass", "ResultPath": 3}),
        json!({"Type": "Pass", "Next": "a", "End": true}),
        json!({"Type": "Pass", "Next": "a", "End": false}),
        json!({"Type": "Pass", "End": false}),
        json!({"Type": "Choice", "Default": "a"}),
    ] {
        let err = manager.hydrate_state("foo", &definition).unwrap_err();
        assert!(err.is_validation(), "{definition}: {err}");
    }
}

#[test]
fn test_invalid_paths_are_rejected() {
    let manager = HydratorManager::new();
    let err = manager
        .hydrate_state("foo", &json!({"Type": "Pass", "InputPath": "-.test", "End": true}))
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidPath(_)));
}

struct RootOnly;

impl PathValidator for RootOnly {
    fn is_valid_path(&self, path: &str) -> bool {
        path == "$"
    }
}

#[test]
fn test_custom_path_validator() {
    let manager = HydratorManager::builder().with_path_validator(RootOnly).build();
    assert!(
        manager
            .hydrate_state("foo", &json!({"Type": "Pass", "OutputPath": "$", "End": true}))
            .is_ok()
    );
    assert!(
        manager
            .hydrate_state("foo", &json!({"Type": "Pass", "OutputPath": "$.a", "End": true}))
            .is_err()
    );
}

#[test]
fn test_unknown_keys_policy() {
    let definition = json!({"Type": "Pass", "Parameters": {"a": 1}, "End": true});

    let lenient = HydratorManager::new();
    assert!(lenient.hydrate_state("foo", &definition).is_ok());

    let strict = HydratorManager::builder()
        .with_unknown_keys(UnknownKeyPolicy::Reject)
        .build();
    let err = strict.hydrate_state("foo", &definition).unwrap_err();
    assert!(matches!(err, FlowError::InvalidField { ref field, .. } if field == "Parameters"));

    // keys of fields a variant does not have are unknown too
    let err = strict
        .hydrate_state("foo", &json!({"Type": "Wait", "Seconds": 1, "Retry": [], "End": true}))
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidField { ref field, .. } if field == "Retry"));

    let wait = json!({"Type": "Wait", "Seconds": 1, "Comment": "c", "End": true});
    assert!(strict.hydrate_state("foo", &wait).is_ok());
}

#[test]
fn test_choice_codec() {
    let manager = HydratorManager::new();
    let mut choice = Choice::new("Route");
    let and = choice.create_logic_rule(LogicRule::And);
    and.create_comparator_rule(ComparatorRule::StringEquals)
        .set_variable("$.type")
        .unwrap()
        .set_value("foo")
        .unwrap()
        // nested transitions are never written
        .next
        .set("ignored");
    and.create_logic_rule(LogicRule::Not)
        .create_comparator_rule(ComparatorRule::BooleanEquals)
        .set_variable("$.test")
        .unwrap()
        .set_value(false)
        .unwrap();
    and.next.set("foo");

    let data = manager.extract_state(&State::from(choice)).unwrap();
    assert_eq!(
        Value::Object(data.clone()),
        json!({
            "Type": "Choice",
            "Choices": [{
                "And": [
                    {"Variable": "$.type", "StringEquals": "foo"},
                    {"Not": {"Variable": "$.test", "BooleanEquals": false}}
                ],
                "Next": "foo"
            }]
        })
    );

    let state = manager.hydrate_state("Route", &Value::Object(data)).unwrap();
    let choice = state.as_choice().unwrap();
    let and = choice.operations()[0].as_logic().unwrap();
    assert_eq!(and.rule(), LogicRule::And);
    assert!(and.operations()[0].next().transition().is_none());
    assert_eq!(and.operations()[1].as_logic().unwrap().operations().len(), 1);
}

#[test]
fn test_single_child_and_stays_an_array() {
    let manager = HydratorManager::new();
    let mut choice = Choice::new("Route");
    let or = choice.create_logic_rule(LogicRule::Or);
    or.create_comparator_rule(ComparatorRule::NumericLessThan)
        .set_variable("$.n")
        .unwrap()
        .set_value(3)
        .unwrap();
    or.next.set("Small");

    let data = manager.extract_state(&State::from(choice)).unwrap();
    assert_eq!(
        data["Choices"],
        json!([{"Or": [{"Variable": "$.n", "NumericLessThan": 3}], "Next": "Small"}])
    );
}

#[test]
fn test_malformed_choice_rules() {
    let manager = HydratorManager::new();
    for rule in [
        json!({"Variable": "$.a", "StringEquals": "x", "NumericEquals": 1, "Next": "b"}),
        json!({"Variable": "$.a", "Next": "b"}),
        json!({"Variable": "$.a", "NumericEquals": "one", "Next": "b"}),
        json!({"Not": [{"Variable": "$.a", "NumericEquals": 1}], "Next": "b"}),
        json!({"And": {"Variable": "$.a", "NumericEquals": 1}, "Next": "b"}),
        json!({"NumericEquals": 1, "Next": "b"}),
    ] {
        let definition = json!({"Type": "Choice", "Choices": [rule]});
        let err = manager.hydrate_state("Route", &definition).unwrap_err();
        assert!(err.is_validation(), "{definition}: {err}");
    }
}

#[test]
fn test_not_with_two_rules_cannot_be_extracted() {
    let manager = HydratorManager::new();
    let mut choice = Choice::new("Route");
    let not = choice.create_logic_rule(LogicRule::Not);
    for path in ["$.a", "$.b"] {
        not.create_comparator_rule(ComparatorRule::NumericEquals)
            .set_variable(path)
            .unwrap()
            .set_value(1)
            .unwrap();
    }
    not.next.set("x");
    assert!(manager.extract_state(&State::from(choice)).is_err());
}

#[test]
fn test_hydration_is_all_or_nothing() {
    let manager = HydratorManager::new();
    let mut machine = StateMachine::new();
    machine.set_comment("untouched");

    let broken = json!({
        "StartAt": "a",
        "States": {
            "a": {"Type": "Pass", "Next": "b"},
            "b": {"Type": "Wait", "Seconds": -1, "End": true}
        }
    });
    let err = manager.hydrate_state_machine(&mut machine, &broken).unwrap_err();
    assert!(err.to_string().contains("States.b"));
    assert_eq!(machine.comment(), Some("untouched"));
    assert!(machine.states.is_empty());
}

#[test]
fn test_validate_on_extract() {
    let mut task = Task::new("foo");
    task.set_resource("xy").next.set("missing");
    let mut machine = StateMachine::new();
    machine.states.add(task).unwrap();

    assert!(HydratorManager::new().extract_state_machine(&machine).is_ok());

    let strict = HydratorManager::builder().with_validate_on_extract(true).build();
    let err = strict.extract_state_machine(&machine).unwrap_err();
    assert!(err.is_graph_integrity());

    let err = strict.extract_state(&State::from(Wait::new("w"))).unwrap_err();
    assert!(err.is_validation());
}

/// Task hydrator that maps `Retry` itself and drops it.
struct ResourceOnlyTask;

impl StateHydrator for ResourceOnlyTask {
    fn name(&self) -> &'static str {
        "ResourceOnlyTask"
    }

    fn kind(&self) -> StateKind {
        StateKind::Task
    }

    fn keys(&self) -> &'static [&'static str] {
        &["Resource", "Retry"]
    }

    fn claimed_fields(&self) -> &'static [FieldKind] {
        &[FieldKind::Retry]
    }

    fn hydrate(&self, _manager: &HydratorManager, state: &mut State, data: &Object) -> Result<()> {
        if let (Some(task), Some(resource)) = (state.as_task_mut(), get_str(data, "Resource")?) {
            task.set_resource(resource);
        }
        Ok(())
    }

    fn extract(&self, _manager: &HydratorManager, state: &State) -> Result<Object> {
        let mut data = Object::new();
        if let Some(resource) = state.as_task().and_then(Task::resource) {
            data.insert("Resource".into(), json!(resource));
        }
        Ok(data)
    }
}

#[test]
fn test_claimed_fields_are_left_to_the_state_hydrator() {
    let manager = HydratorManager::builder()
        .register_state_hydrator(ResourceOnlyTask)
        .build();
    let state = manager
        .hydrate_state(
            "foo",
            &json!({
                "Type": "Task",
                "Resource": "xy",
                "Retry": [{"ErrorEquals": ["States.ALL"]}],
                "End": true
            }),
        )
        .unwrap();
    let task = state.as_task().unwrap();
    assert!(task.retry.retries().is_empty());
    assert!(task.next.is_end());

    let mut with_retry = task.clone();
    with_retry.retry.all();
    let data = manager.extract_state(&State::from(with_retry)).unwrap();
    assert_eq!(
        Value::Object(data),
        json!({"Type": "Task", "Resource": "xy", "End": true})
    );
}

#[test]
fn test_subscription_receives_participants() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let manager = HydratorManager::builder()
        .with_observer(Subscription::new("before:extract:state:*", move |event| {
            let is_state = matches!(event.subject, Subject::State(_));
            sink.lock()
                .unwrap()
                .push((event.name(), event.hydrator.to_string(), is_state, event.data.is_none()));
        }))
        .build();

    let mut wait = Wait::new("foo");
    wait.set_seconds(1);
    manager.extract_state(&State::from(wait)).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![(
            "before:extract:state:Wait".to_string(),
            "WaitStateHydrator".to_string(),
            true,
            true
        )]
    );
}

#[test]
fn test_events_are_balanced() {
    let names = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&names);
    let manager = HydratorManager::builder()
        .with_observer(Subscription::new("**", move |event| {
            sink.lock().unwrap().push(event.name());
        }))
        .build();

    manager
        .parse_state_machine(&json!({
            "StartAt": "foo",
            "States": {"foo": {"Type": "Succeed"}}
        }))
        .unwrap();

    let names = names.lock().unwrap();
    assert_eq!(
        *names,
        vec![
            "before:hydrate:machine",
            "before:hydrate:state:Succeed",
            "before:hydrate:field:PathField",
            "after:hydrate:field:PathField",
            "after:hydrate:state:Succeed",
            "after:hydrate:machine",
        ]
    );
}

#[traced_test]
#[test]
fn test_tracing_observer() {
    let manager = HydratorManager::builder().with_observer(TracingObserver).build();
    let mut wait = Wait::new("foo");
    wait.set_seconds(1);
    manager.extract_state(&State::from(wait)).unwrap();

    assert!(logs_contain("before:extract:state:Wait"));
    assert!(logs_contain("after:extract:state:Wait"));
}

#[test]
fn test_manager_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HydratorManager>();
}
