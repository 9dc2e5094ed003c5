use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use stepflow_core::{
    choice::{ComparatorRule, LogicRule},
    machine::StateMachine,
    states::{Choice, Fail, Parallel, Pass, State, Succeed, Task, Wait},
};

use crate::{document::Format, manager::HydratorManager};

const ORDER_PIPELINE: &str = include_str!("fixtures/order_pipeline.json");

fn fixture() -> Value {
    serde_json::from_str(ORDER_PIPELINE).unwrap()
}

#[test]
fn test_fixture_round_trip() {
    let manager = HydratorManager::new();
    let definition = fixture();

    let machine = manager.parse_state_machine(&definition).unwrap();
    assert!(machine.validate().is_empty(), "{:?}", machine.validate());
    assert_eq!(machine.states.len(), 6);
    assert_eq!(machine.version(), Some("1.0"));
    assert_eq!(machine.timeout_seconds(), Some(3600));

    let extracted = manager.extract_state_machine(&machine).unwrap();
    assert_eq!(Value::Object(extracted), definition);
}

#[test]
fn test_state_definitions_round_trip() {
    let manager = HydratorManager::new();
    let definitions = [
        json!({"Type": "Pass", "End": true}),
        json!({
            "Type": "Pass",
            "Comment": "seed",
            "InputPath": "$.in",
            "OutputPath": "$.out",
            "Result": [1, 2, 3],
            "ResultPath": null,
            "Next": "b"
        }),
        json!({
            "Type": "Task",
            "Resource": "xy",
            "TimeoutSeconds": 60,
            "HeartbeatSeconds": 5,
            "Retry": [{"ErrorEquals": ["States.ALL"], "IntervalSeconds": 1, "BackoffRate": 2.0}],
            "Catch": [{"ErrorEquals": ["States.ALL"], "End": true}],
            "Next": "b"
        }),
        json!({"Type": "Wait", "Timestamp": "2016-03-14T01:59:00Z", "End": true}),
        json!({"Type": "Wait", "TimestampPath": "$.at", "Next": "b"}),
        json!({"Type": "Wait", "SecondsPath": "$.delay", "End": true}),
        json!({"Type": "Succeed", "InputPath": "$.final"}),
        json!({"Type": "Fail"}),
        json!({"Type": "Fail", "Error": "E", "Cause": "C"}),
        json!({
            "Type": "Choice",
            "Choices": [
                {"Variable": "$.n", "NumericLessThanEquals": 3.5, "Next": "small"},
                {"Variable": "$.s", "StringGreaterThan": "m", "Next": "late"},
                {"Not": {"Or": [
                    {"Variable": "$.a", "BooleanEquals": true},
                    {"Variable": "$.t", "TimestampEquals": "2020-01-01T00:00:00+02:00"}
                ]}, "Next": "other"}
            ],
            "Default": "small",
            "OutputPath": "$.choice"
        }),
        json!({
            "Type": "Parallel",
            "Branches": [{"StartAt": "x", "States": {"x": {"Type": "Succeed"}}}],
            "End": true
        }),
        json!({"Type": "Task", "Resource": "xy", "Retry": [], "End": true}),
        json!({"Type": "Task", "Resource": "xy", "Catch": [], "End": true}),
        json!({"Type": "Choice", "Choices": []}),
    ];

    for definition in definitions {
        let state = manager.hydrate_state("a", &definition).unwrap();
        let extracted = manager.extract_state(&state).unwrap();
        assert_eq!(Value::Object(extracted), definition);
    }
}

fn built_states() -> Vec<State> {
    let mut pass = Pass::new("Seed");
    pass.set_comment("initial data");
    pass.path.set_input("$.input").unwrap();
    pass.result.set("count", 0).set("names", json!(["a", "b"]));
    pass.result_path.discard();
    pass.next.set("Work");

    let mut task = Task::new("Work");
    task.set_resource("arn:work").set_timeout_seconds(20).set_heartbeat_seconds(4);
    task.retry
        .errors(["States.Timeout"])
        .set_max_attempts(3)
        .set_interval(2)
        .set_backoff_rate(2.0)
        .unwrap();
    task.retry.all().set_max_attempts(1);
    task.catch.errors(["Custom.Error"]).next.set("Broken");
    task.catch.all().result_path.set("$.error").unwrap();
    task.catch.catchers_mut()[1].next.set("Broken");
    task.result_path.set("$.work").unwrap();
    task.next.set("Pause");

    let mut wait = Wait::new("Pause");
    wait.set_timestamp("2016-03-14T01:59:00Z").unwrap();
    wait.next.set("Decide");

    let mut choice = Choice::new("Decide");
    choice
        .create_comparator_rule(ComparatorRule::NumericGreaterThanEquals)
        .set_variable("$.work.score")
        .unwrap()
        .set_value(10)
        .unwrap()
        .next
        .set("Fan");
    let or = choice.create_logic_rule(LogicRule::Or);
    or.create_comparator_rule(ComparatorRule::StringLessThanEquals)
        .set_variable("$.name")
        .unwrap()
        .set_value("m")
        .unwrap();
    or.next.set("Done");
    choice.default_to("Broken");

    let mut parallel = Parallel::new("Fan");
    let branch = parallel.add_branch();
    branch.states.add(Succeed::new("Inner")).unwrap();
    parallel.next.set("Done");

    vec![
        pass.into(),
        task.into(),
        wait.into(),
        choice.into(),
        parallel.into(),
        Succeed::new("Done").into(),
        Fail::new("Broken").with_error("Work.Failed", "gave up").into(),
    ]
}

#[test]
fn test_object_model_round_trip() {
    let manager = HydratorManager::new();
    for state in built_states() {
        let data = manager.extract_state(&state).unwrap();
        let hydrated = manager.hydrate_state(state.name(), &Value::Object(data)).unwrap();
        assert_eq!(hydrated, state);
    }
}

#[test]
fn test_built_machine_round_trip() {
    let manager = HydratorManager::new();
    let mut machine = StateMachine::new();
    machine.set_comment("built in code").set_version("2.0");
    for state in built_states() {
        machine.states.add(state).unwrap();
    }
    machine.states.set_start("Seed");
    machine.ensure_valid().unwrap();

    let data = manager.extract_state_machine(&machine).unwrap();
    assert_eq!(data["StartAt"], json!("Seed"));
    let hydrated = manager.parse_state_machine(&Value::Object(data)).unwrap();
    assert_eq!(hydrated, machine);
}

#[test]
fn test_implicit_start_round_trip() {
    let manager = HydratorManager::new();
    let mut machine = StateMachine::new();
    machine
        .states
        .add(Pass::new("First"))
        .unwrap()
        .add(Succeed::new("Last"))
        .unwrap()
        .link();
    assert_eq!(machine.states.start_state_name(), Some("First"));

    let data = manager.extract_state_machine(&machine).unwrap();
    assert_eq!(data["StartAt"], json!("First"));
    let hydrated = manager.parse_state_machine(&Value::Object(data)).unwrap();
    assert_eq!(hydrated, machine);
}

#[test]
fn test_retry_and_catch_keep_their_order() {
    let manager = HydratorManager::new();
    let machine = manager.parse_state_machine(&fixture()).unwrap();
    let task = machine.states.get("Validate").unwrap().as_task().unwrap();

    let retries: Vec<_> = task
        .retry
        .retries()
        .iter()
        .map(|retrier| retrier.error_types()[0].as_str().to_string())
        .collect();
    assert_eq!(retries, ["States.Timeout", "States.ALL"]);
    assert_eq!(task.retry.retries()[0].backoff_rate(), Some(1.5));

    let catchers = task.catch.catchers();
    assert_eq!(catchers[0].error_types()[0].as_str(), "ValidationError");
    assert!(catchers[0].result_path.is_discard());
    assert_eq!(catchers[1].result_path.get(), Some("$.error"));
}

#[test]
fn test_branch_namespaces_are_isolated() {
    let manager = HydratorManager::new();
    let machine = manager.parse_state_machine(&fixture()).unwrap();
    let parallel = machine.states.get("Enrich").unwrap().as_parallel().unwrap();
    let kinds: Vec<_> = parallel
        .branches()
        .iter()
        .map(|branch| branch.states.get("Lookup").unwrap().kind())
        .collect();
    assert_eq!(kinds.len(), 2);
    assert_ne!(kinds[0], kinds[1]);
    assert!(!machine.states.contains("Lookup"));

    let leaking = json!({
        "StartAt": "Fan",
        "States": {
            "Fan": {
                "Type": "Parallel",
                "Branches": [{
                    "StartAt": "Inner",
                    "States": {"Inner": {"Type": "Pass", "Next": "Done"}}
                }],
                "Next": "Done"
            },
            "Done": {"Type": "Succeed"}
        }
    });
    let machine = manager.parse_state_machine(&leaking).unwrap();
    let errors = machine.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_graph_integrity());
}

#[test]
fn test_missing_start_state() {
    let manager = HydratorManager::new();
    let machine = manager
        .parse_state_machine(&json!({
            "StartAt": "nowhere",
            "States": {"a": {"Type": "Succeed"}}
        }))
        .unwrap();
    assert!(machine.ensure_valid().unwrap_err().is_graph_integrity());

    let machine = manager
        .parse_state_machine(&json!({"States": {"a": {"Type": "Succeed"}}}))
        .unwrap();
    assert_eq!(machine.states.start_state_name(), Some("a"));
    assert!(machine.ensure_valid().is_ok());
}

#[test]
fn test_yaml_document_round_trip() {
    let manager = HydratorManager::new();
    let machine = manager.hydrate_document(ORDER_PIPELINE, Format::Json).unwrap();

    let yaml = manager.extract_document(&machine, Format::Yaml, false).unwrap();
    assert!(yaml.contains("StartAt: Validate"));
    let from_yaml = manager.hydrate_document(&yaml, Format::Yaml).unwrap();
    assert_eq!(from_yaml, machine);

    let json = manager.extract_document(&from_yaml, Format::Json, true).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, fixture());
}
