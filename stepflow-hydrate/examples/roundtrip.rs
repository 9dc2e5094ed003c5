//! Build a workflow in code, write it as JSON and YAML, and read it back.
//!
//! Run with `RUST_LOG=debug` to see the lifecycle events.

use eyre::Result;
use stepflow_hydrate::prelude::*;
use tracing_subscriber::EnvFilter;

fn build_machine() -> Result<StateMachine> {
    let mut fetch = Task::new("FetchOrder");
    fetch
        .set_resource("arn:aws:lambda:us-east-1:123456789012:function:FetchOrder")
        .set_timeout_seconds(30);
    fetch.retry.all().set_max_attempts(3).set_backoff_rate(2.0)?;
    fetch.catch.all().next.set("Failed");

    let mut route = Choice::new("Route");
    route
        .create_comparator_rule(ComparatorRule::NumericGreaterThan)
        .set_variable("$.total")?
        .set_value(100)?
        .next
        .set("Review");
    route.default_to("Done");

    let mut review = Wait::new("Review");
    review.set_seconds(60);

    let mut machine = StateMachine::new();
    machine.set_comment("Order review").set_version("1.0");
    machine
        .states
        .add(fetch)?
        .add(route)?
        .add(review)?
        .add(Succeed::new("Done"))?
        .add(Fail::new("Failed").with_error("OrderFailed", "could not fetch the order"))?;
    // FetchOrder -> Route and Review -> Done
    machine.states.link();
    machine.ensure_valid()?;
    Ok(machine)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let manager = HydratorManager::builder()
        .with_observer(TracingObserver)
        .with_validate_on_extract(true)
        .build();

    let machine = build_machine()?;
    println!("🔧 Built {} states", machine.states.len());

    let json = manager.extract_document(&machine, Format::Json, true)?;
    println!("📄 JSON:\n{json}");

    let yaml = manager.extract_document(&machine, Format::Yaml, false)?;
    println!("📄 YAML:\n{yaml}");

    let restored = manager.hydrate_document(&yaml, Format::Yaml)?;
    assert_eq!(restored.states.len(), machine.states.len());
    println!(
        "✅ Restored from YAML, start state: {:?}",
        restored.states.start_state_name()
    );

    let generated = generate_state_machine(&restored)?;
    println!("✅ Generator agrees: {}", generated == manager.extract_state_machine(&restored)?);

    Ok(())
}
