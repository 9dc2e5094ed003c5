//! The hydrator manager: registry dispatch, lifecycle events and the
//! machine-level mapping entry points.

use std::{fmt, sync::Arc};

use serde_json::Value;
use stepflow_core::{
    error::Result,
    fields::{FieldMut, FieldRef},
    json_path::{JsonPathValidator, PathValidator},
    machine::{StateCollection, StateMachine},
    states::State,
};
use tracing::{debug_span, trace};

use crate::{
    Object,
    config::{HydratorConfig, UnknownKeyPolicy},
    document::{Document, Format},
    hydrators::{
        machine::{extract_collection, hydrate_collection},
        value::{as_object, check_keys, get_str, get_u64, require},
    },
    lifecycle::{Action, LifecycleEvent, LifecycleObserver, Phase, Subject},
    registry::{FieldHydrator, HydratorRegistry, StateHydrator},
};

const MACHINE_KEYS: &[&str] = &["Comment", "StartAt", "States", "Version", "TimeoutSeconds"];

/// Maps workflow definitions between the object model and JSON.
///
/// The manager only holds read-only state and can be shared between threads.
pub struct HydratorManager {
    registry: HydratorRegistry,
    observers: Vec<Arc<dyn LifecycleObserver>>,
    path_validator: Arc<dyn PathValidator>,
    config: HydratorConfig,
}

impl HydratorManager {
    /// Manager with the built-in hydrators and default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HydratorManagerBuilder {
        HydratorManagerBuilder::new()
    }

    pub fn config(&self) -> &HydratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &HydratorRegistry {
        &self.registry
    }

    pub fn path_validator(&self) -> &dyn PathValidator {
        self.path_validator.as_ref()
    }

    fn publish(
        &self,
        phase: Phase,
        action: Action,
        subject: Subject<'_>,
        data: Option<&Object>,
        hydrator: &str,
    ) {
        if self.observers.is_empty() {
            return;
        }
        let event = LifecycleEvent {
            phase,
            action,
            subject,
            data,
            hydrator,
            manager: self,
        };
        for observer in &self.observers {
            observer.publish(&event);
        }
    }

    /// Build a state called `name` from its JSON definition.
    pub fn hydrate_state(&self, name: &str, data: &Value) -> Result<State> {
        let data = as_object(name, data)?;
        let type_name = require("Type", get_str(data, "Type")?)?;
        let (kind, hydrator) = self.registry.resolve_type(type_name)?;
        let _span = debug_span!("hydrate_state", state = name, state_type = type_name).entered();

        let mut state = kind.construct(name);
        if self.config.unknown_keys == UnknownKeyPolicy::Reject {
            let allowed = self.known_state_keys(&state, hydrator.as_ref())?;
            check_keys(self, &format!("a {kind} state"), data, &allowed)?;
        }

        self.publish(
            Phase::Before,
            Action::Hydrate,
            Subject::State(&state),
            Some(data),
            hydrator.name(),
        );
        hydrator.hydrate(self, &mut state, data)?;
        if let Some(comment) = get_str(data, "Comment")? {
            state.set_comment(comment);
        }
        let claimed = hydrator.claimed_fields();
        for field in state.fields_mut() {
            if !claimed.contains(&field.kind()) {
                self.hydrate_field(field, data)?;
            }
        }
        self.publish(
            Phase::After,
            Action::Hydrate,
            Subject::State(&state),
            Some(data),
            hydrator.name(),
        );
        Ok(state)
    }

    /// Keys a state of this shape may carry: common keys, the state
    /// hydrator's keys and the keys of every unclaimed field.
    fn known_state_keys(
        &self,
        state: &State,
        hydrator: &dyn StateHydrator,
    ) -> Result<Vec<&'static str>> {
        let mut keys = vec!["Type", "Comment"];
        keys.extend_from_slice(hydrator.keys());
        for field in state.fields() {
            if !hydrator.claimed_fields().contains(&field.kind()) {
                keys.extend_from_slice(self.registry.field(field.kind())?.keys());
            }
        }
        Ok(keys)
    }

    /// Convert a state to its JSON definition.
    ///
    /// With `validate_on_extract` set, an invalid state is rejected with its
    /// first validation error.
    pub fn extract_state(&self, state: &State) -> Result<Object> {
        if self.config.validate_on_extract {
            if let Some(err) = state.validate().into_iter().next() {
                return Err(err);
            }
        }
        self.extract_state_unchecked(state)
    }

    pub(crate) fn extract_state_unchecked(&self, state: &State) -> Result<Object> {
        let hydrator = self.registry.state(state.kind())?;
        let _span =
            debug_span!("extract_state", state = state.name(), state_type = %state.kind())
                .entered();
        self.publish(Phase::Before, Action::Extract, Subject::State(state), None, hydrator.name());

        let mut data = Object::new();
        data.insert("Type".into(), Value::String(state.kind().type_name().to_string()));
        if let Some(comment) = state.comment() {
            data.insert("Comment".into(), Value::String(comment.to_string()));
        }
        data.extend(hydrator.extract(self, state)?);
        let claimed = hydrator.claimed_fields();
        for field in state.fields() {
            if field.is_configured() && !claimed.contains(&field.kind()) {
                data.extend(self.extract_field(field)?);
            }
        }

        self.publish(
            Phase::After,
            Action::Extract,
            Subject::State(state),
            Some(&data),
            hydrator.name(),
        );
        Ok(data)
    }

    /// Populate `field` from the keys of `data` its hydrator owns.
    pub fn hydrate_field(&self, mut field: FieldMut<'_>, data: &Object) -> Result<()> {
        let hydrator = self.registry.field(field.kind())?;
        trace!(field = %field.kind(), hydrator = hydrator.name(), "hydrate field");
        self.publish(
            Phase::Before,
            Action::Hydrate,
            Subject::Field(field.as_ref()),
            Some(data),
            hydrator.name(),
        );
        hydrator.hydrate(self, field.reborrow(), data)?;
        self.publish(
            Phase::After,
            Action::Hydrate,
            Subject::Field(field.as_ref()),
            Some(data),
            hydrator.name(),
        );
        Ok(())
    }

    /// The JSON keys of a field; empty when it is not configured.
    pub fn extract_field(&self, field: FieldRef<'_>) -> Result<Object> {
        let hydrator = self.registry.field(field.kind())?;
        trace!(field = %field.kind(), hydrator = hydrator.name(), "extract field");
        self.publish(Phase::Before, Action::Extract, Subject::Field(field), None, hydrator.name());
        let data = hydrator.extract(self, field)?;
        self.publish(
            Phase::After,
            Action::Extract,
            Subject::Field(field),
            Some(&data),
            hydrator.name(),
        );
        Ok(data)
    }

    /// Decode `StartAt` / `States` into a new collection.
    pub fn hydrate_states(&self, data: &Object) -> Result<StateCollection> {
        hydrate_collection(self, data)
    }

    pub fn extract_states(&self, states: &StateCollection) -> Result<Object> {
        extract_collection(self, states)
    }

    /// Build a state machine from its JSON definition.
    pub fn parse_state_machine(&self, data: &Value) -> Result<StateMachine> {
        let data = as_object("StateMachine", data)?;
        let _span = debug_span!("hydrate_state_machine").entered();
        check_keys(self, "a state machine", data, MACHINE_KEYS)?;

        let mut machine = StateMachine::new();
        self.publish(
            Phase::Before,
            Action::Hydrate,
            Subject::Machine(&machine),
            Some(data),
            "StateMachineHydrator",
        );
        machine.states = self.hydrate_states(data)?;
        if let Some(comment) = get_str(data, "Comment")? {
            machine.set_comment(comment);
        }
        if let Some(version) = get_str(data, "Version")? {
            machine.set_version(version);
        }
        if let Some(timeout) = get_u64(data, "TimeoutSeconds")? {
            machine.set_timeout_seconds(timeout);
        }
        self.publish(
            Phase::After,
            Action::Hydrate,
            Subject::Machine(&machine),
            Some(data),
            "StateMachineHydrator",
        );
        Ok(machine)
    }

    /// Replace the content of `machine` with the definition in `data`.
    ///
    /// `machine` is left untouched when the definition cannot be mapped.
    pub fn hydrate_state_machine(&self, machine: &mut StateMachine, data: &Value) -> Result<()> {
        *machine = self.parse_state_machine(data)?;
        Ok(())
    }

    /// Convert a state machine to its JSON definition.
    pub fn extract_state_machine(&self, machine: &StateMachine) -> Result<Object> {
        let _span = debug_span!("extract_state_machine", states = machine.states.len()).entered();
        if self.config.validate_on_extract {
            machine.ensure_valid()?;
        }
        self.publish(
            Phase::Before,
            Action::Extract,
            Subject::Machine(machine),
            None,
            "StateMachineHydrator",
        );

        let mut data = Object::new();
        if let Some(comment) = machine.comment() {
            data.insert("Comment".into(), Value::String(comment.to_string()));
        }
        data.extend(self.extract_states(&machine.states)?);
        if let Some(version) = machine.version() {
            data.insert("Version".into(), Value::String(version.to_string()));
        }
        if let Some(timeout) = machine.timeout_seconds() {
            data.insert("TimeoutSeconds".into(), timeout.into());
        }

        self.publish(
            Phase::After,
            Action::Extract,
            Subject::Machine(machine),
            Some(&data),
            "StateMachineHydrator",
        );
        Ok(data)
    }

    /// Parse a JSON or YAML document into a state machine.
    pub fn hydrate_document(&self, text: &str, format: Format) -> Result<StateMachine> {
        let document = Document::parse(text, format)?;
        self.parse_state_machine(document.value())
    }

    /// Render a state machine as a JSON or YAML document.
    pub fn extract_document(
        &self,
        machine: &StateMachine,
        format: Format,
        pretty: bool,
    ) -> Result<String> {
        let data = self.extract_state_machine(machine)?;
        Document::new(Value::Object(data), format).render(pretty)
    }
}

impl Default for HydratorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HydratorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HydratorManager")
            .field("registry", &self.registry)
            .field("observers", &self.observers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`HydratorManager`].
pub struct HydratorManagerBuilder {
    registry: HydratorRegistry,
    observers: Vec<Arc<dyn LifecycleObserver>>,
    path_validator: Arc<dyn PathValidator>,
    config: HydratorConfig,
}

impl HydratorManagerBuilder {
    pub fn new() -> Self {
        Self {
            registry: HydratorRegistry::with_defaults(),
            observers: Vec::new(),
            path_validator: Arc::new(JsonPathValidator),
            config: HydratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HydratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.config.unknown_keys = policy;
        self
    }

    pub fn with_validate_on_extract(mut self, validate: bool) -> Self {
        self.config.validate_on_extract = validate;
        self
    }

    /// Replace the whole registry, e.g. with [`HydratorRegistry::empty`].
    pub fn with_registry(mut self, registry: HydratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_observer(mut self, observer: impl LifecycleObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn with_shared_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn with_path_validator(mut self, validator: impl PathValidator + 'static) -> Self {
        self.path_validator = Arc::new(validator);
        self
    }

    pub fn register_state_hydrator(mut self, hydrator: impl StateHydrator + 'static) -> Self {
        self.registry.register_state(Arc::new(hydrator));
        self
    }

    pub fn register_field_hydrator(mut self, hydrator: impl FieldHydrator + 'static) -> Self {
        self.registry.register_field(Arc::new(hydrator));
        self
    }

    pub fn build(self) -> HydratorManager {
        HydratorManager {
            registry: self.registry,
            observers: self.observers,
            path_validator: self.path_validator,
            config: self.config,
        }
    }
}

impl Default for HydratorManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
