//! Hydrator traits and the registry the manager dispatches through.

use std::{collections::HashMap, fmt, sync::Arc};

use stepflow_core::{
    error::{FlowError, Result},
    fields::{FieldKind, FieldMut, FieldRef},
    states::{State, StateKind},
};

use crate::{
    Object,
    hydrators::{fields, states},
    manager::HydratorManager,
};

/// Converts the variant attributes of one state type.
///
/// Name, comment and every field the hydrator does not claim are handled by
/// the manager.
pub trait StateHydrator: Send + Sync {
    /// Name reported in lifecycle events.
    fn name(&self) -> &'static str;

    /// State type this hydrator converts.
    fn kind(&self) -> StateKind;

    /// Wire keys owned by this hydrator.
    fn keys(&self) -> &'static [&'static str];

    /// Field kinds this hydrator maps itself instead of leaving them to the
    /// field hydrators.
    fn claimed_fields(&self) -> &'static [FieldKind] {
        &[]
    }

    fn hydrate(&self, manager: &HydratorManager, state: &mut State, data: &Object) -> Result<()>;

    fn extract(&self, manager: &HydratorManager, state: &State) -> Result<Object>;
}

/// Converts one field kind.
pub trait FieldHydrator: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> FieldKind;

    fn keys(&self) -> &'static [&'static str];

    /// Read the field's keys from `data`; absent keys leave the field unset.
    fn hydrate(&self, manager: &HydratorManager, field: FieldMut<'_>, data: &Object) -> Result<()>;

    fn extract(&self, manager: &HydratorManager, field: FieldRef<'_>) -> Result<Object>;
}

/// Lookup tables from state and field kinds to their hydrators.
#[derive(Clone)]
pub struct HydratorRegistry {
    states: HashMap<StateKind, Arc<dyn StateHydrator>>,
    fields: HashMap<FieldKind, Arc<dyn FieldHydrator>>,
}

impl HydratorRegistry {
    /// Registry without any hydrator.
    pub fn empty() -> Self {
        Self {
            states: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    /// Registry with a hydrator for every state type and field kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry
            .register_state(Arc::new(states::PassHydrator))
            .register_state(Arc::new(states::TaskHydrator))
            .register_state(Arc::new(states::WaitHydrator))
            .register_state(Arc::new(states::SucceedHydrator))
            .register_state(Arc::new(states::FailHydrator))
            .register_state(Arc::new(states::ChoiceHydrator))
            .register_state(Arc::new(states::ParallelHydrator));
        registry
            .register_field(Arc::new(fields::NextHydrator))
            .register_field(Arc::new(fields::PathHydrator))
            .register_field(Arc::new(fields::ResultHydrator))
            .register_field(Arc::new(fields::ResultPathHydrator))
            .register_field(Arc::new(fields::RetryHydrator))
            .register_field(Arc::new(fields::CatchHydrator));
        registry
    }

    /// Register (or replace) the hydrator for `hydrator.kind()`.
    pub fn register_state(&mut self, hydrator: Arc<dyn StateHydrator>) -> &mut Self {
        self.states.insert(hydrator.kind(), hydrator);
        self
    }

    pub fn register_field(&mut self, hydrator: Arc<dyn FieldHydrator>) -> &mut Self {
        self.fields.insert(hydrator.kind(), hydrator);
        self
    }

    pub fn state(&self, kind: StateKind) -> Result<&Arc<dyn StateHydrator>> {
        self.states
            .get(&kind)
            .ok_or_else(|| FlowError::lookup(format!("no hydrator registered for {kind} states")))
    }

    pub fn field(&self, kind: FieldKind) -> Result<&Arc<dyn FieldHydrator>> {
        self.fields
            .get(&kind)
            .ok_or_else(|| FlowError::lookup(format!("no hydrator registered for {kind}")))
    }

    /// Resolve a `Type` discriminant to its state kind and hydrator.
    pub fn resolve_type(&self, type_name: &str) -> Result<(StateKind, &Arc<dyn StateHydrator>)> {
        let kind = StateKind::from_type_name(type_name)
            .ok_or_else(|| FlowError::lookup(format!("unknown state Type '{type_name}'")))?;
        Ok((kind, self.state(kind)?))
    }
}

impl Default for HydratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for HydratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<_> = self.states.values().map(|h| h.name()).collect();
        let mut fields: Vec<_> = self.fields.values().map(|h| h.name()).collect();
        states.sort_unstable();
        fields.sort_unstable();
        f.debug_struct("HydratorRegistry")
            .field("states", &states)
            .field("fields", &fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_kind() {
        let registry = HydratorRegistry::with_defaults();
        for kind in StateKind::ALL {
            assert_eq!(registry.state(kind).unwrap().kind(), kind);
        }
        for kind in FieldKind::ALL {
            assert_eq!(registry.field(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_lookup_errors() {
        let registry = HydratorRegistry::empty();
        assert!(registry.state(StateKind::Task).is_err_and(|err| err.is_lookup()));
        assert!(registry.field(FieldKind::Next).is_err_and(|err| err.is_lookup()));

        let registry = HydratorRegistry::with_defaults();
        let Err(err) = registry.resolve_type("Map") else {
            panic!("Map is not a supported state type");
        };
        assert!(err.is_lookup());
        assert!(err.to_string().contains("Map"));
    }
}
