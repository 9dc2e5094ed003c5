//! State collections, parallel branches and the state machine.

use std::collections::HashSet;

use crate::{
    error::{FlowError, Result},
    fields::Field,
    states::State,
};

/// Ordered collection of uniquely named states with a start state.
///
/// Names only need to be unique within one collection: each [`Branch`] of a
/// Parallel state is its own namespace.
///
/// Two collections are equal when they hold the same states and resolve to
/// the same start state, whether that start was set explicitly or not.
#[derive(Debug, Clone, Default)]
pub struct StateCollection {
    states: Vec<State>,
    start_at: Option<String>,
}

impl PartialEq for StateCollection {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states && self.start_state_name() == other.start_state_name()
    }
}

impl StateCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state. Fails if a state with the same name already exists.
    pub fn add(&mut self, state: impl Into<State>) -> Result<&mut Self> {
        let state = state.into();
        if self.contains(state.name()) {
            return Err(FlowError::validation(format!(
                "State '{}' is already defined",
                state.name()
            )));
        }
        self.states.push(state);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|state| state.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut State> {
        self.states.iter_mut().find(|state| state.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All states in insertion order.
    pub fn all(&self) -> &[State] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut State> {
        self.states.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Declare the start state explicitly.
    pub fn set_start(&mut self, name: impl Into<String>) -> &mut Self {
        self.start_at = Some(name.into());
        self
    }

    /// The declared start state, or the first state when none was declared.
    pub fn start_state_name(&self) -> Option<&str> {
        self.start_at
            .as_deref()
            .or_else(|| self.states.first().map(State::name))
    }

    pub fn start_state(&self) -> Option<&State> {
        self.start_state_name().and_then(|name| self.get(name))
    }

    /// Chain states in insertion order.
    ///
    /// Every state with an unconfigured transition continues with the state
    /// added after it; the last one ends the execution.
    pub fn link(&mut self) -> &mut Self {
        let successors: Vec<Option<String>> = self
            .states
            .iter()
            .skip(1)
            .map(|state| Some(state.name().to_string()))
            .chain(std::iter::once(None))
            .collect();
        for (state, successor) in self.states.iter_mut().zip(successors) {
            let Some(next) = state.next_mut() else {
                continue;
            };
            if next.is_configured() {
                continue;
            }
            match successor {
                Some(name) => next.set(name),
                None => next.end(),
            };
        }
        self
    }

    /// Validate every state and resolve all transitions within this
    /// collection, recursing into parallel branches.
    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = Vec::new();
        match self.start_state_name() {
            None => errors.push(FlowError::validation(
                "a state collection needs at least one state",
            )),
            Some(start) if !self.contains(start) => {
                errors.push(FlowError::MissingStartState(start.to_string()));
            }
            Some(_) => {}
        }

        let names: HashSet<&str> = self.states.iter().map(State::name).collect();
        for state in &self.states {
            errors.extend(state.validate());
            for target in state.transition_targets() {
                if !names.contains(target) {
                    errors.push(FlowError::graph_integrity(state.name(), target));
                }
            }
            if let State::Parallel(parallel) = state {
                for (index, branch) in parallel.branches().iter().enumerate() {
                    let context = format!("{} branch #{index}", state.name());
                    errors.extend(
                        branch
                            .states
                            .validate()
                            .into_iter()
                            .map(|err| err.context(&context)),
                    );
                }
            }
        }
        errors
    }
}

/// One branch of a Parallel state. Its states form an isolated namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch {
    pub states: StateCollection,
}

impl Branch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Root of a workflow definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateMachine {
    pub states: StateCollection,
    comment: Option<String>,
    version: Option<String>,
    timeout_seconds: Option<u64>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = Some(version.into());
        self
    }

    /// Maximum run time of an execution.
    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    pub fn set_timeout_seconds(&mut self, seconds: u64) -> &mut Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// All problems found in the definition; empty when it is valid.
    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = self.states.validate();
        if self.timeout_seconds == Some(0) {
            errors.push(FlowError::validation("TimeoutSeconds must be positive"));
        }
        errors
    }

    /// Fails with the first problem found, if any.
    pub fn ensure_valid(&self) -> Result<()> {
        match self.validate().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
