//! Lifecycle events published around every hydration and extraction.
//!
//! Observers only watch: nothing they do can change a mapping result.
//! Event names have the shape `before|after:hydrate|extract:state|field|machine`,
//! followed by `:<Type>` for states and `:<FieldKind>` for fields, e.g.
//! `before:extract:state:Wait` or `after:hydrate:field:RetryField`.

use std::fmt;

use stepflow_core::{fields::FieldRef, machine::StateMachine, states::State};
use tracing::debug;

use crate::{Object, manager::HydratorManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Before,
    After,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Before => write!(f, "before"),
            Phase::After => write!(f, "after"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Hydrate,
    Extract,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hydrate => write!(f, "hydrate"),
            Action::Extract => write!(f, "extract"),
        }
    }
}

/// The object being mapped.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    State(&'a State),
    Field(FieldRef<'a>),
    Machine(&'a StateMachine),
}

impl Subject<'_> {
    fn segments(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Subject::State(state) => ("state", Some(state.kind().type_name())),
            Subject::Field(field) => ("field", Some(field.kind().name())),
            Subject::Machine(_) => ("machine", None),
        }
    }
}

/// One notification, borrowing all participants of the mapping step.
pub struct LifecycleEvent<'a> {
    pub phase: Phase,
    pub action: Action,
    pub subject: Subject<'a>,
    /// Document side: the input being hydrated, or the extracted map once it
    /// exists (`after:extract:*`).
    pub data: Option<&'a Object>,
    /// Name of the hydrator doing the work.
    pub hydrator: &'a str,
    pub manager: &'a HydratorManager,
}

impl LifecycleEvent<'_> {
    /// Colon separated event name, e.g. `before:extract:state:Wait`.
    pub fn name(&self) -> String {
        let (subject, variant) = self.subject.segments();
        match variant {
            Some(variant) => format!("{}:{}:{subject}:{variant}", self.phase, self.action),
            None => format!("{}:{}:{subject}", self.phase, self.action),
        }
    }
}

impl fmt::Debug for LifecycleEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleEvent")
            .field("name", &self.name())
            .field("subject", &self.subject)
            .field("hydrator", &self.hydrator)
            .finish_non_exhaustive()
    }
}

/// Receives lifecycle events from a manager.
pub trait LifecycleObserver: Send + Sync {
    fn publish(&self, event: &LifecycleEvent<'_>);
}

/// Forwards every event to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn publish(&self, event: &LifecycleEvent<'_>) {
        debug!(event = %event.name(), hydrator = event.hydrator, "lifecycle event");
    }
}

type Callback = Box<dyn Fn(&LifecycleEvent<'_>) + Send + Sync>;

/// Runs a callback for events whose name matches a pattern.
///
/// Patterns are matched segment by segment: `*` matches exactly one segment
/// and `**` any number of trailing or intermediate segments, so
/// `before:extract:state:*` sees every state extraction and `after:**` every
/// completed step.
pub struct Subscription {
    pattern: Vec<String>,
    callback: Callback,
}

impl Subscription {
    pub fn new<F>(pattern: &str, callback: F) -> Self
    where
        F: Fn(&LifecycleEvent<'_>) + Send + Sync + 'static,
    {
        Self {
            pattern: pattern.split(':').map(str::to_string).collect(),
            callback: Box::new(callback),
        }
    }

    pub fn pattern(&self) -> String {
        self.pattern.join(":")
    }

    pub fn matches(&self, name: &str) -> bool {
        let segments: Vec<&str> = name.split(':').collect();
        let pattern: Vec<&str> = self.pattern.iter().map(String::as_str).collect();
        matches_segments(&pattern, &segments)
    }
}

fn matches_segments(pattern: &[&str], name: &[&str]) -> bool {
    match (pattern.split_first(), name.split_first()) {
        (None, None) => true,
        (Some((&"**", rest)), _) => {
            matches_segments(rest, name)
                || (!name.is_empty() && matches_segments(pattern, &name[1..]))
        }
        (Some((head, rest)), Some((segment, tail))) => {
            (*head == "*" || head == segment) && matches_segments(rest, tail)
        }
        _ => false,
    }
}

impl LifecycleObserver for Subscription {
    fn publish(&self, event: &LifecycleEvent<'_>) {
        if self.matches(&event.name()) {
            (self.callback)(event);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("pattern", &self.pattern())
            .finish_non_exhaustive()
    }
}

/// Counts events with the `metrics` facade, labelled by event name.
#[cfg(feature = "metrics")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

#[cfg(feature = "metrics")]
impl LifecycleObserver for MetricsObserver {
    fn publish(&self, event: &LifecycleEvent<'_>) {
        metrics::counter!("stepflow_lifecycle_events_total", "event" => event.name()).increment(1);
    }
}
