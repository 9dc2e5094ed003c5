//! State variants.
//!
//! [`State`] is a closed tagged union over the seven state types of the
//! States language. Each variant is a plain struct holding its name, an
//! optional comment, the variant attributes and a fixed set of fields.

mod choice;
mod fail;
mod parallel;
mod pass;
mod succeed;
mod task;
mod wait;

use std::fmt;

pub use choice::Choice;
pub use fail::Fail;
pub use parallel::Parallel;
pub use pass::Pass;
pub use succeed::Succeed;
pub use task::Task;
pub use wait::Wait;

use crate::{
    error::FlowError,
    fields::{FieldMut, FieldRef, NextField},
};

/// Discriminant of a state (`"Type"` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Pass,
    Task,
    Wait,
    Succeed,
    Fail,
    Choice,
    Parallel,
}

impl StateKind {
    pub const ALL: [StateKind; 7] = [
        StateKind::Pass,
        StateKind::Task,
        StateKind::Wait,
        StateKind::Succeed,
        StateKind::Fail,
        StateKind::Choice,
        StateKind::Parallel,
    ];

    /// Value of the `Type` key.
    pub fn type_name(&self) -> &'static str {
        match self {
            StateKind::Pass => "Pass",
            StateKind::Task => "Task",
            StateKind::Wait => "Wait",
            StateKind::Succeed => "Succeed",
            StateKind::Fail => "Fail",
            StateKind::Choice => "Choice",
            StateKind::Parallel => "Parallel",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Build a bare state of this kind.
    pub fn construct(&self, name: impl Into<String>) -> State {
        match self {
            StateKind::Pass => Pass::new(name).into(),
            StateKind::Task => Task::new(name).into(),
            StateKind::Wait => Wait::new(name).into(),
            StateKind::Succeed => Succeed::new(name).into(),
            StateKind::Fail => Fail::new(name).into(),
            StateKind::Choice => Choice::new(name).into(),
            StateKind::Parallel => Parallel::new(name).into(),
        }
    }

    /// Succeed and Fail end an execution and have no transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StateKind::Succeed | StateKind::Fail)
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Implements the name/comment accessors shared by every variant struct.
macro_rules! impl_common {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $ty {
                pub fn name(&self) -> &str {
                    &self.name
                }

                pub fn comment(&self) -> Option<&str> {
                    self.comment.as_deref()
                }

                pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
                    self.comment = Some(comment.into());
                    self
                }
            }

            impl From<$ty> for State {
                fn from(state: $ty) -> Self {
                    State::$ty(state)
                }
            }
        )+
    };
}

impl_common!(Pass, Task, Wait, Succeed, Fail, Choice, Parallel);

macro_rules! each_variant {
    ($value:expr, $state:ident => $body:expr) => {
        match $value {
            State::Pass($state) => $body,
            State::Task($state) => $body,
            State::Wait($state) => $body,
            State::Succeed($state) => $body,
            State::Fail($state) => $body,
            State::Choice($state) => $body,
            State::Parallel($state) => $body,
        }
    };
}

/// A named node of a state collection.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Pass(Pass),
    Task(Task),
    Wait(Wait),
    Succeed(Succeed),
    Fail(Fail),
    Choice(Choice),
    Parallel(Parallel),
}

impl State {
    pub fn kind(&self) -> StateKind {
        match self {
            State::Pass(_) => StateKind::Pass,
            State::Task(_) => StateKind::Task,
            State::Wait(_) => StateKind::Wait,
            State::Succeed(_) => StateKind::Succeed,
            State::Fail(_) => StateKind::Fail,
            State::Choice(_) => StateKind::Choice,
            State::Parallel(_) => StateKind::Parallel,
        }
    }

    pub fn name(&self) -> &str {
        each_variant!(self, state => state.name())
    }

    pub fn comment(&self) -> Option<&str> {
        each_variant!(self, state => state.comment())
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        each_variant!(self, state => { state.set_comment(comment); });
        self
    }

    /// The field members of this state, in declaration order.
    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        each_variant!(self, state => state.fields())
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        each_variant!(self, state => state.fields_mut())
    }

    /// The transition field, for variants that have one.
    pub fn next(&self) -> Option<&NextField> {
        match self {
            State::Pass(state) => Some(&state.next),
            State::Task(state) => Some(&state.next),
            State::Wait(state) => Some(&state.next),
            State::Parallel(state) => Some(&state.next),
            State::Succeed(_) | State::Fail(_) | State::Choice(_) => None,
        }
    }

    pub fn next_mut(&mut self) -> Option<&mut NextField> {
        match self {
            State::Pass(state) => Some(&mut state.next),
            State::Task(state) => Some(&mut state.next),
            State::Wait(state) => Some(&mut state.next),
            State::Parallel(state) => Some(&mut state.next),
            State::Succeed(_) | State::Fail(_) | State::Choice(_) => None,
        }
    }

    /// Check the variant's own invariants. Transition targets are resolved
    /// by the owning collection.
    pub fn validate(&self) -> Vec<FlowError> {
        let name = self.name();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FlowError::validation("state name must not be empty"));
        }
        errors.extend(each_variant!(self, state => state.validate()));
        errors
            .into_iter()
            .map(|err| err.context(format_args!("State '{name}'")))
            .collect()
    }

    /// Names of the states this state may transition to, within its own
    /// collection: `Next`, catcher targets, choice targets and `Default`.
    pub fn transition_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = self.next().and_then(NextField::get).into_iter().collect();
        match self {
            State::Task(state) => {
                targets.extend(state.catch.catchers().iter().filter_map(|c| c.next.get()));
            }
            State::Parallel(state) => {
                targets.extend(state.catch.catchers().iter().filter_map(|c| c.next.get()));
            }
            State::Choice(state) => {
                targets.extend(state.operations().iter().filter_map(|op| op.next().get()));
                targets.extend(state.default());
            }
            _ => {}
        }
        targets
    }

    pub fn as_pass(&self) -> Option<&Pass> {
        match self {
            State::Pass(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            State::Task(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_task_mut(&mut self) -> Option<&mut Task> {
        match self {
            State::Task(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_wait(&self) -> Option<&Wait> {
        match self {
            State::Wait(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_fail(&self) -> Option<&Fail> {
        match self {
            State::Fail(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            State::Choice(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_choice_mut(&mut self) -> Option<&mut Choice> {
        match self {
            State::Choice(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_parallel(&self) -> Option<&Parallel> {
        match self {
            State::Parallel(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_parallel_mut(&mut self) -> Option<&mut Parallel> {
        match self {
            State::Parallel(state) => Some(state),
            _ => None,
        }
    }
}

/// Shared check for the transition field of non-terminal variants.
fn check_next(next: &NextField, errors: &mut Vec<FlowError>) {
    if let Err(err) = next.validate() {
        errors.push(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldKind;

    #[test]
    fn test_type_names() {
        for kind in StateKind::ALL {
            assert_eq!(StateKind::from_type_name(kind.type_name()), Some(kind));
            let state = kind.construct("x");
            assert_eq!(state.kind(), kind);
            assert_eq!(state.name(), "x");
        }
        assert_eq!(StateKind::from_type_name("Map"), None);
    }

    #[test]
    fn test_field_lists() {
        let kinds = |state: &State| state.fields().iter().map(FieldRef::kind).collect::<Vec<_>>();

        assert_eq!(
            kinds(&StateKind::Pass.construct("p")),
            vec![FieldKind::Path, FieldKind::Next, FieldKind::Result, FieldKind::ResultPath]
        );
        assert_eq!(
            kinds(&StateKind::Task.construct("t")),
            vec![
                FieldKind::Path,
                FieldKind::Next,
                FieldKind::ResultPath,
                FieldKind::Retry,
                FieldKind::Catch
            ]
        );
        assert_eq!(kinds(&StateKind::Wait.construct("w")), vec![FieldKind::Path, FieldKind::Next]);
        assert_eq!(kinds(&StateKind::Succeed.construct("s")), vec![FieldKind::Path]);
        assert!(kinds(&StateKind::Fail.construct("f")).is_empty());
        assert_eq!(kinds(&StateKind::Choice.construct("c")), vec![FieldKind::Path]);
        assert_eq!(
            kinds(&StateKind::Parallel.construct("par")),
            kinds(&StateKind::Task.construct("t"))
        );
    }

    #[test]
    fn test_comment_is_shared() {
        let mut state = State::from(Pass::new("p"));
        assert_eq!(state.comment(), None);
        state.set_comment("hello");
        assert_eq!(state.comment(), Some("hello"));

        for kind in StateKind::ALL {
            let mut state = kind.construct("x");
            state.set_comment(kind.type_name()).set_comment("last");
            assert_eq!(state.comment(), Some("last"));
        }
    }

    #[test]
    fn test_validation_names_the_state() {
        let state = State::from(Pass::new("Idle"));
        let errors = state.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("State 'Idle'"));
    }

    #[test]
    fn test_transition_targets() {
        let mut task = Task::new("work");
        task.next.set("done");
        task.catch.all().next.set("recover");
        let state = State::from(task);
        assert_eq!(state.transition_targets(), vec!["done", "recover"]);

        assert!(State::from(Succeed::new("s")).transition_targets().is_empty());
    }
}
