//! # StepFlow Core
//!
//! Object model for workflow definitions written in the Amazon States
//! Language: typed states, their configurable fields, the boolean rule trees
//! of Choice states and the state machine graph tying them together.
//!
//! ## Core Concepts
//!
//! - **State**: a named node of the graph (Pass, Task, Wait, Succeed, Fail, Choice, Parallel)
//! - **Field**: an attribute of a state that is only part of the definition once configured
//! - **StateCollection**: ordered, uniquely named states with a start state
//! - **Branch**: an isolated state collection owned by a Parallel state
//!
//! ## Quick Start
//!
//! ```rust
//! use stepflow_core::prelude::*;
//!
//! # fn main() -> stepflow_core::error::Result<()> {
//! let mut task = Task::new("Charge");
//! task.set_resource("arn:aws:lambda:us-east-1:123456789012:function:Charge");
//! task.retry.all().set_max_attempts(2);
//!
//! let mut machine = StateMachine::new();
//! machine.states.add(task)?.add(Succeed::new("Done"))?.link();
//!
//! assert!(machine.validate().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod choice;
pub mod error;
pub mod fields;
pub mod json_path;
pub mod machine;
pub mod states;

/// Convenient re-exports for common use.
pub mod prelude {
    pub use crate::{
        choice::{
            ChoiceOperation, ComparatorOperation, ComparatorRule, LogicOperation, LogicRule,
            ValueFamily,
        },
        error::{ErrorCategory, FlowError, Result},
        fields::{
            CatchField, Catcher, ErrorType, Field, FieldKind, FieldMut, FieldRef, NextField,
            PathField, ResultField, ResultPath, ResultPathField, Retrier, RetryField, Transition,
        },
        json_path::{JsonPathValidator, PathValidator},
        machine::{Branch, StateCollection, StateMachine},
        states::{Choice, Fail, Parallel, Pass, State, StateKind, Succeed, Task, Wait},
    };
}
