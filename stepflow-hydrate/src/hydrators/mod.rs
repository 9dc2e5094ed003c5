//! Built-in hydrators for every state type and field kind.

pub mod choice;
pub mod fields;
pub mod machine;
pub mod states;
pub mod value;

pub use fields::{
    CatchHydrator, NextHydrator, PathHydrator, ResultHydrator, ResultPathHydrator, RetryHydrator,
};
pub use states::{
    ChoiceHydrator, FailHydrator, ParallelHydrator, PassHydrator, SucceedHydrator, TaskHydrator,
    WaitHydrator,
};
