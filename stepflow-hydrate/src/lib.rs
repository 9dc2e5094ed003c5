//! # StepFlow Hydrate
//!
//! Bidirectional mapping between the [`stepflow_core`] object model and the
//! JSON form of Amazon States Language definitions.
//!
//! ## Components
//!
//! - **HydratorManager**: dispatches every state and field to its hydrator,
//!   in both directions, and publishes lifecycle events
//! - **HydratorRegistry**: lookup tables from state types and field kinds to hydrators
//! - **Generator**: registry-free serializer producing the same maps as the manager
//! - **Document**: JSON and YAML text codec
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use stepflow_hydrate::prelude::*;
//!
//! # fn main() -> stepflow_core::error::Result<()> {
//! let manager = HydratorManager::new();
//! let definition = json!({
//!     "StartAt": "foo",
//!     "States": {
//!         "foo": {"Type": "Task", "Resource": "xy", "End": true}
//!     }
//! });
//!
//! let machine = manager.parse_state_machine(&definition)?;
//! assert_eq!(machine.states.start_state_name(), Some("foo"));
//!
//! let extracted = manager.extract_state_machine(&machine)?;
//! assert_eq!(serde_json::Value::Object(extracted), definition);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod generator;
pub mod hydrators;
pub mod lifecycle;
pub mod manager;
pub mod registry;

#[cfg(test)]
mod manager_test;
#[cfg(test)]
mod roundtrip_test;

/// JSON object as produced and consumed by hydrators.
pub type Object = serde_json::Map<String, serde_json::Value>;

/// Convenient re-exports for common use.
pub mod prelude {
    pub use stepflow_core::prelude::*;

    #[cfg(feature = "metrics")]
    pub use crate::lifecycle::MetricsObserver;
    pub use crate::{
        Object,
        config::{HydratorConfig, UnknownKeyPolicy},
        document::{Document, Format},
        generator::{generate_state, generate_state_machine, generate_states},
        lifecycle::{
            Action, LifecycleEvent, LifecycleObserver, Phase, Subject, Subscription,
            TracingObserver,
        },
        manager::{HydratorManager, HydratorManagerBuilder},
        registry::{FieldHydrator, HydratorRegistry, StateHydrator},
    };
}
