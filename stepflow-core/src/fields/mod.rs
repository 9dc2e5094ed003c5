//! Field framework.
//!
//! A field is an independently configurable attribute of a state (or of a
//! choice operation / catcher). Every field tracks whether it has been set
//! explicitly; only configured fields show up in a serialized definition.

pub mod catch;
pub mod error_type;
pub mod next;
pub mod path;
pub mod result;
pub mod result_path;
pub mod retry;

use std::fmt;

pub use catch::{CatchField, Catcher};
pub use error_type::ErrorType;
pub use next::{NextField, Transition};
pub use path::PathField;
pub use result::ResultField;
pub use result_path::{ResultPath, ResultPathField};
pub use retry::{Retrier, RetryField};

/// Common behaviour of every field type.
pub trait Field {
    /// Runtime kind used for hydrator dispatch.
    fn kind(&self) -> FieldKind;

    /// Whether a value was explicitly set.
    fn is_configured(&self) -> bool;
}

/// The closed set of field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Next,
    Path,
    Result,
    ResultPath,
    Retry,
    Catch,
}

impl FieldKind {
    /// All field kinds.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Next,
        FieldKind::Path,
        FieldKind::Result,
        FieldKind::ResultPath,
        FieldKind::Retry,
        FieldKind::Catch,
    ];

    /// Name used in lifecycle event names and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Next => "NextField",
            FieldKind::Path => "PathField",
            FieldKind::Result => "ResultField",
            FieldKind::ResultPath => "ResultPathField",
            FieldKind::Retry => "RetryField",
            FieldKind::Catch => "CatchField",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared borrow of a field of any kind.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Next(&'a NextField),
    Path(&'a PathField),
    Result(&'a ResultField),
    ResultPath(&'a ResultPathField),
    Retry(&'a RetryField),
    Catch(&'a CatchField),
}

impl FieldRef<'_> {
    fn as_dyn(&self) -> &dyn Field {
        match self {
            FieldRef::Next(field) => *field,
            FieldRef::Path(field) => *field,
            FieldRef::Result(field) => *field,
            FieldRef::ResultPath(field) => *field,
            FieldRef::Retry(field) => *field,
            FieldRef::Catch(field) => *field,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.as_dyn().kind()
    }

    pub fn is_configured(&self) -> bool {
        self.as_dyn().is_configured()
    }
}

/// Exclusive borrow of a field of any kind.
#[derive(Debug)]
pub enum FieldMut<'a> {
    Next(&'a mut NextField),
    Path(&'a mut PathField),
    Result(&'a mut ResultField),
    ResultPath(&'a mut ResultPathField),
    Retry(&'a mut RetryField),
    Catch(&'a mut CatchField),
}

impl FieldMut<'_> {
    pub fn kind(&self) -> FieldKind {
        self.as_ref().kind()
    }

    pub fn is_configured(&self) -> bool {
        self.as_ref().is_configured()
    }

    /// Downgrade to a shared borrow.
    pub fn as_ref(&self) -> FieldRef<'_> {
        match self {
            FieldMut::Next(field) => FieldRef::Next(&**field),
            FieldMut::Path(field) => FieldRef::Path(&**field),
            FieldMut::Result(field) => FieldRef::Result(&**field),
            FieldMut::ResultPath(field) => FieldRef::ResultPath(&**field),
            FieldMut::Retry(field) => FieldRef::Retry(&**field),
            FieldMut::Catch(field) => FieldRef::Catch(&**field),
        }
    }

    /// Reborrow for a shorter lifetime so the field can be used again afterwards.
    pub fn reborrow(&mut self) -> FieldMut<'_> {
        match self {
            FieldMut::Next(field) => FieldMut::Next(&mut **field),
            FieldMut::Path(field) => FieldMut::Path(&mut **field),
            FieldMut::Result(field) => FieldMut::Result(&mut **field),
            FieldMut::ResultPath(field) => FieldMut::ResultPath(&mut **field),
            FieldMut::Retry(field) => FieldMut::Retry(&mut **field),
            FieldMut::Catch(field) => FieldMut::Catch(&mut **field),
        }
    }
}
