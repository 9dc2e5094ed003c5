use crate::{
    error::FlowError,
    fields::{FieldMut, FieldRef, PathField},
};

/// Stops an execution successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct Succeed {
    pub(super) name: String,
    pub(super) comment: Option<String>,
    pub path: PathField,
}

impl Succeed {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            path: PathField::new(),
        }
    }

    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        vec![FieldRef::Path(&self.path)]
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        vec![FieldMut::Path(&mut self.path)]
    }

    pub fn validate(&self) -> Vec<FlowError> {
        Vec::new()
    }
}
