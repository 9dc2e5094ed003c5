use super::check_next;
use crate::{
    error::FlowError,
    fields::{FieldMut, FieldRef, NextField, PathField, ResultField, ResultPathField},
};

/// Passes its input to its output, optionally injecting a fixed result.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    pub(super) name: String,
    pub(super) comment: Option<String>,
    pub path: PathField,
    pub next: NextField,
    pub result: ResultField,
    pub result_path: ResultPathField,
}

impl Pass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            path: PathField::new(),
            next: NextField::new(),
            result: ResultField::new(),
            result_path: ResultPathField::new(),
        }
    }

    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        vec![
            FieldRef::Path(&self.path),
            FieldRef::Next(&self.next),
            FieldRef::Result(&self.result),
            FieldRef::ResultPath(&self.result_path),
        ]
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        vec![
            FieldMut::Path(&mut self.path),
            FieldMut::Next(&mut self.next),
            FieldMut::Result(&mut self.result),
            FieldMut::ResultPath(&mut self.result_path),
        ]
    }

    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = Vec::new();
        check_next(&self.next, &mut errors);
        errors
    }
}
