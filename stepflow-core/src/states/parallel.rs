use crate::{
    error::FlowError,
    fields::{CatchField, FieldMut, FieldRef, NextField, PathField, ResultPathField, RetryField},
    machine::Branch,
};

/// Runs its branches concurrently and collects their outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Parallel {
    pub(super) name: String,
    pub(super) comment: Option<String>,
    branches: Vec<Branch>,
    pub path: PathField,
    pub next: NextField,
    pub result_path: ResultPathField,
    pub retry: RetryField,
    pub catch: CatchField,
}

impl Parallel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            branches: Vec::new(),
            path: PathField::new(),
            next: NextField::new(),
            result_path: ResultPathField::new(),
            retry: RetryField::new(),
            catch: CatchField::new(),
        }
    }

    /// Append an empty branch and return it for configuration.
    pub fn add_branch(&mut self) -> &mut Branch {
        self.branches.push(Branch::new());
        let last = self.branches.len() - 1;
        &mut self.branches[last]
    }

    pub fn push_branch(&mut self, branch: Branch) -> &mut Self {
        self.branches.push(branch);
        self
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branches_mut(&mut self) -> &mut [Branch] {
        &mut self.branches
    }

    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        vec![
            FieldRef::Path(&self.path),
            FieldRef::Next(&self.next),
            FieldRef::ResultPath(&self.result_path),
            FieldRef::Retry(&self.retry),
            FieldRef::Catch(&self.catch),
        ]
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        vec![
            FieldMut::Path(&mut self.path),
            FieldMut::Next(&mut self.next),
            FieldMut::ResultPath(&mut self.result_path),
            FieldMut::Retry(&mut self.retry),
            FieldMut::Catch(&mut self.catch),
        ]
    }

    /// Checks the state itself; branch contents are checked by the owning
    /// collection.
    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = Vec::new();
        if self.branches.is_empty() {
            errors.push(FlowError::validation("Branches must contain at least one branch"));
        }
        super::check_next(&self.next, &mut errors);
        errors.extend(self.retry.validate());
        errors.extend(self.catch.validate());
        errors
    }
}
