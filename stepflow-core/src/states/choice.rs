use crate::{
    choice::{self, ChoiceOperation, ComparatorOperation, ComparatorRule, LogicOperation, LogicRule},
    error::FlowError,
    fields::{FieldMut, FieldRef, PathField},
};

/// Branches on the first matching choice rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub(super) name: String,
    pub(super) comment: Option<String>,
    operations: Vec<ChoiceOperation>,
    default: Option<String>,
    pub path: PathField,
}

impl Choice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            operations: Vec::new(),
            default: None,
            path: PathField::new(),
        }
    }

    /// Top-level rules, in evaluation order.
    pub fn operations(&self) -> &[ChoiceOperation] {
        &self.operations
    }

    pub fn operations_mut(&mut self) -> &mut Vec<ChoiceOperation> {
        &mut self.operations
    }

    /// Append a top-level comparator rule and return it for configuration.
    pub fn create_comparator_rule(&mut self, rule: ComparatorRule) -> &mut ComparatorOperation {
        choice::push_comparator(&mut self.operations, rule)
    }

    /// Append a top-level logic rule and return it for configuration.
    pub fn create_logic_rule(&mut self, rule: LogicRule) -> &mut LogicOperation {
        choice::push_logic(&mut self.operations, rule)
    }

    pub fn push_operation(&mut self, operation: impl Into<ChoiceOperation>) -> &mut Self {
        self.operations.push(operation.into());
        self
    }

    /// State taken when no rule matches.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn default_to(&mut self, state: impl Into<String>) -> &mut Self {
        self.default = Some(state.into());
        self
    }

    pub fn fields(&self) -> Vec<FieldRef<'_>> {
        vec![FieldRef::Path(&self.path)]
    }

    pub fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        vec![FieldMut::Path(&mut self.path)]
    }

    pub fn validate(&self) -> Vec<FlowError> {
        let mut errors = Vec::new();
        if self.operations.is_empty() {
            errors.push(FlowError::validation("Choices must contain at least one rule"));
        }
        for (index, operation) in self.operations.iter().enumerate() {
            errors.extend(operation.validate_top_level(&format!("Choices[{index}]")));
        }
        if self.default.as_deref() == Some("") {
            errors.push(FlowError::validation("Default state name is empty"));
        }
        errors
    }
}
