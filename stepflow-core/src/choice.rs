//! Choice rules: the boolean expression tree guarding a Choice state's branches.
//!
//! A rule is either a comparator leaf (`{"Variable": "$.x", "NumericEquals": 1}`)
//! or a logic node combining other rules (`And`, `Or`, `Not`). Every rule has a
//! [`NextField`], but only the top-level rules of a Choice state use it.

use std::fmt;

use chrono::DateTime;
use serde_json::Value;

use crate::{
    error::{FlowError, Result},
    fields::NextField,
    json_path::{self, JsonPathValidator, PathValidator},
};

/// Type of literal a comparator compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueFamily {
    String,
    Numeric,
    Boolean,
    Timestamp,
}

impl ValueFamily {
    /// Whether `value` is an acceptable literal for this family.
    ///
    /// Timestamps are strings in RFC 3339 format.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueFamily::String, Value::String(_)) => true,
            (ValueFamily::Numeric, Value::Number(_)) => true,
            (ValueFamily::Boolean, Value::Bool(_)) => true,
            (ValueFamily::Timestamp, Value::String(text)) => {
                DateTime::parse_from_rfc3339(text).is_ok()
            }
            _ => false,
        }
    }
}

impl fmt::Display for ValueFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueFamily::String => write!(f, "string"),
            ValueFamily::Numeric => write!(f, "numeric"),
            ValueFamily::Boolean => write!(f, "boolean"),
            ValueFamily::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Comparison rules. The Boolean family only supports equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorRule {
    StringEquals,
    StringLessThan,
    StringGreaterThan,
    StringLessThanEquals,
    StringGreaterThanEquals,
    NumericEquals,
    NumericLessThan,
    NumericGreaterThan,
    NumericLessThanEquals,
    NumericGreaterThanEquals,
    BooleanEquals,
    TimestampEquals,
    TimestampLessThan,
    TimestampGreaterThan,
    TimestampLessThanEquals,
    TimestampGreaterThanEquals,
}

impl ComparatorRule {
    pub const ALL: [ComparatorRule; 16] = [
        ComparatorRule::StringEquals,
        ComparatorRule::StringLessThan,
        ComparatorRule::StringGreaterThan,
        ComparatorRule::StringLessThanEquals,
        ComparatorRule::StringGreaterThanEquals,
        ComparatorRule::NumericEquals,
        ComparatorRule::NumericLessThan,
        ComparatorRule::NumericGreaterThan,
        ComparatorRule::NumericLessThanEquals,
        ComparatorRule::NumericGreaterThanEquals,
        ComparatorRule::BooleanEquals,
        ComparatorRule::TimestampEquals,
        ComparatorRule::TimestampLessThan,
        ComparatorRule::TimestampGreaterThan,
        ComparatorRule::TimestampLessThanEquals,
        ComparatorRule::TimestampGreaterThanEquals,
    ];

    /// Wire keyword, e.g. `StringEquals`.
    pub fn keyword(&self) -> &'static str {
        match self {
            ComparatorRule::StringEquals => "StringEquals",
            ComparatorRule::StringLessThan => "StringLessThan",
            ComparatorRule::StringGreaterThan => "StringGreaterThan",
            ComparatorRule::StringLessThanEquals => "StringLessThanEquals",
            ComparatorRule::StringGreaterThanEquals => "StringGreaterThanEquals",
            ComparatorRule::NumericEquals => "NumericEquals",
            ComparatorRule::NumericLessThan => "NumericLessThan",
            ComparatorRule::NumericGreaterThan => "NumericGreaterThan",
            ComparatorRule::NumericLessThanEquals => "NumericLessThanEquals",
            ComparatorRule::NumericGreaterThanEquals => "NumericGreaterThanEquals",
            ComparatorRule::BooleanEquals => "BooleanEquals",
            ComparatorRule::TimestampEquals => "TimestampEquals",
            ComparatorRule::TimestampLessThan => "TimestampLessThan",
            ComparatorRule::TimestampGreaterThan => "TimestampGreaterThan",
            ComparatorRule::TimestampLessThanEquals => "TimestampLessThanEquals",
            ComparatorRule::TimestampGreaterThanEquals => "TimestampGreaterThanEquals",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.keyword() == keyword)
    }

    pub fn family(&self) -> ValueFamily {
        match self {
            ComparatorRule::StringEquals
            | ComparatorRule::StringLessThan
            | ComparatorRule::StringGreaterThan
            | ComparatorRule::StringLessThanEquals
            | ComparatorRule::StringGreaterThanEquals => ValueFamily::String,
            ComparatorRule::NumericEquals
            | ComparatorRule::NumericLessThan
            | ComparatorRule::NumericGreaterThan
            | ComparatorRule::NumericLessThanEquals
            | ComparatorRule::NumericGreaterThanEquals => ValueFamily::Numeric,
            ComparatorRule::BooleanEquals => ValueFamily::Boolean,
            ComparatorRule::TimestampEquals
            | ComparatorRule::TimestampLessThan
            | ComparatorRule::TimestampGreaterThan
            | ComparatorRule::TimestampLessThanEquals
            | ComparatorRule::TimestampGreaterThanEquals => ValueFamily::Timestamp,
        }
    }
}

impl fmt::Display for ComparatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicRule {
    And,
    Or,
    Not,
}

impl LogicRule {
    pub const ALL: [LogicRule; 3] = [LogicRule::And, LogicRule::Or, LogicRule::Not];

    pub fn keyword(&self) -> &'static str {
        match self {
            LogicRule::And => "And",
            LogicRule::Or => "Or",
            LogicRule::Not => "Not",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.keyword() == keyword)
    }
}

impl fmt::Display for LogicRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Leaf rule comparing the value at `variable` with a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparatorOperation {
    rule: ComparatorRule,
    variable: Option<String>,
    value: Option<Value>,
    /// Branch target when this rule is a top-level rule.
    pub next: NextField,
}

impl ComparatorOperation {
    pub fn new(rule: ComparatorRule) -> Self {
        Self {
            rule,
            variable: None,
            value: None,
            next: NextField::new(),
        }
    }

    pub fn rule(&self) -> ComparatorRule {
        self.rule
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_variable(&mut self, path: &str) -> Result<&mut Self> {
        self.set_variable_with(&JsonPathValidator, path)
    }

    pub fn set_variable_with(
        &mut self,
        validator: &dyn PathValidator,
        path: &str,
    ) -> Result<&mut Self> {
        json_path::ensure_valid(validator, path)?;
        self.variable = Some(path.to_string());
        Ok(self)
    }

    /// Set the literal to compare against; its type must match the rule family.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        let value = value.into();
        let family = self.rule.family();
        if !family.accepts(&value) {
            return Err(FlowError::validation(format!(
                "{} expects a {family} value, got {value}",
                self.rule
            )));
        }
        self.value = Some(value);
        Ok(self)
    }

    fn validate(&self, location: &str, errors: &mut Vec<FlowError>) {
        if self.variable.is_none() {
            errors.push(FlowError::validation(format!(
                "{location}: {} has no Variable",
                self.rule
            )));
        }
        if self.value.is_none() {
            errors.push(FlowError::validation(format!(
                "{location}: {} has no comparison value",
                self.rule
            )));
        }
    }
}

/// Interior rule combining child rules.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicOperation {
    rule: LogicRule,
    operations: Vec<ChoiceOperation>,
    /// Branch target when this rule is a top-level rule.
    pub next: NextField,
}

impl LogicOperation {
    pub fn new(rule: LogicRule) -> Self {
        Self {
            rule,
            operations: Vec::new(),
            next: NextField::new(),
        }
    }

    pub fn rule(&self) -> LogicRule {
        self.rule
    }

    pub fn operations(&self) -> &[ChoiceOperation] {
        &self.operations
    }

    pub fn operations_mut(&mut self) -> &mut Vec<ChoiceOperation> {
        &mut self.operations
    }

    pub fn create_comparator_rule(&mut self, rule: ComparatorRule) -> &mut ComparatorOperation {
        push_comparator(&mut self.operations, rule)
    }

    pub fn create_logic_rule(&mut self, rule: LogicRule) -> &mut LogicOperation {
        push_logic(&mut self.operations, rule)
    }

    pub fn push(&mut self, operation: impl Into<ChoiceOperation>) -> &mut Self {
        self.operations.push(operation.into());
        self
    }

    fn validate(&self, location: &str, errors: &mut Vec<FlowError>) {
        let count = self.operations.len();
        match self.rule {
            LogicRule::Not if count != 1 => errors.push(FlowError::validation(format!(
                "{location}: Not requires exactly one rule, found {count}"
            ))),
            LogicRule::And | LogicRule::Or if count == 0 => errors.push(FlowError::validation(
                format!("{location}: {} requires at least one rule", self.rule),
            )),
            _ => {}
        }
        for (index, operation) in self.operations.iter().enumerate() {
            operation.validate_nested(&format!("{location}.{}[{index}]", self.rule), errors);
        }
    }
}

/// Node of a choice rule tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceOperation {
    Comparator(ComparatorOperation),
    Logic(LogicOperation),
}

impl ChoiceOperation {
    pub fn next(&self) -> &NextField {
        match self {
            ChoiceOperation::Comparator(op) => &op.next,
            ChoiceOperation::Logic(op) => &op.next,
        }
    }

    pub fn next_mut(&mut self) -> &mut NextField {
        match self {
            ChoiceOperation::Comparator(op) => &mut op.next,
            ChoiceOperation::Logic(op) => &mut op.next,
        }
    }

    pub fn as_comparator(&self) -> Option<&ComparatorOperation> {
        match self {
            ChoiceOperation::Comparator(op) => Some(op),
            ChoiceOperation::Logic(_) => None,
        }
    }

    pub fn as_logic(&self) -> Option<&LogicOperation> {
        match self {
            ChoiceOperation::Logic(op) => Some(op),
            ChoiceOperation::Comparator(_) => None,
        }
    }

    /// Validate a top-level rule: the tree must be well formed and a
    /// successor state must be named.
    pub fn validate_top_level(&self, location: &str) -> Vec<FlowError> {
        let mut errors = Vec::new();
        match self.next().get() {
            Some(name) if !name.is_empty() => {}
            _ => errors.push(FlowError::validation(format!(
                "{location}: choice rule must name a Next state"
            ))),
        }
        self.validate_nested(location, &mut errors);
        errors
    }

    fn validate_nested(&self, location: &str, errors: &mut Vec<FlowError>) {
        match self {
            ChoiceOperation::Comparator(op) => op.validate(location, errors),
            ChoiceOperation::Logic(op) => op.validate(location, errors),
        }
    }
}

impl From<ComparatorOperation> for ChoiceOperation {
    fn from(op: ComparatorOperation) -> Self {
        ChoiceOperation::Comparator(op)
    }
}

impl From<LogicOperation> for ChoiceOperation {
    fn from(op: LogicOperation) -> Self {
        ChoiceOperation::Logic(op)
    }
}

pub(crate) fn push_comparator(
    operations: &mut Vec<ChoiceOperation>,
    rule: ComparatorRule,
) -> &mut ComparatorOperation {
    operations.push(ChoiceOperation::Comparator(ComparatorOperation::new(rule)));
    match operations.last_mut() {
        Some(ChoiceOperation::Comparator(op)) => op,
        _ => unreachable!("comparator rule was just pushed"),
    }
}

pub(crate) fn push_logic(
    operations: &mut Vec<ChoiceOperation>,
    rule: LogicRule,
) -> &mut LogicOperation {
    operations.push(ChoiceOperation::Logic(LogicOperation::new(rule)));
    match operations.last_mut() {
        Some(ChoiceOperation::Logic(op)) => op,
        _ => unreachable!("logic rule was just pushed"),
    }
}
