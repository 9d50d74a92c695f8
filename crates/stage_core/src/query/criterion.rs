//! Criterion expression nodes.
//!
//! # Responsibility
//! - Define the operator taxonomy shared by predicates and selectors.
//! - Provide immutable leaf, composite and selector node types.
//!
//! # Invariants
//! - Nodes are only built by `restrictions`, so the operator tag always
//!   matches the node kind (comparison leaf, logical composite, aggregate).
//! - Nodes are never mutated after construction.

use super::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Operator tag carried by every criterion and selector node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Eq,
    Ne,
    Like,
    Gt,
    Lt,
    Gte,
    Lte,
    IsNull,
    IsMember,
    Count,
    CountDistinct,
    Sum,
    And,
    Or,
}

impl Operator {
    /// Leaf operators comparing a field against a value.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::Ne
                | Self::Like
                | Self::Gt
                | Self::Lt
                | Self::Gte
                | Self::Lte
                | Self::IsNull
                | Self::IsMember
        )
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::Count | Self::CountDistinct | Self::Sum)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Like => "LIKE",
            Self::Gt => "GT",
            Self::Lt => "LT",
            Self::Gte => "GTE",
            Self::Lte => "LTE",
            Self::IsNull => "IS_NULL",
            Self::IsMember => "IS_MEMBER",
            Self::Count => "COUNT",
            Self::CountDistinct => "COUNT_DISTINCT",
            Self::Sum => "SUM",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf predicate: `field <operator> value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleExpression {
    field: String,
    value: Value,
    operator: Operator,
}

impl SimpleExpression {
    pub(crate) fn new(field: impl Into<String>, value: Value, operator: Operator) -> Self {
        Self {
            field: field.into(),
            value,
            operator,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }
}

/// Ordered composition of child criteria joined by `And` or `Or`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    children: Vec<Criterion>,
    operator: Operator,
}

impl LogicalExpression {
    pub(crate) fn new(children: Vec<Criterion>, operator: Operator) -> Self {
        debug_assert!(operator.is_logical());
        Self { children, operator }
    }

    pub fn children(&self) -> &[Criterion] {
        &self.children
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Any query-predicate node.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Simple(SimpleExpression),
    Logical(LogicalExpression),
}

impl Criterion {
    pub fn operator(&self) -> Operator {
        match self {
            Self::Simple(expr) => expr.operator(),
            Self::Logical(expr) => expr.operator(),
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleExpression> {
        match self {
            Self::Simple(expr) => Some(expr),
            Self::Logical(_) => None,
        }
    }

    pub fn as_logical(&self) -> Option<&LogicalExpression> {
        match self {
            Self::Simple(_) => None,
            Self::Logical(expr) => Some(expr),
        }
    }
}

impl From<SimpleExpression> for Criterion {
    fn from(value: SimpleExpression) -> Self {
        Self::Simple(value)
    }
}

impl From<LogicalExpression> for Criterion {
    fn from(value: LogicalExpression) -> Self {
        Self::Logical(value)
    }
}

/// Aggregate projection over a field (count, distinct count, sum).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelector {
    field: String,
    operator: Operator,
}

impl SimpleSelector {
    pub(crate) fn new(field: impl Into<String>, operator: Operator) -> Self {
        debug_assert!(operator.is_aggregate());
        Self {
            field: field.into(),
            operator,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }
}
