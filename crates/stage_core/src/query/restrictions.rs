//! Factory functions for criterion and selector nodes.
//!
//! # Responsibility
//! - Build predicate and selector nodes with a consistent operator tag.
//! - Apply the `ignore_null` elision policy.
//!
//! # Invariants
//! - With `ignore_null = true`, an empty value yields `None`. Callers omit the
//!   predicate; this is never an error.
//! - With `ignore_null = false`, a node is always returned.
//! - `and`/`or` drop elided (`None`) children and keep the order of the rest.

use super::criterion::{Criterion, LogicalExpression, Operator, SimpleExpression, SimpleSelector};
use super::value::Value;

const PATH_SEPARATOR: char = '.';

/// `COUNT(field)`. `count("*")` counts every matching row.
pub fn count(field: impl Into<String>) -> SimpleSelector {
    SimpleSelector::new(field, Operator::Count)
}

/// `COUNT(DISTINCT field)`.
pub fn count_distinct(field: impl Into<String>) -> SimpleSelector {
    SimpleSelector::new(field, Operator::CountDistinct)
}

/// `SUM(field)`.
pub fn sum(field: impl Into<String>) -> SimpleSelector {
    SimpleSelector::new(field, Operator::Sum)
}

/// Equal to.
pub fn eq(
    field: impl Into<String>,
    value: impl Into<Value>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, value.into(), Operator::Eq, ignore_null)
}

/// Not equal to.
pub fn ne(
    field: impl Into<String>,
    value: impl Into<Value>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, value.into(), Operator::Ne, ignore_null)
}

/// Greater than.
pub fn gt(
    field: impl Into<String>,
    value: impl Into<Value>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, value.into(), Operator::Gt, ignore_null)
}

/// Less than.
pub fn lt(
    field: impl Into<String>,
    value: impl Into<Value>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, value.into(), Operator::Lt, ignore_null)
}

/// Greater than or equal to.
pub fn gte(
    field: impl Into<String>,
    value: impl Into<Value>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, value.into(), Operator::Gte, ignore_null)
}

/// Less than or equal to.
pub fn lte(
    field: impl Into<String>,
    value: impl Into<Value>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, value.into(), Operator::Lte, ignore_null)
}

/// Collection-valued field contains `value`.
pub fn has_member(
    field: impl Into<String>,
    value: impl Into<Value>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, value.into(), Operator::IsMember, ignore_null)
}

/// Fuzzy text match. The operand is matched anywhere in the field.
pub fn like(
    field: impl Into<String>,
    value: Option<&str>,
    ignore_null: bool,
) -> Option<Criterion> {
    simple(field, Value::from(value), Operator::Like, ignore_null)
}

/// Field is null. Never elided.
pub fn is_null(field: impl Into<String>) -> Criterion {
    SimpleExpression::new(field, Value::Null, Operator::IsNull).into()
}

/// All children must hold.
pub fn and<I>(criteria: I) -> Criterion
where
    I: IntoIterator,
    I::Item: Into<Option<Criterion>>,
{
    logical(criteria, Operator::And)
}

/// At least one child must hold.
pub fn or<I>(criteria: I) -> Criterion
where
    I: IntoIterator,
    I::Item: Into<Option<Criterion>>,
{
    logical(criteria, Operator::Or)
}

/// Field equals any of `values`: one `Eq` leaf per value, joined by `Or`.
///
/// With `ignore_null = true` an empty collection yields `None`; otherwise an
/// empty `Or` is returned.
pub fn in_<I>(field: impl Into<String>, values: I, ignore_null: bool) -> Option<Criterion>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    expand(field, values, Operator::Eq, Operator::Or, ignore_null)
}

/// Field equals none of `values`: one `Ne` leaf per value, joined by `And`.
pub fn not_in<I>(field: impl Into<String>, values: I, ignore_null: bool) -> Option<Criterion>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    expand(field, values, Operator::Ne, Operator::And, ignore_null)
}

/// Collection-valued field contains any of `values`.
///
/// Plain fields (`tags`) hold scalar elements and use `IsMember`. Dotted
/// paths (`addresses.city`) address a property of object elements and use
/// `Eq`. Never elided.
pub fn has_members<I>(field: impl Into<String>, values: I) -> Criterion
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let field = field.into();
    let operator = if field.contains(PATH_SEPARATOR) {
        Operator::Eq
    } else {
        Operator::IsMember
    };
    let children: Vec<Criterion> = values
        .into_iter()
        .map(|value| SimpleExpression::new(field.as_str(), value.into(), operator).into())
        .collect();
    LogicalExpression::new(children, Operator::Or).into()
}

fn simple(
    field: impl Into<String>,
    value: Value,
    operator: Operator,
    ignore_null: bool,
) -> Option<Criterion> {
    if ignore_null && value.is_empty() {
        return None;
    }
    Some(SimpleExpression::new(field, value, operator).into())
}

fn logical<I>(criteria: I, operator: Operator) -> Criterion
where
    I: IntoIterator,
    I::Item: Into<Option<Criterion>>,
{
    let children: Vec<Criterion> = criteria
        .into_iter()
        .filter_map(Into::<Option<Criterion>>::into)
        .collect();
    LogicalExpression::new(children, operator).into()
}

fn expand<I>(
    field: impl Into<String>,
    values: I,
    leaf: Operator,
    join: Operator,
    ignore_null: bool,
) -> Option<Criterion>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let field = field.into();
    let children: Vec<Criterion> = values
        .into_iter()
        .map(|value| SimpleExpression::new(field.as_str(), value.into(), leaf).into())
        .collect();
    if ignore_null && children.is_empty() {
        return None;
    }
    Some(LogicalExpression::new(children, join).into())
}
