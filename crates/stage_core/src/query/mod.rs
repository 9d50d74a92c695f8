//! Criteria expression model and its SQL translation.
//!
//! # Responsibility
//! - Build small immutable predicate and selector trees.
//! - Elide predicates for absent input under the `ignore_null` policy.
//! - Translate trees into parameterized SQLite fragments.
//!
//! # Invariants
//! - An elided predicate is `None` and means "no constraint".
//! - Translation never interpolates operand values into SQL text.

pub mod criteria;
pub mod criterion;
pub mod restrictions;
pub mod sql;
pub mod value;

pub use criteria::Criteria;
pub use criterion::{Criterion, LogicalExpression, Operator, SimpleExpression, SimpleSelector};
pub use sql::{QueryError, QueryResult, SqlFragment};
pub use value::Value;
