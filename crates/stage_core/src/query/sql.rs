//! Translation of criteria into parameterized SQLite fragments.
//!
//! # Responsibility
//! - Render criterion trees as `WHERE`-ready SQL with positional binds.
//! - Render aggregate selectors as projection expressions.
//!
//! # Invariants
//! - Values are always bound, never interpolated.
//! - Field names are validated before they reach SQL text.
//! - Bind order follows child order of the criterion tree.

use super::criterion::{Criterion, LogicalExpression, Operator, SimpleExpression, SimpleSelector};
use super::criteria::Criteria;
use super::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static FIELD_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("valid field path regex")
});

const ALWAYS_TRUE_SQL: &str = "1 = 1";
const ALWAYS_FALSE_SQL: &str = "1 = 0";
const COUNT_ALL_FIELD: &str = "*";
const LIKE_ESCAPE: char = '\\';

pub type QueryResult<T> = Result<T, QueryError>;

/// Translation failure for a criterion or selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidField(String),
    UnsupportedOperator(Operator),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField(field) => write!(f, "invalid field name `{field}`"),
            Self::UnsupportedOperator(op) => {
                write!(f, "operator {op} is not supported in this position")
            }
        }
    }
}

impl Error for QueryError {}

/// SQL text plus its positional bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    fn text(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    fn bound(sql: impl Into<String>, value: Value) -> Self {
        Self {
            sql: sql.into(),
            params: vec![value],
        }
    }
}

/// Renders a predicate tree.
pub fn criterion_to_sql(criterion: &Criterion) -> QueryResult<SqlFragment> {
    match criterion {
        Criterion::Simple(expr) => simple_to_sql(expr),
        Criterion::Logical(expr) => logical_to_sql(expr),
    }
}

/// Renders an aggregate projection such as `COUNT(DISTINCT email)`.
///
/// `count("*")` renders `COUNT(*)`; `*` is rejected for other aggregates.
pub fn selector_to_sql(selector: &SimpleSelector) -> QueryResult<String> {
    if selector.operator() == Operator::Count && selector.field() == COUNT_ALL_FIELD {
        return Ok("COUNT(*)".to_string());
    }
    let column = field_to_sql(selector.field())?;
    match selector.operator() {
        Operator::Count => Ok(format!("COUNT({column})")),
        Operator::CountDistinct => Ok(format!("COUNT(DISTINCT {column})")),
        Operator::Sum => Ok(format!("SUM({column})")),
        other => Err(QueryError::UnsupportedOperator(other)),
    }
}

/// Validates a field name and renders it as a column reference.
///
/// `profile.address.city` becomes `json_extract(profile, '$.address.city')`.
pub fn field_to_sql(field: &str) -> QueryResult<String> {
    if !FIELD_PATH_RE.is_match(field) {
        return Err(QueryError::InvalidField(field.to_string()));
    }
    match field.split_once('.') {
        Some((root, path)) => Ok(format!("json_extract({root}, '$.{path}')")),
        None => Ok(field.to_string()),
    }
}

/// Renders ` WHERE ...` for collected criteria, or an empty fragment.
pub fn where_clause(criteria: &Criteria) -> QueryResult<SqlFragment> {
    match criteria.predicate() {
        Some(predicate) => {
            let fragment = criterion_to_sql(&predicate)?;
            Ok(SqlFragment {
                sql: format!(" WHERE {}", fragment.sql),
                params: fragment.params,
            })
        }
        None => Ok(SqlFragment::default()),
    }
}

fn simple_to_sql(expr: &SimpleExpression) -> QueryResult<SqlFragment> {
    let column = field_to_sql(expr.field())?;
    let value = expr.value().clone();

    let fragment = match expr.operator() {
        Operator::Eq if value.is_null() => SqlFragment::text(format!("{column} IS NULL")),
        Operator::Ne if value.is_null() => SqlFragment::text(format!("{column} IS NOT NULL")),
        Operator::Eq => SqlFragment::bound(format!("{column} = ?"), value),
        Operator::Ne => SqlFragment::bound(format!("{column} <> ?"), value),
        Operator::Gt => SqlFragment::bound(format!("{column} > ?"), value),
        Operator::Lt => SqlFragment::bound(format!("{column} < ?"), value),
        Operator::Gte => SqlFragment::bound(format!("{column} >= ?"), value),
        Operator::Lte => SqlFragment::bound(format!("{column} <= ?"), value),
        Operator::Like => match value.as_text() {
            Some(text) => SqlFragment::bound(
                format!("{column} LIKE ? ESCAPE '{LIKE_ESCAPE}'"),
                Value::Text(format!("%{}%", escape_like(text))),
            ),
            // NULL pattern matches no row.
            None => SqlFragment::bound(format!("{column} LIKE ?"), Value::Null),
        },
        Operator::IsNull => SqlFragment::text(format!("{column} IS NULL")),
        Operator::IsMember => SqlFragment::bound(
            format!("EXISTS (SELECT 1 FROM json_each({column}) WHERE json_each.value = ?)"),
            value,
        ),
        other => return Err(QueryError::UnsupportedOperator(other)),
    };
    Ok(fragment)
}

/// Escapes LIKE wildcards so the operand matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

fn logical_to_sql(expr: &LogicalExpression) -> QueryResult<SqlFragment> {
    let joiner = match expr.operator() {
        Operator::And => " AND ",
        Operator::Or => " OR ",
        other => return Err(QueryError::UnsupportedOperator(other)),
    };

    if expr.is_empty() {
        return Ok(SqlFragment::text(if expr.operator() == Operator::And {
            ALWAYS_TRUE_SQL
        } else {
            ALWAYS_FALSE_SQL
        }));
    }

    let mut parts = Vec::with_capacity(expr.len());
    let mut params = Vec::new();
    for child in expr.children() {
        let fragment = criterion_to_sql(child)?;
        parts.push(format!("({})", fragment.sql));
        params.extend(fragment.params);
    }

    Ok(SqlFragment {
        sql: parts.join(joiner),
        params,
    })
}
