//! Persistable record contract.
//!
//! # Responsibility
//! - Describe how a record maps onto one SQLite table.
//! - Expose the surrogate id used by generic CRUD paths.
//!
//! # Invariants
//! - `COLUMNS` and `values()` have the same length and order.
//! - `COLUMNS` never contains `ID_COLUMN`.
//! - A record without an id has not been persisted yet.

use crate::query::Value;
use rusqlite::Row;

/// Surrogate primary key of every entity table.
pub type EntityId = i64;

/// Table mapping for records handled by the generic repository.
pub trait Entity: Sized {
    /// Table name. Must be a plain SQL identifier.
    const TABLE: &'static str;
    /// Integer primary key column.
    const ID_COLUMN: &'static str = "id";
    /// Non-key columns, in bind order.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<EntityId>;

    fn set_id(&mut self, id: EntityId);

    /// Column values matching `COLUMNS` order.
    fn values(&self) -> Vec<Value>;

    /// Rebuilds a record from a row selected with `ID_COLUMN` and `COLUMNS`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}
