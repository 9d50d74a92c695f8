//! Generic repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide standard CRUD and batch APIs for any `Entity`.
//! - Run criteria-driven reads (filtered lists, counts, aggregates).
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Lookups of a missing id return `Ok(None)`, never an error.
//! - Batch writes run in one transaction: all rows or none.
//! - Operand values are always bound parameters.

use crate::db::DbError;
use crate::model::entity::{Entity, EntityId};
use crate::model::page::PageRequest;
use crate::query::sql::{selector_to_sql, where_clause};
use crate::query::{Criteria, QueryError, SimpleSelector, Value};
use log::{debug, info};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Query(QueryError),
    NotFound(EntityId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Standard persistence operations over one entity type.
pub trait Repository<E: Entity> {
    fn find_all(&self) -> RepoResult<Vec<E>>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;
    /// Inserts when `entity` has no id, otherwise inserts-or-replaces by id.
    fn save(&self, entity: E) -> RepoResult<E>;
    /// `save` followed by flushing dirty pages to the database file.
    fn save_and_flush(&self, entity: E) -> RepoResult<E>;
    fn save_all(&self, entities: Vec<E>) -> RepoResult<Vec<E>>;
    fn delete_by_id(&self, id: EntityId) -> RepoResult<()>;
    /// Deletes the given records. Records without an id are skipped.
    fn delete_all(&self, entities: &[E]) -> RepoResult<()>;
    /// Lists records matching `criteria`, ordered by id.
    fn find_by_criteria(
        &self,
        criteria: &Criteria,
        page: Option<&PageRequest>,
    ) -> RepoResult<Vec<E>>;
    fn count(&self, criteria: &Criteria) -> RepoResult<u64>;
    /// Evaluates one aggregate selector over matching records.
    fn aggregate(&self, selector: &SimpleSelector, criteria: &Criteria) -> RepoResult<Value>;
    /// Evaluates every selector on `criteria` in one query, in selector order.
    /// No selectors yields an empty list without touching storage.
    fn select(&self, criteria: &Criteria) -> RepoResult<Vec<Value>>;
}

/// SQLite-backed repository for any `Entity`.
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: Entity> SqliteRepository<'conn, E> {
    /// Constructs a repository after checking the entity table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_entity_table_ready::<E>(conn)?;
        Ok(Self {
            conn,
            _entity: PhantomData,
        })
    }

    fn select_sql() -> String {
        let mut columns = Vec::with_capacity(E::COLUMNS.len() + 1);
        columns.push(E::ID_COLUMN);
        columns.extend_from_slice(E::COLUMNS);
        format!("SELECT {} FROM {}", columns.join(", "), E::TABLE)
    }

    fn query_entities(&self, sql: &str, params: &[Value]) -> RepoResult<Vec<E>> {
        debug!("event=repo_query module=repo table={} sql={}", E::TABLE, sql);
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(E::from_row(row)?);
        }
        Ok(entities)
    }
}

impl<E: Entity> Repository<E> for SqliteRepository<'_, E> {
    fn find_all(&self) -> RepoResult<Vec<E>> {
        let sql = format!("{} ORDER BY {} ASC", Self::select_sql(), E::ID_COLUMN);
        self.query_entities(&sql, &[])
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        let sql = format!("{} WHERE {} = ?1", Self::select_sql(), E::ID_COLUMN);
        let entity = self
            .conn
            .query_row(&sql, [id], E::from_row)
            .optional()?;
        Ok(entity)
    }

    fn save(&self, entity: E) -> RepoResult<E> {
        save_on(self.conn, entity)
    }

    fn save_and_flush(&self, entity: E) -> RepoResult<E> {
        let saved = save_on(self.conn, entity)?;
        self.conn.cache_flush()?;
        Ok(saved)
    }

    fn save_all(&self, entities: Vec<E>) -> RepoResult<Vec<E>> {
        let started_at = Instant::now();
        let count = entities.len();

        let tx = self.conn.unchecked_transaction()?;
        let mut saved = Vec::with_capacity(count);
        for entity in entities {
            saved.push(save_on(&tx, entity)?);
        }
        tx.commit()?;

        info!(
            "event=repo_save_all module=repo status=ok table={} count={} duration_ms={}",
            E::TABLE,
            count,
            started_at.elapsed().as_millis()
        );
        Ok(saved)
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1;", E::TABLE, E::ID_COLUMN),
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!(
            "event=repo_delete module=repo status=ok table={} id={}",
            E::TABLE,
            id
        );
        Ok(())
    }

    fn delete_all(&self, entities: &[E]) -> RepoResult<()> {
        let started_at = Instant::now();
        let sql = format!("DELETE FROM {} WHERE {} = ?1;", E::TABLE, E::ID_COLUMN);

        let tx = self.conn.unchecked_transaction()?;
        let mut deleted = 0_usize;
        for id in entities.iter().filter_map(E::id) {
            deleted += tx.execute(&sql, [id])?;
        }
        tx.commit()?;

        info!(
            "event=repo_delete_all module=repo status=ok table={} requested={} deleted={} duration_ms={}",
            E::TABLE,
            entities.len(),
            deleted,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn find_by_criteria(
        &self,
        criteria: &Criteria,
        page: Option<&PageRequest>,
    ) -> RepoResult<Vec<E>> {
        let filter = where_clause(criteria)?;
        let mut sql = format!(
            "{}{} ORDER BY {} ASC",
            Self::select_sql(),
            filter.sql,
            E::ID_COLUMN
        );
        let mut params = filter.params;

        if let Some(page) = page {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::Integer(i64::from(page.limit())));
            params.push(Value::Integer(offset_to_i64(page.offset())?));
        }

        self.query_entities(&sql, &params)
    }

    fn count(&self, criteria: &Criteria) -> RepoResult<u64> {
        let filter = where_clause(criteria)?;
        let sql = format!("SELECT COUNT(*) FROM {}{}", E::TABLE, filter.sql);
        debug!("event=repo_count module=repo table={} sql={}", E::TABLE, sql);

        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(filter.params.iter()), |row| row.get(0))?;
        u64::try_from(total).map_err(|_| RepoError::InvalidData(format!("negative count {total}")))
    }

    fn aggregate(&self, selector: &SimpleSelector, criteria: &Criteria) -> RepoResult<Value> {
        let projection = selector_to_sql(selector)?;
        let filter = where_clause(criteria)?;
        let sql = format!("SELECT {projection} FROM {}{}", E::TABLE, filter.sql);
        debug!(
            "event=repo_aggregate module=repo table={} sql={}",
            E::TABLE,
            sql
        );

        let value = self
            .conn
            .query_row(&sql, params_from_iter(filter.params.iter()), |row| {
                row.get::<_, Value>(0)
            })?;
        Ok(value)
    }

    fn select(&self, criteria: &Criteria) -> RepoResult<Vec<Value>> {
        if criteria.selectors().is_empty() {
            return Ok(Vec::new());
        }
        let projections = criteria
            .selectors()
            .iter()
            .map(selector_to_sql)
            .collect::<Result<Vec<_>, _>>()?;
        let filter = where_clause(criteria)?;
        let sql = format!(
            "SELECT {} FROM {}{}",
            projections.join(", "),
            E::TABLE,
            filter.sql
        );
        debug!(
            "event=repo_select module=repo table={} selectors={} sql={}",
            E::TABLE,
            projections.len(),
            sql
        );

        let values = self
            .conn
            .query_row(&sql, params_from_iter(filter.params.iter()), |row| {
                (0..projections.len())
                    .map(|index| row.get::<_, Value>(index))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?;
        Ok(values)
    }
}

fn save_on<E: Entity>(conn: &Connection, mut entity: E) -> RepoResult<E> {
    let values = entity.values();
    if values.len() != E::COLUMNS.len() {
        return Err(RepoError::InvalidData(format!(
            "{} produced {} values for {} columns",
            E::TABLE,
            values.len(),
            E::COLUMNS.len()
        )));
    }

    match entity.id() {
        None => {
            conn.execute(&insert_sql::<E>(), params_from_iter(values.iter()))?;
            entity.set_id(conn.last_insert_rowid());
        }
        Some(id) => {
            let mut params = Vec::with_capacity(values.len() + 1);
            params.push(Value::Integer(id));
            params.extend(values);
            conn.execute(&upsert_sql::<E>(), params_from_iter(params.iter()))?;
        }
    }

    Ok(entity)
}

fn insert_sql<E: Entity>() -> String {
    if E::COLUMNS.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES;", E::TABLE);
    }
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        E::TABLE,
        E::COLUMNS.join(", "),
        placeholders(E::COLUMNS.len())
    )
}

fn upsert_sql<E: Entity>() -> String {
    let mut columns = Vec::with_capacity(E::COLUMNS.len() + 1);
    columns.push(E::ID_COLUMN);
    columns.extend_from_slice(E::COLUMNS);

    let conflict_action = if E::COLUMNS.is_empty() {
        "DO NOTHING".to_string()
    } else {
        let assignments: Vec<String> = E::COLUMNS
            .iter()
            .map(|column| format!("{column} = excluded.{column}"))
            .collect();
        format!("DO UPDATE SET {}", assignments.join(", "))
    };

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {};",
        E::TABLE,
        columns.join(", "),
        placeholders(columns.len()),
        E::ID_COLUMN,
        conflict_action
    )
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn offset_to_i64(offset: u64) -> RepoResult<i64> {
    i64::try_from(offset)
        .map_err(|_| RepoError::InvalidData(format!("page offset {offset} overflows")))
}

fn ensure_entity_table_ready<E: Entity>(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, E::TABLE)? {
        return Err(RepoError::MissingRequiredTable(E::TABLE));
    }

    let required = std::iter::once(E::ID_COLUMN).chain(E::COLUMNS.iter().copied());
    for column in required {
        if !table_has_column(conn, E::TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: E::TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
