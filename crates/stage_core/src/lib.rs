//! Generic CRUD service layer and criteria query builder.
//! Services delegate to repositories; criteria elide absent input.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, Migration};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{Entity, EntityId};
pub use model::page::{PageRequest, SimplePage};
pub use query::restrictions;
pub use query::{
    Criteria, Criterion, LogicalExpression, Operator, QueryError, SimpleExpression,
    SimpleSelector, Value,
};
pub use repo::base_repo::{RepoError, RepoResult, Repository, SqliteRepository};
pub use service::base_service::BaseService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
