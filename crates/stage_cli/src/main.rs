//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stage_core` linkage.
//! - Exercise one in-memory CRUD + criteria round trip with deterministic output.

use rusqlite::Row;
use stage_core::restrictions::{count, eq, gte, has_member, like, sum};
use stage_core::{
    open_db_in_memory, BaseService, Criteria, Entity, EntityId, Migration, PageRequest,
    SqliteRepository, Value,
};
use std::process::ExitCode;

const MIGRATIONS: &[Migration] = &[Migration::new(
    1,
    "CREATE TABLE members (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        level INTEGER NOT NULL,
        roles TEXT NOT NULL DEFAULT '[]'
    );",
)];

#[derive(Debug, Clone)]
struct Member {
    id: Option<EntityId>,
    name: String,
    level: i64,
    roles: String,
}

impl Member {
    fn new(name: &str, level: i64, roles: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            level,
            roles: roles.to_string(),
        }
    }
}

impl Entity for Member {
    const TABLE: &'static str = "members";
    const COLUMNS: &'static [&'static str] = &["name", "level", "roles"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.as_str()),
            Value::from(self.level),
            Value::from(self.roles.as_str()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            level: row.get("level")?,
            roles: row.get("roles")?,
        })
    }
}

fn main() -> ExitCode {
    println!("stage_core ping={}", stage_core::ping());
    println!("stage_core version={}", stage_core::core_version());

    match run_smoke() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("smoke run failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory(MIGRATIONS)?;
    let service = BaseService::new(SqliteRepository::<Member>::try_new(&conn)?);

    service.batch_save(vec![
        Member::new("ada", 3, r#"["admin","dev"]"#),
        Member::new("brook", 1, r#"["dev"]"#),
        Member::new("cyd", 2, r#"[]"#),
    ])?;

    let name_filter: Option<&str> = None;
    let criteria = Criteria::new()
        .add(like("name", name_filter, true))
        .add(gte("level", 2, true))
        .add(has_member("roles", "admin", true))
        .add(eq("name", "", true));
    let page = service.find_page(&criteria, &PageRequest::default())?;
    let totals: Vec<String> = service
        .select(&Criteria::new().select(count("*")).select(sum("level")))?
        .iter()
        .map(ToString::to_string)
        .collect();

    println!("members totals=[{}] matched={}", totals.join(", "), page.total);
    for member in &page.items {
        println!("member id={:?} name={}", member.id, member.name);
    }
    Ok(())
}
