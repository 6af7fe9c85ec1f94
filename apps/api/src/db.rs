use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Schema statements applied at every startup; all are idempotent.
///
/// `candidates` holds one row per processed resume with the aggregated profile;
/// `work_experience` holds the per-role child rows and cascades on delete.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS candidates (
        id                      INTEGER PRIMARY KEY AUTOINCREMENT,
        filename                TEXT NOT NULL UNIQUE,
        name                    TEXT,
        age                     INTEGER,
        total_months_experience INTEGER NOT NULL DEFAULT 0,
        total_companies         INTEGER NOT NULL DEFAULT 0,
        roles_served            TEXT,
        skillset                TEXT,
        high_confidence_skills  TEXT,
        low_confidence_skills   TEXT,
        tech_stack              TEXT,
        general_proficiency     TEXT,
        ai_summary              TEXT,
        created_at              TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS work_experience (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        candidate_id      INTEGER NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
        company_name      TEXT NOT NULL,
        role              TEXT NOT NULL,
        months_of_service INTEGER NOT NULL DEFAULT 0,
        skillset          TEXT NOT NULL DEFAULT '',
        tech_stack        TEXT NOT NULL DEFAULT '',
        projects          TEXT NOT NULL DEFAULT '[]',
        is_internship     INTEGER NOT NULL DEFAULT 0,
        has_overlap       INTEGER NOT NULL DEFAULT 0,
        start_date        TEXT NOT NULL DEFAULT '',
        end_date          TEXT NOT NULL DEFAULT '',
        description       TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_work_experience_candidate
        ON work_experience (candidate_id)
    "#,
];

/// Creates the SQLite connection pool and applies the schema.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to SQLite...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    info!("SQLite connection pool established, schema applied");
    Ok(pool)
}
