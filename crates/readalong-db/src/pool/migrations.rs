//! Embedded schema

use sqlx::PgPool;
use tracing::info;

/// Ordered schema scripts. Every statement is `IF NOT EXISTS`, so re-running is a no-op.
const MIGRATIONS: &[(&str, &str)] = &[(
    "0001_discussion",
    include_str!("../../migrations/0001_discussion.sql"),
)];

/// Apply the schema to the connected database
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (name, sql) in MIGRATIONS {
        sqlx::raw_sql(sql).execute(pool).await?;
        info!(migration = %name, "Applied migration");
    }
    Ok(())
}
