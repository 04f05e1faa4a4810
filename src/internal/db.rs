//! Database connection and schema bootstrap.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

// `include_str!` expands the schema at compile time, so the `.sql` file is
// not needed at runtime.
const INIT_SQL: &str = include_str!("../../sql/init.sql");

/// Connect to the database at `url` and ensure the schema exists.
///
/// The init script only contains `IF NOT EXISTS` statements, so running it
/// on every startup is safe.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(url).await?;
    db.execute_unprepared(INIT_SQL).await?;
    Ok(db)
}

/// Connect to a fresh in-memory SQLite database. Test helper.
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    connect("sqlite::memory:").await
}
