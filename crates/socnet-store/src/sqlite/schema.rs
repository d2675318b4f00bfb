//! SQLite schema for the document collections

use crate::error::Result;
use rusqlite::Connection;
use socnet_common::Collection;

/// Create one table per collection plus the owner index on statuses
pub fn init_schema(conn: &Connection) -> Result<()> {
    for collection in Collection::all() {
        conn.execute(
            &format!(
                r#"
                CREATE TABLE IF NOT EXISTS "{}" (
                    _id TEXT PRIMARY KEY NOT NULL,
                    body TEXT NOT NULL  -- JSON document, including _id
                )
                "#,
                collection.as_str()
            ),
            [],
        )?;
    }

    // Cascade deletes and owner lookups filter statuses by user_id
    conn.execute(
        &format!(
            r#"CREATE INDEX IF NOT EXISTS idx_status_owner ON "{}" (json_extract(body, '$.user_id'))"#,
            Collection::Statuses.as_str()
        ),
        [],
    )?;

    Ok(())
}

/// Drop and recreate every collection
pub fn reset_schema(conn: &Connection) -> Result<()> {
    for collection in Collection::all() {
        conn.execute(
            &format!(r#"DROP TABLE IF EXISTS "{}""#, collection.as_str()),
            [],
        )?;
    }
    init_schema(conn)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_init_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"user_collection".to_string()));
        assert!(tables.contains(&"status_collection".to_string()));
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        assert!(init_schema(&conn).is_ok());
    }

    #[test]
    fn test_reset_schema_empties_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            r#"INSERT INTO "user_collection" (_id, body) VALUES ('a', '{"_id":"a"}')"#,
            [],
        )
        .unwrap();

        reset_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(r#"SELECT COUNT(*) FROM "user_collection""#, [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
