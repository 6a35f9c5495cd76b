//! Mirror schema migrations.
//!
//! Partitions are plain SQLite tables, created by an ordered, additive-only
//! migration list. The applied version is mirrored to `PRAGMA user_version`,
//! so re-opening a database created by an older build upgrades it in place
//! without touching existing rows. `feedback` arrived in v2; installations
//! created at v1 gain the partition on the next open.

use crate::error::{Result, StoreError};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: "
            CREATE TABLE IF NOT EXISTS departments (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS courses (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS lessons (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS events (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS flashcards (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS quizzes (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS subjects (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS assignments (id TEXT PRIMARY KEY, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS notifications (key INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL);
            CREATE TABLE IF NOT EXISTS updates (key INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL);
        ",
    },
    Migration {
        version: 2,
        sql: "
            CREATE TABLE IF NOT EXISTS feedback (id TEXT PRIMARY KEY, body TEXT NOT NULL);
        ",
    },
];

/// Latest migration version known by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply(conn: &mut Connection) -> Result<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(StoreError::Backend(format!(
            "mirror schema version {current} is newer than supported version {latest}"
        )));
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply(&mut conn).unwrap();
        apply(&mut conn).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn v1_database_is_upgraded_without_losing_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        // Simulate an installation created before the feedback partition
        // existed.
        conn.execute_batch(MIGRATIONS[0].sql).unwrap();
        conn.execute_batch("PRAGMA user_version = 1;").unwrap();
        conn.execute(
            "INSERT INTO lessons (id, body) VALUES ('L1', '{\"id\":\"L1\"}')",
            [],
        )
        .unwrap();

        apply(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM lessons", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        // The feedback partition now exists.
        conn.execute(
            "INSERT INTO feedback (id, body) VALUES ('f1', '{}')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
        assert!(apply(&mut conn).is_err());
    }
}
