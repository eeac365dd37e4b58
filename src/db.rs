//! SQLite Bootstrap
//!
//! Opens the database file, creates the schema, and hands out the shared
//! connection the stores run their transactions on. Keeping a single
//! connection behind a `parking_lot::Mutex` serializes writers, and every
//! store method is synchronous so a transaction can never straddle an
//! await point.

use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;

pub type SharedConnection = Arc<Mutex<Connection>>;

/// Open the database file and initialize the schema.
pub fn open(db_path: &str) -> Result<SharedConnection> {
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sweets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            category TEXT NOT NULL,
            price REAL NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sweets_category ON sweets(category);",
    )?;

    Ok(())
}
