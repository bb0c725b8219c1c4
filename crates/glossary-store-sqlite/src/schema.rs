//! SQL schema for the glossary SQLite store.
//!
//! Executed once at connection startup and stamped via `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids of deleted terms from being handed out again.
-- The UNIQUE constraint doubles as the lookup index on `term`.
CREATE TABLE IF NOT EXISTS terms (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    term        TEXT NOT NULL UNIQUE,
    definition  TEXT NOT NULL,
    source      TEXT,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at  TEXT             -- NULL until the first update
);

PRAGMA user_version = 1;
";
