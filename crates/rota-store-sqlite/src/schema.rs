//! SQL schema for the rotation store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS collaborators (
    collaborator_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    password_hash   TEXT NOT NULL,   -- argon2 PHC string
    role            TEXT NOT NULL DEFAULT 'member',
    created_at      TEXT NOT NULL    -- RFC 3339 UTC, fixed precision
);

-- One row per Friday. collaborator_id has no foreign key:
-- removing a collaborator leaves their history in place.
CREATE TABLE IF NOT EXISTS assignments (
    assignment_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    date            TEXT NOT NULL UNIQUE,   -- YYYY-MM-DD
    collaborator_id INTEGER NOT NULL,
    event_id        TEXT,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS collaborators_created_idx ON collaborators(created_at);

PRAGMA user_version = 1;
";
