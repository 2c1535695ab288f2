//! SQL schema for the crew SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per person. Rows are updated in place and hard-deleted.
-- rowid gives insertion order for listing.
CREATE TABLE IF NOT EXISTS people (
    person_id       TEXT PRIMARY KEY,
    name            TEXT NOT NULL CHECK (length(trim(name)) > 0),
    department      TEXT,
    specialty       TEXT,
    role_level      TEXT,
    location        TEXT,
    short_bio       TEXT,
    how_i_got_into  TEXT,
    hobbies         TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    funny_fact      TEXT,
    start_date      TEXT,                         -- verbatim, not parsed
    image_url       TEXT,
    created_at      TEXT NOT NULL,                -- RFC 3339 UTC
    updated_at      TEXT NOT NULL                 -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT` so [`crate::encode::RawPerson`] can
/// read rows positionally.
pub const PERSON_COLUMNS: &str = "person_id, name, department, specialty, \
  role_level, location, short_bio, how_i_got_into, hobbies, funny_fact, \
  start_date, image_url, created_at, updated_at";
