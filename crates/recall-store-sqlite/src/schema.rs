//! SQL schema for the Recall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Reference columns on `cs_record` and `cs_tag.superior` carry no foreign-key
/// constraint: a dangling reference loads as absent. The only foreign key is
/// `cs_record_tags.record_id`, which needs `foreign_keys` on for its cascade.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS pay_platform (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier  TEXT,
    label       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pay_method (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier  TEXT,
    label       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pay_account (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier  TEXT,              -- card issuer and tail number
    label       TEXT,
    ac_type     TEXT,
    in_use      INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cs_platform (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier  TEXT,
    label       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cs_tag (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier  TEXT,
    label       TEXT,
    superior    INTEGER,           -- parent tag id, unchecked
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cs_record (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    pay_platform INTEGER,
    pay_method   INTEGER,
    pay_account  INTEGER,
    cs_sum       TEXT NOT NULL DEFAULT '0',   -- exact decimal as text
    cs_date      TEXT,                        -- ISO 8601 calendar date
    cs_platform  INTEGER,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- Links are removed together with their record; tags are never touched.
CREATE TABLE IF NOT EXISTS cs_record_tags (
    record_id   INTEGER NOT NULL REFERENCES cs_record(id) ON DELETE CASCADE,
    tag_id      INTEGER NOT NULL,
    PRIMARY KEY (record_id, tag_id)
);

CREATE INDEX IF NOT EXISTS cs_record_tags_tag_idx ON cs_record_tags(tag_id);

PRAGMA user_version = 1;
";
