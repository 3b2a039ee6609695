//! `SQLite` schema definitions for the key-value store.

/// Table holding one JSON text value per key.
pub const CREATE_ITEMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS items (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// Index used by `stats` to find the most recent write.
pub const CREATE_UPDATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_items_updated_at ON items(updated_at DESC)
";

/// Internal bookkeeping (schema version), kept apart from user items.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_ITEMS_TABLE,
    CREATE_UPDATED_AT_INDEX,
    CREATE_METADATA_TABLE,
];
