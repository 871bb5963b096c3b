/// SQL-schema för Byggdesk
/// Nyckel-värde-lagring med JSON-blobbar, en rad per lagringsnyckel

pub const SCHEMA_VERSION: i32 = 1;

pub const CREATE_TABLES: &str = r#"
-- Migreringshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Användardata, en JSON-blob per nyckel ("projects", "userRoles", ...)
CREATE TABLE IF NOT EXISTS storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Revision per nyckel, överlever att nyckeln tas bort
CREATE TABLE IF NOT EXISTS storage_revisions (
    key TEXT PRIMARY KEY,
    revision INTEGER NOT NULL DEFAULT 0
);

-- Standardposter, skrivs en gång vid migrering och ändras aldrig
CREATE TABLE IF NOT EXISTS seed_records (
    key TEXT NOT NULL,
    position INTEGER NOT NULL,
    record_id TEXT NOT NULL,
    record TEXT NOT NULL,
    PRIMARY KEY (key, position),
    UNIQUE (key, record_id)
);
"#;
