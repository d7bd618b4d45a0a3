//! Database schema SQL.

/// Override rules and per-entity metadata records.
pub const METATAG_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS metatag_path_rules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path_pattern TEXT NOT NULL,
    domains_json TEXT,
    language TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    image TEXT,
    weight INTEGER NOT NULL DEFAULT 0,
    status INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_rules_status_weight ON metatag_path_rules(status, weight);

CREATE TABLE IF NOT EXISTS metatag_entity_records (
    entity_type TEXT NOT NULL,
    entity_id INTEGER NOT NULL,
    title TEXT,
    description TEXT,
    image TEXT,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (entity_type, entity_id)
);
"#;

/// Content mirror: entities, reference fields and assets the provider serves.
pub const CONTENT_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS assets (
    id TEXT PRIMARY KEY,
    uri TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS content_items (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT,
    image TEXT,
    published INTEGER NOT NULL DEFAULT 1,
    created INTEGER NOT NULL,
    path TEXT NOT NULL UNIQUE,
    canonical_url TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_content_created ON content_items(published, created);

CREATE TABLE IF NOT EXISTS taxonomy_terms (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    image TEXT,
    path TEXT NOT NULL UNIQUE,
    canonical_url TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS field_definitions (
    entity_type TEXT NOT NULL,
    field_name TEXT NOT NULL,
    field_type TEXT NOT NULL,
    target_type TEXT,
    PRIMARY KEY (entity_type, field_name)
);

CREATE TABLE IF NOT EXISTS entity_references (
    content_id INTEGER NOT NULL REFERENCES content_items(id) ON DELETE CASCADE,
    field_name TEXT NOT NULL,
    target_id INTEGER NOT NULL,
    PRIMARY KEY (content_id, field_name, target_id)
);

CREATE INDEX IF NOT EXISTS idx_references_target ON entity_references(target_id);
"#;
