//! SQLite-backed rule store and content provider.
//!
//! One database holds the override rules, the per-entity metadata records and
//! a mirror of the content system (items, terms, term references, assets).

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::reference::ReferenceFieldIndex;
use crate::schema::{CONTENT_SCHEMA_SQL, METATAG_SCHEMA_SQL};
use crate::types::*;
use metatag_core::{
    AssetRef, ContentItem, ContentProvider, Entity, EntityMetadataRecord, EntityType, Error,
    OverrideRule, RequestContext, Result, RuleFields, RuleStore, Term,
};

const CONTENT_SYSTEM_PREFIX: &str = "/node/";
const TERM_SYSTEM_PREFIX: &str = "/taxonomy/term/";
const PUBLIC_SCHEME: &str = "public://";
const PUBLIC_FILES_PATH: &str = "/files/";

/// SQLite store implementing both `RuleStore` and `ContentProvider`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    references: RwLock<ReferenceFieldIndex>,
}

/// A rule row before its domain list has been parsed.
struct RuleRow {
    rule: OverrideRule,
    domains_json: Option<String>,
}

impl RuleRow {
    fn into_rule(self) -> std::result::Result<OverrideRule, serde_json::Error> {
        let mut rule = self.rule;
        if let Some(json) = self.domains_json.filter(|j| !j.trim().is_empty()) {
            rule.domains = serde_json::from_str(&json)?;
        }
        Ok(rule)
    }
}

impl SqliteStore {
    /// Open or create the store.
    ///
    /// `db_dir` is the directory (e.g., `data/db/`). The file will be `db_dir/metatag.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("metatag.db");

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;
        let references = Self::load_reference_index(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
            references: RwLock::new(references),
        };

        let stats = store.get_stats()?;
        info!(
            "SqliteStore initialized: {} rules ({} active), {} records, {} content items, {} terms, path={}",
            stats.total_rules,
            stats.active_rules,
            stats.entity_records,
            stats.content_items,
            stats.taxonomy_terms,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        let full_schema = format!("{}\n{}", METATAG_SCHEMA_SQL, CONTENT_SCHEMA_SQL);
        conn.execute_batch(&full_schema)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    fn load_reference_index(conn: &Connection) -> Result<ReferenceFieldIndex> {
        let mut stmt = conn
            .prepare("SELECT entity_type, field_name, field_type, target_type FROM field_definitions")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        let definitions: Vec<_> = rows.filter_map(|r| r.ok()).collect();
        Ok(ReferenceFieldIndex::from_definitions(definitions))
    }

    fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ---------------------------------------------------------------
    // Rules
    // ---------------------------------------------------------------

    fn row_to_rule(row: &rusqlite::Row<'_>) -> rusqlite::Result<RuleRow> {
        let status: i64 = row.get("status")?;
        let image: Option<String> = row.get("image")?;
        Ok(RuleRow {
            rule: OverrideRule {
                id: row.get("id")?,
                path_pattern: row.get("path_pattern")?,
                domains: Vec::new(),
                language: row.get::<_, Option<String>>("language")?.unwrap_or_default(),
                title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
                description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
                image: AssetRef::from_optional(image),
                weight: row.get("weight")?,
                status: status != 0,
                domains_malformed: false,
            },
            domains_json: row.get("domains_json")?,
        })
    }

    /// Run a rule query.
    ///
    /// A row whose domain list cannot be parsed is skipped when `keep_malformed`
    /// is false, and otherwise returned with no domains and `domains_malformed` set.
    fn query_rules(
        &self,
        sql: &str,
        args: &[Value],
        keep_malformed: bool,
    ) -> Result<Vec<OverrideRule>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(sql).map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), Self::row_to_rule)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut rules = Vec::new();
        for row in rows {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping unreadable rule row: {}", e);
                    continue;
                }
            };
            let mut fallback = row.rule.clone();
            match row.into_rule() {
                Ok(rule) => rules.push(rule),
                Err(e) if keep_malformed => {
                    warn!("Rule {} has a malformed domain list: {}", fallback.id, e);
                    fallback.domains_malformed = true;
                    rules.push(fallback);
                }
                Err(e) => warn!("Skipping rule {}: malformed domain list: {}", fallback.id, e),
            }
        }
        Ok(rules)
    }

    /// Ids of rules whose stored domain list cannot be parsed.
    pub fn malformed_rule_ids(&self) -> Result<Vec<i64>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, domains_json FROM metatag_path_rules \
                 WHERE domains_json IS NOT NULL ORDER BY id",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| Error::Database(e.to_string()))?;

        let ids = rows
            .filter_map(|r| r.ok())
            .filter(|(_, json)| {
                !json.trim().is_empty() && serde_json::from_str::<Vec<String>>(json).is_err()
            })
            .map(|(id, _)| id)
            .collect();
        Ok(ids)
    }

    fn encode_domains(domains: &[String]) -> Result<Option<String>> {
        if domains.is_empty() {
            Ok(None)
        } else {
            Ok(Some(serde_json::to_string(domains)?))
        }
    }

    // ---------------------------------------------------------------
    // Entity metadata records
    // ---------------------------------------------------------------

    /// Insert or replace the metadata record for an entity.
    pub fn upsert_entity_record(&self, record: &EntityMetadataRecord) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO metatag_entity_records \
             (entity_type, entity_id, title, description, image, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(entity_type, entity_id) DO UPDATE SET \
             title = excluded.title, description = excluded.description, \
             image = excluded.image, updated_at = excluded.updated_at",
            params![
                record.entity_type.as_str(),
                record.entity_id,
                record.title,
                record.description,
                record.image.as_ref().map(|i| i.as_str()),
                Self::now_millis(),
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Returns false if the entity had no record.
    pub fn delete_entity_record(&self, entity_type: EntityType, entity_id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "DELETE FROM metatag_entity_records WHERE entity_type = ?1 AND entity_id = ?2",
                params![entity_type.as_str(), entity_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    // ---------------------------------------------------------------
    // Content mirror
    // ---------------------------------------------------------------

    pub fn upsert_asset(&self, id: &str, uri: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO assets (id, uri) VALUES (?1, ?2) \
             ON CONFLICT(id) DO UPDATE SET uri = excluded.uri",
            params![id, uri],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Register a field definition and rebuild the reference index.
    pub fn register_field(&self, field: &FieldDefinition) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO field_definitions (entity_type, field_name, field_type, target_type) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(entity_type, field_name) DO UPDATE SET \
             field_type = excluded.field_type, target_type = excluded.target_type",
            params![
                field.entity_type,
                field.field_name,
                field.field_type,
                field.target_type
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        let index = Self::load_reference_index(&conn)?;
        drop(conn);

        debug!("Reference field index rebuilt: {} fields", index.len());
        *self.references.write() = index;
        Ok(())
    }

    /// Snapshot of the current reference field index.
    pub fn reference_index(&self) -> ReferenceFieldIndex {
        self.references.read().clone()
    }

    /// Insert or update a term under the given site path.
    pub fn upsert_term(&self, term: &Term, path: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO taxonomy_terms (id, name, description, image, path, canonical_url) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, \
             description = excluded.description, image = excluded.image, \
             path = excluded.path, canonical_url = excluded.canonical_url",
            params![
                term.id,
                term.name,
                term.description,
                term.image.as_ref().map(|i| i.as_str()),
                path,
                term.canonical_url,
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert or update a content item under the given site path.
    pub fn upsert_content_item(&self, item: &ContentItem, path: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO content_items \
             (id, title, body, image, published, created, path, canonical_url) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             ON CONFLICT(id) DO UPDATE SET title = excluded.title, body = excluded.body, \
             image = excluded.image, published = excluded.published, \
             created = excluded.created, path = excluded.path, \
             canonical_url = excluded.canonical_url",
            params![
                item.id,
                item.title,
                item.body,
                item.image.as_ref().map(|i| i.as_str()),
                item.published as i64,
                item.created,
                path,
                item.canonical_url,
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Replace every reference a content item holds.
    pub fn replace_references(&self, content_id: i64, references: &[ReferenceEntry]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(|e| Error::Database(e.to_string()))?;
        tx.execute(
            "DELETE FROM entity_references WHERE content_id = ?1",
            params![content_id],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        let mut added = 0;
        for reference in references {
            added += tx
                .execute(
                    "INSERT OR IGNORE INTO entity_references (content_id, field_name, target_id) \
                     VALUES (?1, ?2, ?3)",
                    params![content_id, reference.field_name, reference.target_id],
                )
                .map_err(|e| Error::Database(e.to_string()))?;
        }
        tx.commit().map_err(|e| Error::Database(e.to_string()))?;
        Ok(added)
    }

    fn row_to_content_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContentItem> {
        let published: i64 = row.get("published")?;
        Ok(ContentItem {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("body")?,
            image: AssetRef::from_optional(row.get("image")?),
            published: published != 0,
            created: row.get("created")?,
            canonical_url: row.get("canonical_url")?,
        })
    }

    fn row_to_term(row: &rusqlite::Row<'_>) -> rusqlite::Result<Term> {
        Ok(Term {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            image: AssetRef::from_optional(row.get("image")?),
            canonical_url: row.get("canonical_url")?,
        })
    }

    pub fn get_content_item(&self, id: i64) -> Result<Option<ContentItem>> {
        let conn = self.conn.lock();
        let found = conn
            .prepare_cached("SELECT * FROM content_items WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], Self::row_to_content_item)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(found)
    }

    pub fn get_term(&self, id: i64) -> Result<Option<Term>> {
        let conn = self.conn.lock();
        let found = conn
            .prepare_cached("SELECT * FROM taxonomy_terms WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], Self::row_to_term)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(found)
    }

    /// Look an entity up by its path alias, then by its system path
    /// (`/node/{id}`, `/taxonomy/term/{id}`).
    pub fn find_entity_by_path(&self, path: &str) -> Result<Option<Entity>> {
        {
            let conn = self.conn.lock();
            let item = conn
                .prepare_cached("SELECT * FROM content_items WHERE path = ?1")
                .map_err(|e| Error::Database(e.to_string()))?
                .query_row(params![path], Self::row_to_content_item)
                .optional()
                .map_err(|e| Error::Database(e.to_string()))?;
            if let Some(item) = item {
                return Ok(Some(Entity::ContentItem(item)));
            }

            let term = conn
                .prepare_cached("SELECT * FROM taxonomy_terms WHERE path = ?1")
                .map_err(|e| Error::Database(e.to_string()))?
                .query_row(params![path], Self::row_to_term)
                .optional()
                .map_err(|e| Error::Database(e.to_string()))?;
            if let Some(term) = term {
                return Ok(Some(Entity::TaxonomyTerm(term)));
            }
        }

        if let Some(id) = system_path_id(path, CONTENT_SYSTEM_PREFIX) {
            return Ok(self.get_content_item(id)?.map(Entity::ContentItem));
        }
        if let Some(id) = system_path_id(path, TERM_SYSTEM_PREFIX) {
            return Ok(self.get_term(id)?.map(Entity::TaxonomyTerm));
        }
        Ok(None)
    }

    // ---------------------------------------------------------------
    // Import
    // ---------------------------------------------------------------

    /// Load a content snapshot. Entries that fail are reported, not fatal.
    pub fn import_snapshot(&self, snapshot: &ContentSnapshot, base_url: &str) -> Result<ImportReport> {
        let base_url = base_url.trim_end_matches('/');
        let mut report = ImportReport::default();

        for asset in &snapshot.assets {
            match self.upsert_asset(&asset.id, &asset.uri) {
                Ok(()) => report.assets += 1,
                Err(e) => report.skipped.push(format!("asset {}: {}", asset.id, e)),
            }
        }

        for field in &snapshot.fields {
            match self.register_field(field) {
                Ok(()) => report.fields += 1,
                Err(e) => report.skipped.push(format!(
                    "field {}.{}: {}",
                    field.entity_type, field.field_name, e
                )),
            }
        }

        for entry in &snapshot.terms {
            let term = Term {
                id: entry.id,
                name: entry.name.clone(),
                description: entry.description.clone(),
                image: entry.image.clone(),
                canonical_url: entry
                    .canonical_url
                    .clone()
                    .unwrap_or_else(|| format!("{}{}", base_url, entry.path)),
            };
            match self.upsert_term(&term, &entry.path) {
                Ok(()) => report.terms += 1,
                Err(e) => report.skipped.push(format!("term {}: {}", entry.id, e)),
            }
        }

        for entry in &snapshot.content_items {
            let item = ContentItem {
                id: entry.id,
                title: entry.title.clone(),
                body: entry.body.clone(),
                image: entry.image.clone(),
                published: entry.published,
                created: entry.created,
                canonical_url: entry
                    .canonical_url
                    .clone()
                    .unwrap_or_else(|| format!("{}{}", base_url, entry.path)),
            };
            if let Err(e) = self.upsert_content_item(&item, &entry.path) {
                report.skipped.push(format!("content item {}: {}", entry.id, e));
                continue;
            }
            report.content_items += 1;
            match self.replace_references(entry.id, &entry.references) {
                Ok(added) => report.references += added,
                Err(e) => report
                    .skipped
                    .push(format!("references of content item {}: {}", entry.id, e)),
            }
        }

        for fields in &snapshot.rules {
            match self.create_rule(fields) {
                Ok(_) => report.rules += 1,
                Err(e) => report
                    .skipped
                    .push(format!("rule {}: {}", fields.path_pattern, e)),
            }
        }

        for record in &snapshot.records {
            match self.upsert_entity_record(record) {
                Ok(()) => report.records += 1,
                Err(e) => report.skipped.push(format!(
                    "record {}/{}: {}",
                    record.entity_type, record.entity_id, e
                )),
            }
        }

        info!(
            "Imported snapshot: {} content items, {} terms, {} references, {} rules, {} skipped",
            report.content_items,
            report.terms,
            report.references,
            report.rules,
            report.skipped.len()
        );
        Ok(report)
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    pub fn get_stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        let count = |sql: &str| -> Result<i64> {
            conn.query_row(sql, [], |row| row.get(0))
                .map_err(|e| Error::Database(e.to_string()))
        };

        Ok(StoreStats {
            total_rules: count("SELECT COUNT(*) FROM metatag_path_rules")?,
            active_rules: count("SELECT COUNT(*) FROM metatag_path_rules WHERE status = 1")?,
            entity_records: count("SELECT COUNT(*) FROM metatag_entity_records")?,
            content_items: count("SELECT COUNT(*) FROM content_items")?,
            taxonomy_terms: count("SELECT COUNT(*) FROM taxonomy_terms")?,
            assets: count("SELECT COUNT(*) FROM assets")?,
            reference_fields: self.references.read().len(),
            db_path: self.db_path.display().to_string(),
        })
    }
}

impl RuleStore for SqliteStore {
    fn list_active_rules(&self) -> Result<Vec<OverrideRule>> {
        self.query_rules("SELECT * FROM metatag_path_rules WHERE status = 1", &[], false)
    }

    fn list_rules(&self) -> Result<Vec<OverrideRule>> {
        self.query_rules("SELECT * FROM metatag_path_rules ORDER BY id ASC", &[], true)
    }

    fn get_rule(&self, id: i64) -> Result<Option<OverrideRule>> {
        let rules = self.query_rules(
            "SELECT * FROM metatag_path_rules WHERE id = ?1",
            &[Value::Integer(id)],
            true,
        )?;
        Ok(rules.into_iter().next())
    }

    fn create_rule(&self, fields: &RuleFields) -> Result<i64> {
        let fields = fields.clone().validate()?;
        let domains_json = Self::encode_domains(&fields.domains)?;
        let now = Self::now_millis();

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO metatag_path_rules \
                 (path_pattern, domains_json, language, title, description, image, weight, status, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                fields.path_pattern,
                domains_json,
                fields.language,
                fields.title,
                fields.description,
                fields.image.as_ref().map(|i| i.as_str()),
                fields.weight,
                fields.status as i64,
                now,
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!("Created rule {} for {}", id, fields.path_pattern);
        Ok(id)
    }

    fn update_rule(&self, id: i64, fields: &RuleFields) -> Result<bool> {
        let fields = fields.clone().validate()?;
        let domains_json = Self::encode_domains(&fields.domains)?;

        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE metatag_path_rules SET path_pattern = ?1, domains_json = ?2, \
                 language = ?3, title = ?4, description = ?5, image = ?6, weight = ?7, \
                 status = ?8, updated_at = ?9 WHERE id = ?10",
                params![
                    fields.path_pattern,
                    domains_json,
                    fields.language,
                    fields.title,
                    fields.description,
                    fields.image.as_ref().map(|i| i.as_str()),
                    fields.weight,
                    fields.status as i64,
                    Self::now_millis(),
                    id,
                ],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    fn delete_rule(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM metatag_path_rules WHERE id = ?1", params![id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }
}

impl ContentProvider for SqliteStore {
    fn current_entity_in_context(&self, ctx: &RequestContext) -> Result<Option<Entity>> {
        self.find_entity_by_path(&ctx.path)
    }

    fn get_entity_metadata_record(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Option<EntityMetadataRecord>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT title, description, image FROM metatag_entity_records \
                 WHERE entity_type = ?1 AND entity_id = ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![entity_type.as_str(), entity_id], |row| {
                Ok(EntityMetadataRecord {
                    entity_type,
                    entity_id,
                    title: row.get(0)?,
                    description: row.get(1)?,
                    image: AssetRef::from_optional(row.get(2)?),
                })
            })
            .optional();

        match row {
            Ok(record) => Ok(record),
            Err(
                e @ (rusqlite::Error::InvalidColumnType(..)
                | rusqlite::Error::FromSqlConversionFailure(..)),
            ) => {
                warn!(
                    "Ignoring unreadable metadata record {}/{}: {}",
                    entity_type, entity_id, e
                );
                Ok(None)
            }
            Err(e) => Err(Error::Database(e.to_string())),
        }
    }

    fn resolve_asset_url(&self, asset: &AssetRef, base_url: &str) -> Result<Option<String>> {
        let reference = asset.as_str().trim();
        if reference.is_empty() {
            return Ok(None);
        }
        if is_absolute_url(reference) {
            return Ok(Some(reference.to_string()));
        }

        let conn = self.conn.lock();
        let uri: Option<String> = conn
            .prepare_cached("SELECT uri FROM assets WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![reference], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(uri.and_then(|uri| absolute_asset_url(&uri, base_url)))
    }

    fn find_most_recent_referencing_content(&self, term_id: i64) -> Result<Option<ContentItem>> {
        let fields = self.references.read().fields_for(EntityType::ContentItem);
        if fields.is_empty() {
            return Ok(None);
        }

        let placeholders: Vec<String> = (0..fields.len()).map(|i| format!("?{}", i + 2)).collect();
        let sql = format!(
            "SELECT c.* FROM content_items c \
             WHERE c.published = 1 AND EXISTS ( \
                 SELECT 1 FROM entity_references r \
                 WHERE r.content_id = c.id AND r.target_id = ?1 AND r.field_name IN ({}) \
             ) \
             ORDER BY c.created DESC, c.id DESC LIMIT 1",
            placeholders.join(", ")
        );

        let mut args = Vec::with_capacity(fields.len() + 1);
        args.push(Value::Integer(term_id));
        args.extend(fields.into_iter().map(Value::Text));

        let conn = self.conn.lock();
        let item = conn
            .prepare(&sql)
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params_from_iter(args.iter()), Self::row_to_content_item)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(item)
    }
}

fn system_path_id(path: &str, prefix: &str) -> Option<i64> {
    path.strip_prefix(prefix)?.parse().ok()
}

fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with("//")
}

/// Turn a stored asset URI into an absolute URL under `base_url`.
fn absolute_asset_url(uri: &str, base_url: &str) -> Option<String> {
    let uri = uri.trim();
    let base_url = base_url.trim_end_matches('/');
    if uri.is_empty() {
        None
    } else if is_absolute_url(uri) {
        Some(uri.to_string())
    } else if let Some(rest) = uri.strip_prefix(PUBLIC_SCHEME) {
        Some(format!("{}{}{}", base_url, PUBLIC_FILES_PATH, rest.trim_start_matches('/')))
    } else if uri.starts_with('/') {
        Some(format!("{}{}", base_url, uri))
    } else {
        Some(format!("{}/{}", base_url, uri))
    }
}
