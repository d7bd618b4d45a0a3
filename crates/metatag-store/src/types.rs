//! Data types for content snapshots and store statistics.

use serde::{Deserialize, Serialize};

use metatag_core::{AssetRef, EntityMetadataRecord, RuleFields};

/// A stored asset: id plus its URI (absolute URL, site path or `public://` URI).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: String,
    pub uri: String,
}

/// A field definition on an entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub entity_type: String,
    pub field_name: String,
    #[serde(default = "default_field_type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

fn default_field_type() -> String {
    crate::reference::ENTITY_REFERENCE.to_string()
}

/// A term reference held by a content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub field_name: String,
    pub target_id: i64,
}

/// A taxonomy term as delivered by the content system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<AssetRef>,
    pub path: String,
    /// Defaults to base URL + path on import.
    #[serde(default)]
    pub canonical_url: Option<String>,
}

/// A content item as delivered by the content system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image: Option<AssetRef>,
    #[serde(default = "default_published")]
    pub published: bool,
    /// Unix seconds.
    #[serde(default)]
    pub created: i64,
    pub path: String,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub references: Vec<ReferenceEntry>,
}

fn default_published() -> bool {
    true
}

/// A full content mirror snapshot, as loaded by `metatag import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentSnapshot {
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub terms: Vec<TermEntry>,
    #[serde(default)]
    pub content_items: Vec<ContentEntry>,
    #[serde(default)]
    pub rules: Vec<RuleFields>,
    #[serde(default)]
    pub records: Vec<EntityMetadataRecord>,
}

/// Counts of what an import wrote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub assets: usize,
    pub fields: usize,
    pub terms: usize,
    pub content_items: usize,
    pub references: usize,
    pub rules: usize,
    pub records: usize,
    /// Entries that were rejected, with the reason.
    pub skipped: Vec<String>,
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_rules: i64,
    pub active_rules: i64,
    pub entity_records: i64,
    pub content_items: i64,
    pub taxonomy_terms: i64,
    pub assets: i64,
    pub reference_fields: usize,
    pub db_path: String,
}
