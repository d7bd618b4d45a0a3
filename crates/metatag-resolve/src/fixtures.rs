//! In-memory collaborators for resolver tests.

use std::collections::HashMap;

use metatag_core::{
    AssetRef, ContentItem, ContentProvider, Entity, EntityMetadataRecord, EntityType, Error,
    OverrideRule, RequestContext, Result, RuleFields, RuleStore, Term,
};

pub const BASE: &str = "https://example.com";

#[derive(Default)]
pub struct FakeRules {
    pub rules: Vec<OverrideRule>,
    pub fail: bool,
}

impl FakeRules {
    pub fn with(rules: Vec<OverrideRule>) -> Self {
        Self { rules, fail: false }
    }
}

impl RuleStore for FakeRules {
    fn list_active_rules(&self) -> Result<Vec<OverrideRule>> {
        if self.fail {
            return Err(Error::Database("rule store offline".into()));
        }
        Ok(self.rules.iter().filter(|r| r.status).cloned().collect())
    }

    fn list_rules(&self) -> Result<Vec<OverrideRule>> {
        Ok(self.rules.clone())
    }

    fn get_rule(&self, id: i64) -> Result<Option<OverrideRule>> {
        Ok(self.rules.iter().find(|r| r.id == id).cloned())
    }

    fn create_rule(&self, _fields: &RuleFields) -> Result<i64> {
        Err(Error::Internal("read-only fake".into()))
    }

    fn update_rule(&self, _id: i64, _fields: &RuleFields) -> Result<bool> {
        Err(Error::Internal("read-only fake".into()))
    }

    fn delete_rule(&self, _id: i64) -> Result<bool> {
        Err(Error::Internal("read-only fake".into()))
    }
}

#[derive(Default)]
pub struct FakeContent {
    /// Path → entity.
    pub entities: HashMap<String, Entity>,
    pub records: HashMap<(EntityType, i64), EntityMetadataRecord>,
    /// Asset id → URL.
    pub assets: HashMap<String, String>,
    /// Term id → newest published referencing item.
    pub referencing: HashMap<i64, ContentItem>,
    pub fail_records: bool,
    pub fail_entities: bool,
}

impl ContentProvider for FakeContent {
    fn current_entity_in_context(&self, ctx: &RequestContext) -> Result<Option<Entity>> {
        if self.fail_entities {
            return Err(Error::Database("content offline".into()));
        }
        Ok(self.entities.get(&ctx.path).cloned())
    }

    fn get_entity_metadata_record(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Option<EntityMetadataRecord>> {
        if self.fail_records {
            return Err(Error::Database("records offline".into()));
        }
        Ok(self.records.get(&(entity_type, entity_id)).cloned())
    }

    fn resolve_asset_url(&self, asset: &AssetRef, _base_url: &str) -> Result<Option<String>> {
        Ok(self.assets.get(asset.as_str()).cloned())
    }

    fn find_most_recent_referencing_content(&self, term_id: i64) -> Result<Option<ContentItem>> {
        Ok(self.referencing.get(&term_id).cloned())
    }
}

pub fn rule(id: i64, pattern: &str, weight: i64) -> OverrideRule {
    OverrideRule {
        id,
        path_pattern: pattern.into(),
        domains: Vec::new(),
        language: String::new(),
        title: format!("Rule {}", id),
        description: String::new(),
        image: None,
        weight,
        status: true,
        domains_malformed: false,
    }
}

pub fn article(id: i64, title: &str, body: Option<&str>, image: Option<&str>) -> ContentItem {
    ContentItem {
        id,
        title: title.into(),
        body: body.map(String::from),
        image: image.map(AssetRef::new),
        published: true,
        created: 0,
        canonical_url: format!("{}/node/{}", BASE, id),
    }
}

pub fn category(id: i64, name: &str, image: Option<&str>) -> Term {
    Term {
        id,
        name: name.into(),
        description: None,
        image: image.map(AssetRef::new),
        canonical_url: format!("{}/taxonomy/term/{}", BASE, id),
    }
}

pub fn ctx(path: &str) -> RequestContext {
    RequestContext::new(path, "en", "example.com", BASE)
}
