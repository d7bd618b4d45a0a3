//! Collaborator traits the resolution engine reads through.
//!
//! - `RuleStore`: CRUD over path override rules. Resolution only calls
//!   `list_active_rules`; the rest serves the admin surface.
//! - `ContentProvider`: read-only access to entities, their metadata records
//!   and stored assets.
//!
//! Errors from either collaborator are recovered by the engine as "no data".

use crate::context::RequestContext;
use crate::entity::{AssetRef, ContentItem, Entity, EntityMetadataRecord, EntityType};
use crate::error::Result;
use crate::rule::{OverrideRule, RuleFields};

/// Persistent storage for override rules.
pub trait RuleStore: Send + Sync {
    /// Enabled rules. Order is not guaranteed; the resolver sorts.
    fn list_active_rules(&self) -> Result<Vec<OverrideRule>>;

    /// Every rule, enabled or not, by id ascending.
    fn list_rules(&self) -> Result<Vec<OverrideRule>>;

    fn get_rule(&self, id: i64) -> Result<Option<OverrideRule>>;

    /// Insert a rule. Returns the new rule id.
    fn create_rule(&self, fields: &RuleFields) -> Result<i64>;

    /// Replace a rule's fields. Returns false if no such rule.
    fn update_rule(&self, id: i64, fields: &RuleFields) -> Result<bool>;

    /// Returns false if no such rule.
    fn delete_rule(&self, id: i64) -> Result<bool>;
}

/// Read-only access to the content system.
pub trait ContentProvider: Send + Sync {
    /// The entity the current request is about, if any.
    fn current_entity_in_context(&self, ctx: &RequestContext) -> Result<Option<Entity>>;

    fn get_entity_metadata_record(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Option<EntityMetadataRecord>>;

    /// Absolute URL for an asset, or `None` when the asset no longer exists.
    fn resolve_asset_url(&self, asset: &AssetRef, base_url: &str) -> Result<Option<String>>;

    /// Newest published content item referencing `term_id` through any
    /// reference field that targets taxonomy terms.
    fn find_most_recent_referencing_content(&self, term_id: i64) -> Result<Option<ContentItem>>;
}
