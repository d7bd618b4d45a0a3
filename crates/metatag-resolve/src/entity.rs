//! Entity resolver: per-attribute fallback chain for content items and terms.
//!
//! - title: record title, else the entity's display name
//! - description: record description, else a summary of the long-text field
//! - image: record image, else the entity's own image, else (terms only) the
//!   image of the newest published item tagged with the term
//! - og:url: always the entity's canonical URL

use metatag_core::{AssetRef, ContentProvider, Entity, EntityMetadataRecord};
use tracing::{debug, warn};

use crate::summarize::{summarize, DESCRIPTION_LENGTH};
use crate::types::ResolvedMetadata;

/// Derives metadata from an entity and its optional override record.
pub struct EntityResolver<'a> {
    content: &'a dyn ContentProvider,
    base_url: &'a str,
}

impl<'a> EntityResolver<'a> {
    pub fn new(content: &'a dyn ContentProvider, base_url: &'a str) -> Self {
        Self { content, base_url }
    }

    /// Fetch the entity's record, treating any failure as "no record".
    pub fn fetch_record(&self, entity: &Entity) -> Option<EntityMetadataRecord> {
        match self
            .content
            .get_entity_metadata_record(entity.entity_type(), entity.id())
        {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "Metadata record lookup failed for {}/{}: {}",
                    entity.entity_type(),
                    entity.id(),
                    e
                );
                None
            }
        }
    }

    /// Build metadata for an entity.
    pub fn resolve_for_entity(
        &self,
        entity: &Entity,
        record: Option<&EntityMetadataRecord>,
    ) -> ResolvedMetadata {
        let mut metadata = ResolvedMetadata::with_url(entity.canonical_url());

        metadata.set_title(Self::title(entity, record));

        if let Some(description) = Self::description(entity, record) {
            metadata.set_description(&description);
        }

        if let Some(image) = self.image(entity, record) {
            metadata.set_image(&image);
        }

        metadata
    }

    fn title<'e>(entity: &'e Entity, record: Option<&'e EntityMetadataRecord>) -> &'e str {
        record
            .and_then(|r| non_empty(r.title.as_deref()))
            .unwrap_or_else(|| entity.display_name())
    }

    fn description(entity: &Entity, record: Option<&EntityMetadataRecord>) -> Option<String> {
        if let Some(explicit) = record.and_then(|r| non_empty(r.description.as_deref())) {
            return Some(explicit.to_string());
        }
        let summary = summarize(entity.long_text()?, DESCRIPTION_LENGTH);
        if summary.is_empty() {
            None
        } else {
            Some(summary)
        }
    }

    fn image(&self, entity: &Entity, record: Option<&EntityMetadataRecord>) -> Option<String> {
        if let Some(url) = record.and_then(|r| r.image.as_ref()).and_then(|a| self.asset_url(a)) {
            return Some(url);
        }
        if let Some(url) = entity.native_image().and_then(|a| self.asset_url(a)) {
            return Some(url);
        }
        match entity {
            Entity::TaxonomyTerm(term) => self.referencing_content_image(term.id),
            Entity::ContentItem(_) => None,
        }
    }

    /// Image of the newest published item that references the term.
    fn referencing_content_image(&self, term_id: i64) -> Option<String> {
        let item = match self.content.find_most_recent_referencing_content(term_id) {
            Ok(item) => item?,
            Err(e) => {
                warn!("Referencing content lookup failed for term {}: {}", term_id, e);
                return None;
            }
        };
        debug!("Term {} borrows image from content item {}", term_id, item.id);
        item.image.as_ref().and_then(|a| self.asset_url(a))
    }

    /// Absolute URL for an asset; missing assets and lookup failures give `None`.
    pub fn asset_url(&self, asset: &AssetRef) -> Option<String> {
        match self.content.resolve_asset_url(asset, self.base_url) {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                debug!("Asset {} not found, skipping", asset);
                None
            }
            Err(e) => {
                warn!("Asset lookup failed for {}: {}", asset, e);
                None
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
