//! Metadata assembler: the top-level per-request pipeline.
//!
//! 1. Load enabled rules and pick the winner for the request.
//! 2. A winning rule is authoritative; entity data is never consulted.
//! 3. Otherwise derive metadata from the entity in context.
//! 4. With neither, only `og:url` is emitted.

use metatag_core::{ContentProvider, Entity, OverrideRule, RequestContext, RuleStore};
use tracing::{debug, warn};

use crate::entity::EntityResolver;
use crate::overrides::OverrideResolver;
use crate::types::{Resolution, ResolutionSource, ResolvedMetadata};

pub struct MetadataAssembler<'a> {
    rules: &'a dyn RuleStore,
    content: &'a dyn ContentProvider,
}

impl<'a> MetadataAssembler<'a> {
    pub fn new(rules: &'a dyn RuleStore, content: &'a dyn ContentProvider) -> Self {
        Self { rules, content }
    }

    /// Resolve the final metatags for a request. Never fails: collaborator
    /// errors are logged and treated as missing data.
    pub fn resolve(&self, ctx: &RequestContext) -> Resolution {
        let rules = match self.rules.list_active_rules() {
            Ok(rules) => rules,
            Err(e) => {
                warn!("Failed to load override rules, continuing without: {}", e);
                Vec::new()
            }
        };

        if let Some(rule) = OverrideResolver::resolve_for_request(ctx, &rules) {
            debug!("Override rule {} ({}) matched {}", rule.id, rule.path_pattern, ctx.path);
            return Resolution {
                source: ResolutionSource::Override { rule_id: rule.id },
                metadata: self.from_rule(rule, ctx),
            };
        }

        let entity = match self.content.current_entity_in_context(ctx) {
            Ok(entity) => entity,
            Err(e) => {
                warn!("Entity lookup failed for {}: {}", ctx.path, e);
                None
            }
        };

        match entity {
            Some(entity) => {
                debug!(
                    "Resolving {} from {} {}",
                    ctx.path,
                    entity.entity_type(),
                    entity.id()
                );
                Resolution {
                    source: ResolutionSource::Entity {
                        entity_type: entity.entity_type(),
                        entity_id: entity.id(),
                    },
                    metadata: self.resolve_entity(ctx, &entity),
                }
            }
            None => {
                debug!("No override or entity for {}", ctx.path);
                Resolution {
                    source: ResolutionSource::Unresolved,
                    metadata: ResolvedMetadata::with_url(ctx.current_url()),
                }
            }
        }
    }

    /// Metadata from a matched rule. The description is used verbatim.
    pub fn from_rule(&self, rule: &OverrideRule, ctx: &RequestContext) -> ResolvedMetadata {
        let mut metadata = ResolvedMetadata::with_url(ctx.current_url());
        metadata.set_title(&rule.title);
        metadata.set_description(&rule.description);
        if let Some(image) = &rule.image {
            let resolver = EntityResolver::new(self.content, &ctx.base_url);
            if let Some(url) = resolver.asset_url(image) {
                metadata.set_image(&url);
            }
        }
        metadata
    }

    /// Metadata for an entity, including its stored record if any.
    pub fn resolve_entity(&self, ctx: &RequestContext, entity: &Entity) -> ResolvedMetadata {
        let resolver = EntityResolver::new(self.content, &ctx.base_url);
        let record = resolver.fetch_record(entity);
        resolver.resolve_for_entity(entity, record.as_ref())
    }
}
