//! Metatag Core: domain types, configuration, errors and the collaborator
//! traits the resolution engine reads through.

pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod provider;
pub mod rule;

pub use config::{DataPaths, MetatagConfig};
pub use context::{host_without_port, RequestContext, FRONT_PAGE_TOKEN};
pub use entity::{AssetRef, ContentItem, Entity, EntityMetadataRecord, EntityType, Term};
pub use error::{Error, Result};
pub use provider::{ContentProvider, RuleStore};
pub use rule::{normalize_domains, OverrideRule, RuleFields};
