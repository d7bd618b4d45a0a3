//! Content entities and the per-entity metadata override record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Opaque reference to a stored asset (file id or absolute URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a reference from an optional stored value; blank means no asset.
    pub fn from_optional(value: Option<String>) -> Option<Self> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kinds of entity that can carry a metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Article-like content item.
    ContentItem,
    /// Category / taxonomy term.
    TaxonomyTerm,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentItem => "content_item",
            Self::TaxonomyTerm => "taxonomy_term",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content_item" | "node" => Ok(Self::ContentItem),
            "taxonomy_term" | "term" => Ok(Self::TaxonomyTerm),
            other => Err(Error::Validation(format!("Unknown entity type: {}", other))),
        }
    }
}

/// A content item (article, page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    /// Long-text body, may contain markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
    #[serde(default = "default_published")]
    pub published: bool,
    /// Creation time, unix seconds.
    #[serde(default)]
    pub created: i64,
    /// Fully-qualified canonical address.
    pub canonical_url: String,
}

fn default_published() -> bool {
    true
}

/// A taxonomy term (category, tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: i64,
    pub name: String,
    /// Long-text description, may contain markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
    pub canonical_url: String,
}

/// The entity a request is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    ContentItem(ContentItem),
    TaxonomyTerm(Term),
}

impl Entity {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::ContentItem(_) => EntityType::ContentItem,
            Self::TaxonomyTerm(_) => EntityType::TaxonomyTerm,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::ContentItem(item) => item.id,
            Self::TaxonomyTerm(term) => term.id,
        }
    }

    /// Native display name: content title or term name.
    pub fn display_name(&self) -> &str {
        match self {
            Self::ContentItem(item) => &item.title,
            Self::TaxonomyTerm(term) => &term.name,
        }
    }

    /// The long-text field descriptions are derived from.
    pub fn long_text(&self) -> Option<&str> {
        match self {
            Self::ContentItem(item) => item.body.as_deref(),
            Self::TaxonomyTerm(term) => term.description.as_deref(),
        }
    }

    pub fn native_image(&self) -> Option<&AssetRef> {
        match self {
            Self::ContentItem(item) => item.image.as_ref(),
            Self::TaxonomyTerm(term) => term.image.as_ref(),
        }
    }

    pub fn canonical_url(&self) -> &str {
        match self {
            Self::ContentItem(item) => &item.canonical_url,
            Self::TaxonomyTerm(term) => &term.canonical_url,
        }
    }
}

/// Explicit metadata override attached to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadataRecord {
    pub entity_type: EntityType,
    pub entity_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_round_trip_names() {
        assert_eq!("content_item".parse::<EntityType>().unwrap(), EntityType::ContentItem);
        assert_eq!("node".parse::<EntityType>().unwrap(), EntityType::ContentItem);
        assert_eq!("taxonomy_term".parse::<EntityType>().unwrap(), EntityType::TaxonomyTerm);
        assert!("user".parse::<EntityType>().is_err());
        assert_eq!(EntityType::TaxonomyTerm.to_string(), "taxonomy_term");
    }

    #[test]
    fn test_asset_ref_blank_is_none() {
        assert!(AssetRef::from_optional(Some("  ".into())).is_none());
        assert!(AssetRef::from_optional(None).is_none());
        assert_eq!(AssetRef::from_optional(Some("12".into())), Some(AssetRef::new("12")));
    }

    #[test]
    fn test_entity_accessors() {
        let term = Entity::TaxonomyTerm(Term {
            id: 3,
            name: "Rust".into(),
            description: Some("<p>Systems</p>".into()),
            image: None,
            canonical_url: "https://a.com/taxonomy/term/3".into(),
        });
        assert_eq!(term.entity_type(), EntityType::TaxonomyTerm);
        assert_eq!(term.id(), 3);
        assert_eq!(term.display_name(), "Rust");
        assert_eq!(term.long_text(), Some("<p>Systems</p>"));
        assert!(term.native_image().is_none());
    }

    #[test]
    fn test_entity_serde_tag() {
        let json = serde_json::json!({
            "type": "content_item",
            "id": 1,
            "title": "Hello",
            "canonical_url": "https://a.com/node/1"
        });
        let entity: Entity = serde_json::from_value(json).unwrap();
        match entity {
            Entity::ContentItem(item) => {
                assert!(item.published);
                assert!(item.body.is_none());
            }
            _ => panic!("expected content item"),
        }
    }
}
