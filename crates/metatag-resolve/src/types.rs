//! Resolver output types.

use std::collections::BTreeMap;

use serde::Serialize;

use metatag_core::EntityType;

pub const TITLE: &str = "title";
pub const OG_TITLE: &str = "og:title";
pub const DESCRIPTION: &str = "description";
pub const OG_DESCRIPTION: &str = "og:description";
pub const OG_IMAGE: &str = "og:image";
pub const OG_URL: &str = "og:url";

/// Final metatag mapping for a page.
///
/// Keys are only present for non-empty values; `og:url` is always stamped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedMetadata {
    tags: BTreeMap<&'static str, String>,
}

impl ResolvedMetadata {
    /// Metadata holding only the canonical URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        let mut metadata = Self::default();
        metadata.set_url(url);
        metadata
    }

    /// Set `title` and `og:title`.
    pub fn set_title(&mut self, title: &str) {
        self.set_pair(TITLE, OG_TITLE, title);
    }

    /// Set `description` and `og:description`.
    pub fn set_description(&mut self, description: &str) {
        self.set_pair(DESCRIPTION, OG_DESCRIPTION, description);
    }

    pub fn set_image(&mut self, url: &str) {
        if !url.trim().is_empty() {
            self.tags.insert(OG_IMAGE, url.to_string());
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.tags.insert(OG_URL, url.into());
    }

    fn set_pair(&mut self, key: &'static str, og_key: &'static str, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        self.tags.insert(key, value.to_string());
        self.tags.insert(og_key, value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.tags.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Which resolution path produced the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionSource {
    /// A path override rule matched.
    Override { rule_id: i64 },
    /// Derived from the entity in context.
    Entity { entity_type: EntityType, entity_id: i64 },
    /// Nothing matched; only the URL is known.
    Unresolved,
}

/// Metadata plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub source: ResolutionSource,
    pub metadata: ResolvedMetadata,
}
