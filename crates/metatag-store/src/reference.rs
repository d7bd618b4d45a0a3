//! Precomputed index of reference fields that point at taxonomy terms.
//!
//! Built once from `field_definitions` when the store opens and rebuilt when a
//! field definition changes, so the reverse term lookup never scans the schema
//! per request.

use std::collections::{BTreeSet, HashMap};

use metatag_core::EntityType;

/// Field type name for entity reference fields.
pub const ENTITY_REFERENCE: &str = "entity_reference";

/// Entity type → names of its fields that reference taxonomy terms.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFieldIndex {
    fields: HashMap<EntityType, BTreeSet<String>>,
}

impl ReferenceFieldIndex {
    /// Build from `(entity_type, field_name, field_type, target_type)` rows.
    /// Rows for unknown entity types or non-term targets are ignored.
    pub fn from_definitions<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String, Option<String>)>,
    {
        let mut index = Self::default();
        for (entity_type, field_name, field_type, target_type) in rows {
            if field_type != ENTITY_REFERENCE {
                continue;
            }
            if target_type.as_deref() != Some(EntityType::TaxonomyTerm.as_str()) {
                continue;
            }
            let Ok(entity_type) = entity_type.parse::<EntityType>() else {
                continue;
            };
            index.fields.entry(entity_type).or_default().insert(field_name);
        }
        index
    }

    /// Term-reference field names for an entity type, sorted.
    pub fn fields_for(&self, entity_type: EntityType) -> Vec<String> {
        self.fields
            .get(&entity_type)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, entity_type: EntityType, field_name: &str) -> bool {
        self.fields
            .get(&entity_type)
            .is_some_and(|set| set.contains(field_name))
    }

    /// Total number of indexed fields across entity types.
    pub fn len(&self) -> usize {
        self.fields.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entity: &str, field: &str, ty: &str, target: Option<&str>) -> (String, String, String, Option<String>) {
        (entity.into(), field.into(), ty.into(), target.map(String::from))
    }

    #[test]
    fn test_only_term_references_indexed() {
        let index = ReferenceFieldIndex::from_definitions(vec![
            row("content_item", "field_tags", ENTITY_REFERENCE, Some("taxonomy_term")),
            row("content_item", "field_category", ENTITY_REFERENCE, Some("taxonomy_term")),
            row("content_item", "field_related", ENTITY_REFERENCE, Some("content_item")),
            row("content_item", "field_image", "image", None),
            row("user", "field_tags", ENTITY_REFERENCE, Some("taxonomy_term")),
        ]);

        assert_eq!(
            index.fields_for(EntityType::ContentItem),
            vec!["field_category".to_string(), "field_tags".to_string()]
        );
        assert!(index.contains(EntityType::ContentItem, "field_tags"));
        assert!(!index.contains(EntityType::ContentItem, "field_related"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = ReferenceFieldIndex::default();
        assert!(index.is_empty());
        assert!(index.fields_for(EntityType::ContentItem).is_empty());
    }
}
