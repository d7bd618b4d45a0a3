//! Resolvers: path override selection and entity fallback chain.
//!
//! A request is first matched against the override rules. A matched rule is
//! authoritative; otherwise metadata is derived from the entity in context.

pub mod assembler;
pub mod entity;
pub mod overrides;
pub mod path;
pub mod summarize;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use assembler::MetadataAssembler;
pub use entity::EntityResolver;
pub use overrides::OverrideResolver;
pub use path::matches;
pub use summarize::{summarize, DESCRIPTION_LENGTH, LIST_EXCERPT_LENGTH};
pub use types::*;
