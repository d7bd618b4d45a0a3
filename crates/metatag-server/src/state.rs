//! Shared application state.

use metatag_core::{MetatagConfig, RequestContext};
use metatag_resolve::{MetadataAssembler, Resolution};
use metatag_store::SqliteStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: MetatagConfig,
    pub store: SqliteStore,
}

impl AppState {
    pub fn new(config: MetatagConfig, store: SqliteStore) -> Self {
        Self { config, store }
    }

    /// Build a request context from raw request facts, filling in defaults.
    pub fn request_context(&self, path: &str, language: Option<&str>, domain: &str) -> RequestContext {
        let path = normalize_request_path(path);
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.config.default_language.as_str());
        RequestContext::new(path, language, domain, self.config.base_url.as_str())
            .with_front_page(&self.config.front_page)
    }

    /// Resolve metatags for a request against the store.
    pub fn resolve(&self, ctx: &RequestContext) -> Resolution {
        MetadataAssembler::new(&self.store, &self.store).resolve(ctx)
    }
}

/// Ensure a leading slash; everything else is kept as requested.
fn normalize_request_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> (std::sync::Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().unwrap();
    let config = MetatagConfig::new(dir.path(), "https://example.com/").unwrap();
    let store = SqliteStore::open(&config.data_paths.db).unwrap();
    (std::sync::Arc::new(AppState::new(config, store)), dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_defaults() {
        let (state, _dir) = test_state();

        let ctx = state.request_context("about", None, "example.com");
        assert_eq!(ctx.path, "/about");
        assert_eq!(ctx.language, "en");
        assert_eq!(ctx.current_url(), "https://example.com/about");
        assert!(!ctx.is_front_page);

        let ctx = state.request_context("/", Some("fr"), "example.com");
        assert_eq!(ctx.language, "fr");
        assert!(ctx.is_front_page);
    }

    #[test]
    fn test_blank_language_uses_default() {
        let (state, _dir) = test_state();
        let ctx = state.request_context("/x", Some("  "), "example.com");
        assert_eq!(ctx.language, "en");
    }
}
