//! Per-request context handed explicitly into every resolution call.

use serde::{Deserialize, Serialize};

/// Pattern token that rules use to target the site home page.
pub const FRONT_PAGE_TOKEN: &str = "<front>";

/// Read-only facts about the request being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Normalized request path, e.g. `/blog/post-1`.
    pub path: String,
    /// Current language code.
    pub language: String,
    /// Current hostname, without port.
    pub domain: String,
    /// Site base address without a trailing slash.
    pub base_url: String,
    /// Whether `path` is the configured home page.
    pub is_front_page: bool,
}

impl RequestContext {
    pub fn new(
        path: impl Into<String>,
        language: impl Into<String>,
        domain: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            domain: domain.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            is_front_page: false,
        }
    }

    /// Mark the request as a home page request when its path equals `front_page`.
    pub fn with_front_page(mut self, front_page: &str) -> Self {
        self.is_front_page = self.path == front_page;
        self
    }

    /// Absolute address of the current request: base address + path.
    pub fn current_url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

/// Strip a `:port` suffix from a `Host` header value.
pub fn host_without_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal: keep the bracketed address
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_url() {
        let ctx = RequestContext::new("/about", "en", "a.com", "https://a.com/");
        assert_eq!(ctx.current_url(), "https://a.com/about");
    }

    #[test]
    fn test_front_page_flag() {
        let ctx = RequestContext::new("/", "en", "a.com", "https://a.com").with_front_page("/");
        assert!(ctx.is_front_page);
        let ctx = RequestContext::new("/about", "en", "a.com", "https://a.com").with_front_page("/");
        assert!(!ctx.is_front_page);
    }

    #[test]
    fn test_host_without_port() {
        assert_eq!(host_without_port("example.com:8080"), "example.com");
        assert_eq!(host_without_port("example.com"), "example.com");
        assert_eq!(host_without_port("[::1]:3000"), "[::1]");
    }
}
