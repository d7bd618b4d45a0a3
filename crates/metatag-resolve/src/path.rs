//! Path pattern matching: exact paths and `*` wildcards.

use regex::{Regex, RegexBuilder};

/// Does `request_path` satisfy `pattern`?
///
/// Exact equality always matches. Otherwise `*` stands for any run of
/// characters (including none) and the whole path must match. Case-sensitive;
/// trailing slashes are not normalized.
pub fn matches(request_path: &str, pattern: &str) -> bool {
    if request_path == pattern {
        return true;
    }
    if !pattern.contains('*') {
        return false;
    }
    compile_pattern(pattern)
        .map(|re| re.is_match(request_path))
        .unwrap_or(false)
}

/// Compile a wildcard pattern into an anchored regex.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&format!("^(?:{})$", body))
        .dot_matches_new_line(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches("/about", "/about"));
        assert!(!matches("/about", "/About"));
        assert!(!matches("/about/", "/about"));
        assert!(matches("<front>", "<front>"));
    }

    #[test]
    fn test_literal_pattern_is_equality() {
        for (path, pattern) in [
            ("/a.b", "/a.b"),
            ("/axb", "/a.b"),
            ("/a+b", "/a+b"),
            ("/aab", "/a+b"),
            ("/x(1)", "/x(1)"),
            ("/x1", "/x(1)"),
            ("/$", "/$"),
            ("", ""),
        ] {
            assert_eq!(matches(path, pattern), path == pattern, "{} vs {}", path, pattern);
        }
    }

    #[test]
    fn test_wildcard_suffix() {
        assert!(matches("/blog/post-1", "/blog/*"));
        assert!(matches("/blog/", "/blog/*"));
        assert!(matches("/blog/2024/01/post", "/blog/*"));
        assert!(!matches("/blog", "/blog/*"));
        assert!(!matches("/news/blog/post", "/blog/*"));
    }

    #[test]
    fn test_wildcard_anchored() {
        assert!(!matches("/blog/post/comments", "/blog/*/edit"));
        assert!(matches("/blog/post/edit", "/blog/*/edit"));
        assert!(matches("/anything", "*"));
        assert!(matches("", "*"));
    }

    #[test]
    fn test_wildcard_escapes_metacharacters() {
        assert!(matches("/docs/v1.2/intro", "/docs/v1.2/*"));
        assert!(!matches("/docs/v102/intro", "/docs/v1.2/*"));
        assert!(matches("/q?x=1", "/q?*"));
        assert!(!matches("/qx=1", "/q?*"));
    }

    #[test]
    fn test_wildcard_case_sensitive() {
        assert!(!matches("/Blog/post", "/blog/*"));
    }
}
