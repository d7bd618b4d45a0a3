//! Plain-text excerpts from rich (HTML) content.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cap for excerpts shown in rule listings.
pub const LIST_EXCERPT_LENGTH: usize = 80;
/// Cap for `description` / `og:description` values.
pub const DESCRIPTION_LENGTH: usize = 160;
/// Appended when text is cut.
pub const ELLIPSIS: &str = "...";

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static BLOCK_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</?(?:address|article|aside|blockquote|br|dd|div|dl|dt|figcaption|figure|footer|h[1-6]|header|hr|li|nav|ol|p|pre|section|table|tbody|td|tfoot|th|thead|tr|ul)\b[^>]*>",
    )
    .unwrap()
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    // last, so "&amp;lt;" stays "&lt;"
    ("&amp;", "&"),
];

/// Strip markup, collapse whitespace and cap at `max_length` characters.
///
/// Text longer than `max_length` is cut to exactly `max_length` characters
/// and gets `...` appended. Empty input gives an empty string.
pub fn summarize(rich_text: &str, max_length: usize) -> String {
    let text = plain_text(rich_text);
    if text.chars().count() <= max_length {
        return text;
    }
    let mut truncated: String = text.chars().take(max_length).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Markup-free, whitespace-collapsed, trimmed text.
///
/// Inline tags and comments are removed outright, so markup inside a word
/// leaves the word whole. Block-level tags and `<br>` become a space.
pub fn plain_text(rich_text: &str) -> String {
    if rich_text.is_empty() {
        return String::new();
    }
    let text = SCRIPT_RE.replace_all(rich_text, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = COMMENT_RE.replace_all(&text, "");
    // block boundaries separate words, inline tags vanish
    let text = BLOCK_TAG_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markup_and_whitespace() {
        assert_eq!(summarize("<p>Hello   world</p>", DESCRIPTION_LENGTH), "Hello world");
    }

    #[test]
    fn test_block_tags_do_not_glue_words() {
        assert_eq!(summarize("<p>One</p><p>Two</p>", 160), "One Two");
        assert_eq!(summarize("line<br/>break", 160), "line break");
    }

    #[test]
    fn test_inline_tags_keep_surrounding_spacing() {
        assert_eq!(summarize("a <strong>bold</strong> move", 160), "a bold move");
    }

    #[test]
    fn test_inline_markup_inside_word() {
        assert_eq!(summarize("un<em>believ</em>able", 160), "unbelievable");
        assert_eq!(summarize("<p>H<b>e</b>llo <a href=\"/x\">wor</a>ld</p>", 160), "Hello world");
    }

    #[test]
    fn test_block_tag_case_and_attributes() {
        assert_eq!(summarize("<DIV class=\"a\">One</DIV><Li>Two</Li>", 160), "One Two");
    }

    #[test]
    fn test_newlines_and_tabs_collapse() {
        assert_eq!(summarize("  \n\tHello\n\n\tworld \t", 160), "Hello world");
    }

    #[test]
    fn test_truncates_long_text() {
        let input = "a".repeat(200);
        let summary = summarize(&input, DESCRIPTION_LENGTH);
        assert_eq!(summary.chars().count(), DESCRIPTION_LENGTH + ELLIPSIS.len());
        assert_eq!(summary, format!("{}...", "a".repeat(160)));
    }

    #[test]
    fn test_exact_length_has_no_ellipsis() {
        let input = "b".repeat(80);
        assert_eq!(summarize(&input, LIST_EXCERPT_LENGTH), input);
    }

    #[test]
    fn test_multibyte_truncation_by_char() {
        let input = "é".repeat(100);
        let summary = summarize(&input, LIST_EXCERPT_LENGTH);
        assert_eq!(summary, format!("{}...", "é".repeat(80)));

        let input = "日本語のテキスト".repeat(30);
        let summary = summarize(&input, 160);
        assert_eq!(summary.chars().count(), 163);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize("", 160), "");
        assert_eq!(summarize("<p> </p>", 160), "");
        assert_eq!(summarize("<br><br>", 0), "");
    }

    #[test]
    fn test_script_and_style_removed() {
        let html = "<style>p { color: red }</style><p>Visible</p><script>alert('x')</script>";
        assert_eq!(summarize(html, 160), "Visible");
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(summarize("Keep <!-- drop\nme -->this", 160), "Keep this");
        assert_eq!(summarize("in<!-- x -->line", 160), "inline");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(summarize("Fish&nbsp;&amp;&nbsp;chips", 160), "Fish & chips");
        assert_eq!(summarize("&amp;lt;", 160), "&lt;");
    }

    #[test]
    fn test_counts_length_after_cleaning() {
        // 160 visible characters wrapped in markup: no truncation
        let html = format!("<div><p>{}</p></div>", "c".repeat(160));
        assert_eq!(summarize(&html, 160), "c".repeat(160));
    }
}
