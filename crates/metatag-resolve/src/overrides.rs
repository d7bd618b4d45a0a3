//! Override resolver: picks the single winning path rule for a request.

use std::cmp::Ordering;

use metatag_core::{OverrideRule, RequestContext, FRONT_PAGE_TOKEN};

use crate::path;

/// Stateless rule selection.
pub struct OverrideResolver;

impl OverrideResolver {
    /// Select the winning rule for a path, language and domain.
    ///
    /// Enabled rules are tried by weight descending, then id ascending; the
    /// first whose path, language and domain all fit wins.
    pub fn resolve<'a>(
        path: &str,
        language: &str,
        domain: &str,
        rules: &'a [OverrideRule],
    ) -> Option<&'a OverrideRule> {
        Self::select(&[path], language, domain, rules)
    }

    /// Select the winning rule for a request. Home page requests also match
    /// rules written against `<front>`.
    pub fn resolve_for_request<'a>(
        ctx: &RequestContext,
        rules: &'a [OverrideRule],
    ) -> Option<&'a OverrideRule> {
        if ctx.is_front_page {
            Self::select(&[ctx.path.as_str(), FRONT_PAGE_TOKEN], &ctx.language, &ctx.domain, rules)
        } else {
            Self::select(&[ctx.path.as_str()], &ctx.language, &ctx.domain, rules)
        }
    }

    fn select<'a>(
        paths: &[&str],
        language: &str,
        domain: &str,
        rules: &'a [OverrideRule],
    ) -> Option<&'a OverrideRule> {
        let mut candidates: Vec<&OverrideRule> = rules
            .iter()
            .filter(|r| r.status && !r.domains_malformed)
            .collect();
        candidates.sort_by(|a, b| priority_order(a, b));

        candidates.into_iter().find(|rule| {
            paths.iter().any(|p| path::matches(p, &rule.path_pattern))
                && language_fits(rule, language)
                && domain_fits(rule, domain)
        })
    }
}

/// Weight descending, then id ascending.
fn priority_order(a: &OverrideRule, b: &OverrideRule) -> Ordering {
    b.weight.cmp(&a.weight).then_with(|| a.id.cmp(&b.id))
}

fn language_fits(rule: &OverrideRule, language: &str) -> bool {
    rule.language.is_empty() || rule.language == language
}

fn domain_fits(rule: &OverrideRule, domain: &str) -> bool {
    rule.domains.is_empty() || rule.domains.iter().any(|d| d == domain)
}
