//! Path override rules.

use serde::{Deserialize, Serialize};

use crate::entity::AssetRef;
use crate::error::{Error, Result};

pub const MAX_LANGUAGE_LEN: usize = 12;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_IMAGE_LEN: usize = 512;

/// An administrator-defined metadata binding for a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub id: i64,
    /// Literal path, `*` wildcard pattern, or `<front>`.
    pub path_pattern: String,
    /// Hostnames the rule is limited to; empty means every domain.
    #[serde(default)]
    pub domains: Vec<String>,
    /// Language code the rule is limited to; empty means every language.
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
    /// Priority, higher wins.
    #[serde(default)]
    pub weight: i64,
    /// Disabled rules never take part in resolution.
    #[serde(default = "default_status")]
    pub status: bool,
    /// The stored domain list could not be read. Such a rule is listed for
    /// repair but never matches a request.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub domains_malformed: bool,
}

impl OverrideRule {
    pub fn from_fields(id: i64, fields: RuleFields) -> Self {
        Self {
            id,
            path_pattern: fields.path_pattern,
            domains: fields.domains,
            language: fields.language,
            title: fields.title,
            description: fields.description,
            image: fields.image,
            weight: fields.weight,
            status: fields.status,
            domains_malformed: false,
        }
    }
}

fn default_status() -> bool {
    true
}

/// The writable part of a rule, used for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFields {
    pub path_pattern: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
    #[serde(default)]
    pub weight: i64,
    #[serde(default = "default_status")]
    pub status: bool,
}

impl Default for RuleFields {
    fn default() -> Self {
        Self {
            path_pattern: String::new(),
            domains: Vec::new(),
            language: String::new(),
            title: String::new(),
            description: String::new(),
            image: None,
            weight: 0,
            status: true,
        }
    }
}

impl RuleFields {
    /// Trim inputs, normalize the domain list and check field limits.
    pub fn validate(mut self) -> Result<Self> {
        self.path_pattern = self.path_pattern.trim().to_string();
        self.language = self.language.trim().to_string();
        self.title = self.title.trim().to_string();
        self.domains = normalize_domains(self.domains);
        self.image = AssetRef::from_optional(self.image.map(|i| i.0));

        if self.path_pattern.is_empty() {
            return Err(Error::Validation("Path pattern is required".into()));
        }
        if self.language.chars().count() > MAX_LANGUAGE_LEN {
            return Err(Error::Validation(format!(
                "Language code longer than {} characters",
                MAX_LANGUAGE_LEN
            )));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::Validation(format!(
                "Title longer than {} characters",
                MAX_TITLE_LEN
            )));
        }
        if let Some(image) = &self.image {
            if image.as_str().chars().count() > MAX_IMAGE_LEN {
                return Err(Error::Validation(format!(
                    "Image reference longer than {} characters",
                    MAX_IMAGE_LEN
                )));
            }
        }
        Ok(self)
    }
}

/// Trim hostnames, drop blanks and duplicates, keep first-seen order.
pub fn normalize_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for domain in domains {
        let domain = domain.as_ref().trim();
        if !domain.is_empty() && !out.iter().any(|d| d == domain) {
            out.push(domain.to_string());
        }
    }
    out
}
