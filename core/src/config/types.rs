//! Resolved configuration types for convpage core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default location of the preview resource, relative to the rendered page
pub const DEFAULT_SOURCE: &str = "../preview.json";

/// Default message shown when the page cannot be rendered
pub const DEFAULT_ERROR_HTML: &str = r#"<p style="color:red">Error loading preview.json</p>"#;

/// How HTML-bearing record fields are injected into the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlPolicy {
    /// Allow-list sanitize before injection
    #[default]
    Sanitize,
    /// Inject verbatim; the upstream pipeline is trusted
    Trust,
    /// Render as escaped text
    Escape,
}

impl HtmlPolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            HtmlPolicy::Sanitize => "sanitize",
            HtmlPolicy::Trust => "trust",
            HtmlPolicy::Escape => "escape",
        }
    }
}

impl std::fmt::Display for HtmlPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HtmlPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sanitize" => Ok(HtmlPolicy::Sanitize),
            "trust" => Ok(HtmlPolicy::Trust),
            "escape" => Ok(HtmlPolicy::Escape),
            _ => Err(ConfigError::InvalidValue {
                field: "html_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Identifiers of the host elements the renderer writes into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub title: String,
    pub content: String,
    pub faq: String,
    pub blogs: String,
    pub uses: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            title: "page-title".to_string(),
            content: "landing-content".to_string(),
            faq: "faq".to_string(),
            blogs: "blogs".to_string(),
            uses: "uses".to_string(),
        }
    }
}

impl ElementIds {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("elements.title", self.title.as_str()),
            ("elements.content", self.content.as_str()),
            ("elements.faq", self.faq.as_str()),
            ("elements.blogs", self.blogs.as_str()),
            ("elements.uses", self.uses.as_str()),
        ]
        .into_iter()
    }
}

/// Link target patterns for the card sections; `{n}` is the 1-based index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPatterns {
    pub blog: String,
    pub use_case: String,
}

impl Default for LinkPatterns {
    fn default() -> Self {
        Self {
            blog: "blog_{n}.html".to_string(),
            use_case: "use_{n}.html".to_string(),
        }
    }
}

impl LinkPatterns {
    /// Link target of the blog card at `index` (0-based)
    pub fn blog_href(&self, index: usize) -> String {
        self.blog.replace("{n}", &(index + 1).to_string())
    }

    /// Link target of the use-case card at `index` (0-based)
    pub fn use_case_href(&self, index: usize) -> String {
        self.use_case.replace("{n}", &(index + 1).to_string())
    }
}

/// Head metadata for the page shell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    /// Meta description; falls back to the record's primary keyword
    pub description: Option<String>,
    /// Base URL used to build the canonical link
    pub canonical_base: Option<String>,
    /// Stylesheet hrefs, in order
    pub stylesheets: Vec<String>,
    /// HTML `lang` attribute
    pub lang: Option<String>,
}

/// A fully resolved render configuration ready for use by core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Preview location (path or URL), possibly relative
    pub source: String,
    /// Base URL relative locations are joined onto
    #[serde(default)]
    pub base_url: Option<String>,
    /// HTTP request timeout in seconds; none waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub html_policy: HtmlPolicy,
    #[serde(default)]
    pub elements: ElementIds,
    #[serde(default)]
    pub links: LinkPatterns,
    /// Markup that replaces the body when rendering fails
    pub error_html: String,
    #[serde(default)]
    pub page: PageMeta,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            base_url: None,
            timeout_secs: None,
            html_policy: HtmlPolicy::default(),
            elements: ElementIds::default(),
            links: LinkPatterns::default(),
            error_html: DEFAULT_ERROR_HTML.to_string(),
            page: PageMeta::default(),
        }
    }
}

impl RenderConfig {
    /// Set the preview location
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }

    /// Set the HTML policy
    pub fn with_html_policy(mut self, policy: HtmlPolicy) -> Self {
        self.html_policy = policy;
        self
    }

    /// Set the base URL
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source".to_string(),
            });
        }

        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "base_url".to_string(),
                    value: base_url.clone(),
                });
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }

        for (field, id) in self.elements.iter() {
            if id.is_empty() || id.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: id.to_string(),
                });
            }
        }

        if !self.links.blog.contains("{n}") {
            return Err(ConfigError::InvalidValue {
                field: "links.blog".to_string(),
                value: self.links.blog.clone(),
            });
        }
        if !self.links.use_case.contains("{n}") {
            return Err(ConfigError::InvalidValue {
                field: "links.use_case".to_string(),
                value: self.links.use_case.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source, "../preview.json");
        assert_eq!(config.html_policy, HtmlPolicy::Sanitize);
    }

    #[test]
    fn test_link_patterns_are_one_based() {
        let links = LinkPatterns::default();
        assert_eq!(links.blog_href(0), "blog_1.html");
        assert_eq!(links.use_case_href(2), "use_3.html");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = RenderConfig::default().with_base_url("ftp://example.com");
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.elements.faq = "f a q".to_string();
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.links.blog = "blog.html".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_html_policy_from_str() {
        assert_eq!("Trust".parse::<HtmlPolicy>().unwrap(), HtmlPolicy::Trust);
        assert!("yolo".parse::<HtmlPolicy>().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let json = r#"{
            "source": "data/preview.json",
            "error_html": "<p>oops</p>",
            "elements": { "faq": "questions" }
        }"#;
        let config: RenderConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.elements.faq, "questions");
        assert_eq!(config.elements.title, "page-title");
        assert_eq!(config.links, LinkPatterns::default());
    }
}
