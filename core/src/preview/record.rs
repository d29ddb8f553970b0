//! Preview record data model

use serde::{Deserialize, Serialize};

/// The single record driving the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRecord {
    /// Source format of the advertised converter
    pub format_1: String,

    /// Target format of the advertised converter
    pub format_2: String,

    /// Landing page body markup
    pub content: String,

    /// Optional comparison table appended after the content
    #[serde(default)]
    pub comparison_table: Option<ComparisonTable>,

    pub faq: Vec<FaqEntry>,

    pub blog_ideas: Vec<BlogIdea>,

    pub use_cases: Vec<UseCase>,

    /// Canonical URL of the landing page, if the pipeline recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_primary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_secondary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    /// Answer markup
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogIdea {
    pub title: String,
    pub meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub name: String,
    pub description: String,
}

impl PreviewRecord {
    /// Page heading, e.g. `CSV → JSON converter`
    pub fn title(&self) -> String {
        format!(
            "{} \u{2192} {} converter",
            self.format_1.to_uppercase(),
            self.format_2.to_uppercase()
        )
    }
}
