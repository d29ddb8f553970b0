//! Complete HTML page around a rendered document body

use crate::config::PageMeta;
use crate::error::Result;
use crate::render::RenderOutcome;
use crate::surface::MemoryDocument;
use handlebars::Handlebars;
use serde_json::json;

const PAGE_TEMPLATE: &str = include_str!("page.hbs");
const TEMPLATE_NAME: &str = "page";

/// Wraps a document body with head metadata and the accordion script
pub struct PageShell {
    registry: Handlebars<'static>,
    meta: PageMeta,
}

impl PageShell {
    pub fn new(meta: PageMeta) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, PAGE_TEMPLATE)?;
        Ok(Self { registry, meta })
    }

    /// Render the full page; `page_name` is the output file name used for
    /// the canonical link
    pub fn render(
        &self,
        document: &MemoryDocument,
        outcome: &RenderOutcome,
        page_name: &str,
    ) -> Result<String> {
        let record = outcome.record();

        let title = record.map(|r| r.title()).unwrap_or_else(|| "Error".to_string());
        let description = self
            .meta
            .description
            .clone()
            .or_else(|| record.and_then(|r| r.keyword_primary.clone()));
        let canonical = match &self.meta.canonical_base {
            Some(base) => Some(format!("{}/{}", base.trim_end_matches('/'), page_name)),
            None => record.and_then(|r| r.url.clone()),
        };

        let context = json!({
            "lang": self.meta.lang.as_deref().unwrap_or("en"),
            "title": title,
            "description": description,
            "canonical": canonical,
            "stylesheets": self.meta.stylesheets,
            "version": crate::VERSION,
            "body": document.body_html(),
        });

        Ok(self.registry.render(TEMPLATE_NAME, &context)?)
    }
}
