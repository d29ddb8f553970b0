//! Page rendering pipeline
//!
//! [`PageRenderer::run`] fetches the preview payload, validates it, and
//! renders the five page regions onto a [`Surface`]. Any failure on the way
//! is logged with its [`FailureKind`] and the whole body is replaced with the
//! configured error markup; nothing partially rendered survives.

mod sections;

use crate::config::RenderConfig;
use crate::error::{FailureKind, RenderError, Result};
use crate::preview::{first_record, PreviewRecord};
use crate::sanitize::HtmlSanitizer;
use crate::source::PreviewSource;
use crate::surface::{NodeId, Surface};
use tracing::{debug, error, info};

/// What a render pass ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The landing page was rendered from this record
    Rendered(Box<PreviewRecord>),
    /// The body was replaced with the error markup
    Failed(FailureKind),
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered(_))
    }

    pub fn record(&self) -> Option<&PreviewRecord> {
        match self {
            RenderOutcome::Rendered(record) => Some(record),
            RenderOutcome::Failed(_) => None,
        }
    }
}

/// Renders a preview record onto a surface
pub struct PageRenderer {
    config: RenderConfig,
    sanitizer: HtmlSanitizer,
}

impl PageRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let sanitizer = HtmlSanitizer::new(config.html_policy);
        Self { config, sanitizer }
    }

    /// Fetch, validate, and render; failures become the error page
    pub async fn run<S: Surface + ?Sized>(
        &self,
        source: &dyn PreviewSource,
        surface: &mut S,
    ) -> RenderOutcome {
        match self.try_run(source, surface).await {
            Ok(record) => {
                info!(title = %record.title(), "rendered landing page");
                RenderOutcome::Rendered(Box::new(record))
            }
            Err(e) => {
                let kind = e.failure_kind();
                error!(kind = %kind, source = %source.describe(), error = %e, "failed to render preview");
                surface.replace_body(&self.config.error_html);
                RenderOutcome::Failed(kind)
            }
        }
    }

    async fn try_run<S: Surface + ?Sized>(
        &self,
        source: &dyn PreviewSource,
        surface: &mut S,
    ) -> Result<PreviewRecord> {
        debug!(source = %source.describe(), "fetching preview");
        let payload = source.fetch().await?;
        let record = first_record(&payload)?;
        self.render(&record, surface)?;
        Ok(record)
    }

    /// Render an already validated record, in page order
    pub fn render<S: Surface + ?Sized>(&self, record: &PreviewRecord, surface: &mut S) -> Result<()> {
        let ids = &self.config.elements;

        let title = require(surface, &ids.title)?;
        surface.set_text(title, &record.title())?;

        let content = require(surface, &ids.content)?;
        surface.set_inner_html(content, &self.sanitizer.prepare(&record.content))?;

        if let Some(table) = &record.comparison_table {
            let node = sections::comparison_table(surface, table)?;
            surface.append_child(content, node)?;
        }

        let faq = require(surface, &ids.faq)?;
        for entry in &record.faq {
            let item = sections::accordion_item(surface, &self.sanitizer, entry)?;
            surface.append_child(faq, item)?;
        }

        let blogs = require(surface, &ids.blogs)?;
        for (idx, idea) in record.blog_ideas.iter().enumerate() {
            let card = sections::card_link(
                surface,
                &self.sanitizer,
                &self.config.links.blog_href(idx),
                &idea.title,
                &idea.meta,
            )?;
            surface.append_child(blogs, card)?;
        }

        let uses = require(surface, &ids.uses)?;
        for (idx, use_case) in record.use_cases.iter().enumerate() {
            let card = sections::card_link(
                surface,
                &self.sanitizer,
                &self.config.links.use_case_href(idx),
                &use_case.name,
                &use_case.description,
            )?;
            surface.append_child(uses, card)?;
        }

        debug!(
            faq = record.faq.len(),
            blogs = record.blog_ideas.len(),
            uses = record.use_cases.len(),
            table = record.comparison_table.is_some(),
            "rendered sections"
        );
        Ok(())
    }
}

fn require<S: Surface + ?Sized>(surface: &S, id: &str) -> Result<NodeId> {
    surface.element_by_id(id).ok_or_else(|| {
        RenderError::MissingElement {
            id: id.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests;
