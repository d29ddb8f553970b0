//! Render command: build the landing page and write it out

use crate::config::CliConfigLoader;
use anyhow::{anyhow, Context, Result};
use convpage_core::{source, MemoryDocument, PageRenderer, PageShell, RenderOutcome};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Flags of the render command
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Exit non-zero when the error page was produced
    pub fail_on_error: bool,
    /// Write the page to stdout instead of the output file
    pub stdout: bool,
}

/// Render the landing page from the configured preview location
pub async fn render_command(loader: CliConfigLoader, options: RenderOptions) -> Result<()> {
    let config = loader.load().await?;
    let page_dir = config.page_dir();
    debug!(
        source = %config.render.source,
        output = %config.output.display(),
        policy = %config.render.html_policy,
        "resolved configuration"
    );

    let preview = source::from_config(&config.render, &page_dir)?;
    let mut document = MemoryDocument::landing_page(&config.render.elements)?;
    let renderer = PageRenderer::new(config.render.clone());
    let outcome = renderer.run(preview.as_ref(), &mut document).await;

    let shell = PageShell::new(config.render.page.clone())?;
    let html = shell.render(&document, &outcome, &config.page_name())?;

    if options.stdout {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(html.as_bytes()).await?;
        stdout.flush().await?;
    } else {
        if let Some(parent) = config.output.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        tokio::fs::write(&config.output, &html)
            .await
            .with_context(|| format!("Failed to write page: {}", config.output.display()))?;
        info!(output = %config.output.display(), bytes = html.len(), "wrote page");
    }

    match &outcome {
        RenderOutcome::Rendered(_) => Ok(()),
        RenderOutcome::Failed(kind) if options.fail_on_error => {
            Err(anyhow!("rendering failed ({} error)", kind))
        }
        RenderOutcome::Failed(kind) => {
            warn!(kind = %kind, "wrote error page");
            Ok(())
        }
    }
}
