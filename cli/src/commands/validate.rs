//! Validate command: check the preview payload without rendering

use crate::config::CliConfigLoader;
use anyhow::{anyhow, Result};
use convpage_core::preview::first_record;
use convpage_core::source;
use tracing::info;

/// Fetch the preview payload and report every schema problem
pub async fn validate_command(loader: CliConfigLoader) -> Result<()> {
    let config = loader.load().await?;
    let preview = source::from_config(&config.render, &config.page_dir())?;
    info!(source = %preview.describe(), "validating preview");

    let payload = preview.fetch().await?;
    match first_record(&payload) {
        Ok(record) => {
            println!("✅ {} is valid", preview.describe());
            println!("   Title: {}", record.title());
            println!(
                "   Comparison table: {}",
                match &record.comparison_table {
                    Some(table) => format!("{} rows", table.rows.len()),
                    None => "none".to_string(),
                }
            );
            println!("   FAQ entries: {}", record.faq.len());
            println!("   Blog ideas: {}", record.blog_ideas.len());
            println!("   Use cases: {}", record.use_cases.len());
            Ok(())
        }
        Err(schema) => {
            println!("❌ {} is invalid", preview.describe());
            for issue in &schema.issues {
                println!("   - {}", issue);
            }
            Err(anyhow!(
                "preview payload has {} schema problem(s)",
                schema.issues.len()
            ))
        }
    }
}
