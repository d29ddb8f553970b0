//! # convpage Core
//!
//! Core library for convpage - renders converter landing pages from a
//! `preview.json` payload.
//!
//! A render fetches the payload from a [`PreviewSource`], validates its first
//! record, and builds the page regions (title, content, comparison table, FAQ
//! accordion, blog and use-case cards) on a [`Surface`]. Failures at any step
//! replace the page body with a fixed error message.

// Core modules
pub mod config;
pub mod error;
pub mod preview;
pub mod render;
pub mod sanitize;
pub mod shell;
pub mod source;
pub mod surface;

// Re-export commonly used types
pub use config::{ElementIds, HtmlPolicy, LinkPatterns, PageMeta, RenderConfig};
pub use error::{Error, FailureKind, Result};
pub use preview::PreviewRecord;
pub use render::{PageRenderer, RenderOutcome};
pub use shell::PageShell;
pub use source::{FileSource, HttpSource, PreviewSource, StaticSource};
pub use surface::{MemoryDocument, NodeId, Surface};

/// Current version of the convpage-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
///
/// `RUST_LOG` wins when set; otherwise `debug` selects the level. Logs go to
/// stderr so rendered output on stdout stays clean.
pub fn init_tracing(debug: bool, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if debug { "debug" } else { "info" })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
