//! Minimal configuration module for convpage core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{
    ElementIds, HtmlPolicy, LinkPatterns, PageMeta, RenderConfig, DEFAULT_ERROR_HTML,
    DEFAULT_SOURCE,
};
