//! CLI command implementations

pub mod render;
pub mod validate;

pub use render::{render_command, RenderOptions};
pub use validate::validate_command;
