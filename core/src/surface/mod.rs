//! Renderable surface abstraction
//!
//! The renderer never reaches for ambient page state. It receives a
//! [`Surface`] and builds everything through it, which lets the same pipeline
//! drive an in-memory document (static output, tests) or any other host.

pub mod document;

pub use document::MemoryDocument;

use crate::error::Result;
use std::fmt;

/// Handle to a node owned by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element lookup, node construction, and content setters
pub trait Surface {
    /// Find an attached element by its `id` attribute
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Set an attribute; `id` makes the element findable once attached
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    /// Add a class to the element's class list
    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    /// Replace the element's children with a text node
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()>;

    /// Replace the element's children with raw markup
    fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<()>;

    /// Append `child` as the last child of `parent`, detaching it first
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Clicking `trigger` toggles `class` on `target`
    fn on_click_toggle_class(&mut self, trigger: NodeId, target: NodeId, class: &str)
        -> Result<()>;

    /// Replace the whole visible body with raw markup
    fn replace_body(&mut self, markup: &str);
}
