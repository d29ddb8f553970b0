//! In-memory document implementing [`Surface`]
//!
//! Nodes live in an arena indexed by [`NodeId`]. Raw markup set through
//! `set_inner_html` is stored as an opaque fragment and serialized verbatim;
//! text is escaped on serialization. Click bindings can be exercised with
//! [`MemoryDocument::click`] and are serialized as `data-toggle` attributes
//! that the page shell script wires up in a browser.

use super::{NodeId, Surface};
use crate::config::ElementIds;
use crate::error::{RenderError, Result};
use crate::sanitize::escape_text;
use scraper::Html;
use std::collections::HashMap;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone)]
enum Child {
    Element(NodeId),
    Text(String),
    Markup(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    children: Vec<Child>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
struct ToggleBinding {
    target: NodeId,
    class: String,
}

/// Arena-backed document with a single `<body>` root
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Element>,
    body: NodeId,
    toggles: HashMap<NodeId, Vec<ToggleBinding>>,
}

impl MemoryDocument {
    /// Create a document with an empty body
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            body: NodeId(0),
            toggles: HashMap::new(),
        }
    }

    /// Create the host page the renderer expects: a heading, the content
    /// container, and the three list containers, each under its section.
    pub fn landing_page(ids: &ElementIds) -> Result<Self> {
        let mut doc = Self::new();
        let body = doc.body;

        let header = doc.create_element("header");
        doc.append_child(body, header)?;
        let title = doc.create_element("h1");
        doc.set_attribute(title, "id", &ids.title)?;
        doc.append_child(header, title)?;

        let main = doc.create_element("main");
        doc.add_class(main, "container")?;
        doc.append_child(body, main)?;

        let content = doc.create_element("section");
        doc.set_attribute(content, "id", &ids.content)?;
        doc.append_child(main, content)?;

        for (heading, id) in [
            ("Frequently Asked Questions", &ids.faq),
            ("Related Articles", &ids.blogs),
            ("Professional Use Cases", &ids.uses),
        ] {
            let section = doc.create_element("section");
            doc.add_class(section, "block-section")?;
            doc.append_child(main, section)?;

            let h2 = doc.create_element("h2");
            doc.set_text(h2, heading)?;
            doc.append_child(section, h2)?;

            let container = doc.create_element("div");
            doc.set_attribute(container, "id", id)?;
            doc.append_child(section, container)?;
        }

        Ok(doc)
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Simulate a click on `node`, running its toggle bindings
    pub fn click(&mut self, node: NodeId) -> Result<()> {
        self.element(node)?;
        let bindings = self.toggles.get(&node).cloned().unwrap_or_default();
        for binding in bindings {
            let target = self.element_mut(binding.target)?;
            if let Some(pos) = target.classes.iter().position(|c| *c == binding.class) {
                target.classes.remove(pos);
            } else {
                target.classes.push(binding.class);
            }
        }
        Ok(())
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|e| e.tag.as_str())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let element = self.nodes.get(node.0)?;
        if name == "class" {
            return None;
        }
        element.attribute(name)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    /// Element children of `node`, in order
    pub fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|e| {
                e.children
                    .iter()
                    .filter_map(|c| match c {
                        Child::Element(id) => Some(*id),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attached elements carrying `class`, in tree order
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    /// Attached elements with tag `tag`, in tree order
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.nodes[id.0].tag == tag)
            .collect()
    }

    /// Concatenated text of `node`; markup fragments are parsed and
    /// contribute their decoded text
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(element) = self.nodes.get(node.0) {
            for child in &element.children {
                match child {
                    Child::Element(id) => out.push_str(&self.text_content(*id)),
                    Child::Text(text) => out.push_str(text),
                    Child::Markup(markup) => out.push_str(&markup_text(markup)),
                }
            }
        }
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(element) = self.nodes.get(node.0) {
            for child in &element.children {
                self.write_child(child, &mut out);
            }
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_element(node, &mut out);
        out
    }

    /// Serialized children of `<body>`
    pub fn body_html(&self) -> String {
        self.inner_html(self.body)
    }

    fn element(&self, node: NodeId) -> Result<&Element> {
        self.nodes
            .get(node.0)
            .ok_or_else(|| RenderError::UnknownNode { node: node.0 }.into())
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| RenderError::UnknownNode { node: node.0 }.into())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in self.child_elements(node) {
            out.push(child);
            out.extend(self.descendants(child));
        }
        out
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0]
                .children
                .retain(|c| !matches!(c, Child::Element(id) if *id == node));
        }
    }

    fn replace_children(&mut self, node: NodeId, child: Child) -> Result<()> {
        let old = std::mem::take(&mut self.element_mut(node)?.children);
        for c in old {
            if let Child::Element(id) = c {
                self.nodes[id.0].parent = None;
            }
        }
        self.nodes[node.0].children.push(child);
        Ok(())
    }

    fn write_child(&self, child: &Child, out: &mut String) {
        match child {
            Child::Element(id) => self.write_element(*id, out),
            Child::Text(text) => out.push_str(&escape_text(text)),
            Child::Markup(markup) => out.push_str(markup),
        }
    }

    fn write_element(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.nodes.get(node.0) else {
            return;
        };

        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_text(value)));
        }
        if !element.classes.is_empty() {
            out.push_str(&format!(
                " class=\"{}\"",
                escape_text(&element.classes.join(" "))
            ));
        }
        if let Some(bindings) = self.toggles.get(&node) {
            let pairs: Vec<String> = bindings
                .iter()
                .filter_map(|b| {
                    self.nodes[b.target.0]
                        .attribute("id")
                        .map(|id| format!("{}:{}", id, b.class))
                })
                .collect();
            if !pairs.is_empty() {
                out.push_str(&format!(" data-toggle=\"{}\"", escape_text(&pairs.join(" "))));
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
            return;
        }

        for child in &element.children {
            self.write_child(child, out);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|node| self.nodes[node.0].attribute("id") == Some(id))
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(node)?;
        if name == "class" {
            element.classes = value.split_whitespace().map(str::to_string).collect();
            return Ok(());
        }
        match element.attributes.iter().position(|(key, _)| key == name) {
            Some(pos) => element.attributes[pos].1 = value.to_string(),
            None => element
                .attributes
                .push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let element = self.element_mut(node)?;
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.replace_children(node, Child::Text(text.to_string()))
    }

    fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<()> {
        self.replace_children(node, Child::Markup(markup.to_string()))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.element(parent)?;
        self.element(child)?;
        if child == self.body {
            return Err(RenderError::InvalidAppend {
                message: "the body cannot be appended".to_string(),
            }
            .into());
        }
        if self.is_ancestor(child, parent) {
            return Err(RenderError::InvalidAppend {
                message: format!("{} is an ancestor of {}", child, parent),
            }
            .into());
        }

        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(Child::Element(child));
        Ok(())
    }

    fn on_click_toggle_class(
        &mut self,
        trigger: NodeId,
        target: NodeId,
        class: &str,
    ) -> Result<()> {
        self.element(trigger)?;
        if self.element(target)?.attribute("id").is_none() {
            let anchor = format!("toggle-{}", target.0);
            self.set_attribute(target, "id", &anchor)?;
        }
        self.toggles.entry(trigger).or_default().push(ToggleBinding {
            target,
            class: class.to_string(),
        });
        Ok(())
    }

    fn replace_body(&mut self, markup: &str) {
        self.toggles.clear();
        let body = self.body;
        let old = std::mem::take(&mut self.nodes[body.0].children);
        for c in old {
            if let Child::Element(id) = c {
                self.nodes[id.0].parent = None;
            }
        }
        self.nodes[body.0].children.push(Child::Markup(markup.to_string()));
    }
}

fn markup_text(markup: &str) -> String {
    Html::parse_fragment(markup).root_element().text().collect()
}
