//! Document tree
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Handles are
//! stable for the lifetime of the document; nodes are never removed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::capabilities::Capabilities;
use crate::error::DomError;
use crate::event::Registration;
use crate::Result;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a document, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(u64);

/// Handle to a node inside one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeData {
    Root,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ElementData {
    pub(crate) name: String,
    pub(crate) attrs: Vec<(String, String)>,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

pub struct Document {
    id: DocumentId,
    pub(crate) nodes: Vec<Node>,
    focused: Option<NodeId>,
    capabilities: Capabilities,
    pub(crate) listeners: HashMap<NodeId, Vec<Registration>>,
}

impl Document {
    /// Create an empty document containing only the root node
    pub fn new() -> Self {
        Self {
            id: DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed)),
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
            focused: None,
            capabilities: Capabilities::default(),
            listeners: HashMap::new(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    // === Construction ===

    /// Append a new element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        self.append(
            parent,
            NodeData::Element(ElementData {
                name: name.to_ascii_lowercase(),
                attrs: Vec::new(),
            }),
        )
    }

    /// Append a text node as the last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.append(parent, NodeData::Text(text.to_string()))
    }

    pub(crate) fn append(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId> {
        self.node(parent)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    // === Node access ===

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn element(&self, id: NodeId) -> Result<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.data) {
            Some(NodeData::Element(element)) => Ok(element),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::NodeNotFound(id)),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_ok()
    }

    /// Lowercase tag name, `None` for non-element nodes
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|element| element.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.is_element(*child))
    }

    /// Ancestors from the parent up to (and including) the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.parent(id),
        }
    }

    /// True when `ancestor` is a strict ancestor of `id`
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|node| node == ancestor)
    }

    /// All descendants of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| match &self.nodes[node.0].data {
                NodeData::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // === Attributes ===

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|element| element.attr(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute, keeping its original position when it already exists
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(id)?;
        match element.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => {
                if existing != value {
                    *existing = value.to_string();
                }
            }
            None => element.attrs.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.element_mut(id)?.attrs.retain(|(key, _)| key != name);
        Ok(())
    }

    /// The element's `id` attribute
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id")
    }

    // === Class list ===

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attribute(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let mut classes: Vec<&str> = self.classes(id).collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attribute(id, "class", &joined)
    }

    /// Remove every occurrence of `class`; the attribute is dropped when it
    /// ends up empty
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        self.element(id)?;
        if !self.has_class(id, class) {
            return Ok(());
        }
        let remaining: Vec<&str> = self.classes(id).filter(|c| *c != class).collect();
        if remaining.is_empty() {
            self.remove_attribute(id, "class")
        } else {
            let joined = remaining.join(" ");
            self.set_attribute(id, "class", &joined)
        }
    }

    // === Queries ===

    fn elements_where<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        self.descendants(self.root())
            .into_iter()
            .filter(|node| matches!(&self.nodes[node.0].data, NodeData::Element(e) if predicate(e)))
            .collect()
    }

    /// Elements carrying `class`, in document order
    pub fn elements_by_class_name(&self, class: &str) -> Vec<NodeId> {
        self.elements_where(|element| {
            element
                .attr("class")
                .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
        })
    }

    /// Descendant elements of `scope` with the given tag, in document order
    pub fn elements_by_tag_name(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| {
                self.tag_name(*node)
                    .is_some_and(|name| name.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    /// First element in document order whose `id` equals `value`
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        if value.is_empty() {
            return None;
        }
        self.descendants(self.root())
            .into_iter()
            .find(|node| self.element_id(*node) == Some(value))
    }

    // === Focus ===

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, id: NodeId) -> Result<()> {
        self.element(id)?;
        if self.focused != Some(id) {
            tracing::trace!(node = %id, "Focus moved");
        }
        self.focused = Some(id);
        Ok(())
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("nodes", &self.nodes.len())
            .field("focused", &self.focused)
            .field("capabilities", &self.capabilities)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}
