//! DOM Node
//!
//! Logical node: what callers read. Fields are crate-private so every
//! change goes through [`Dom`](crate::Dom), which keeps the mirror in step.

use std::fmt;

use crate::attributes::AttributeStore;
use crate::mirror::MirrorId;
use crate::NodeId;

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Doctype,
    /// Anything else the parser produced (comments, processing instructions)
    Other,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::Element => "element",
            Self::Text => "text",
            Self::Doctype => "doctype",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// DOCTYPE
    Doctype { name: String },
    /// Inert node of some other kind
    Other { kind: String },
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    pub(crate) tag: String,
    pub(crate) attrs: AttributeStore,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: AttributeStore::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> &AttributeStore {
        &self.attrs
    }
}

/// DOM Node
#[derive(Debug)]
pub struct Node {
    /// Parent node (None if root or detached)
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Counterpart in the matchable tree
    pub(crate) mirror: MirrorId,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData, mirror: MirrorId) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            mirror,
            data,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match &self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Doctype { .. } => NodeType::Doctype,
            NodeData::Other { .. } => NodeType::Other,
        }
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node may hold children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Tag name for elements, empty otherwise
    pub fn tag_name(&self) -> &str {
        self.as_element().map(ElementData::tag).unwrap_or("")
    }
}
