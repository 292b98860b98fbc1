//! DOM Tree (arena-based allocation)
//!
//! `Dom` owns every logical node and the matchable tree behind them.
//! Nodes are never freed individually; a detached node stays in the arena
//! as a parentless root until the `Dom` is dropped.

use hnode_html::escape::needs_escaping;
use hnode_html::ParseOptions;

use crate::attributes::Attr;
use crate::mirror::{MirrorId, MirrorKind, MirrorTree};
use crate::node::{ElementData, Node, NodeData, NodeType};
use crate::{DomError, DomResult, NodeId};

/// Arena holding the logical tree and its matchable mirror
#[derive(Debug, Default)]
pub struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) mirror: MirrorTree,
    pub(crate) options: ParseOptions,
}

impl Dom {
    /// Create an empty arena with default parse options
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            nodes: Vec::new(),
            mirror: MirrorTree::new(),
            options,
        }
    }

    /// Options used by [`parse`](Self::parse) and [`set_inner_html`](Self::set_inner_html)
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Number of nodes ever allocated in this arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a logical node together with its mirror
    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let kind = match &data {
            NodeData::Document => MirrorKind::Document,
            NodeData::Element(element) => MirrorKind::Element {
                name: element.tag.clone(),
                attrs: element
                    .attrs
                    .iter()
                    .map(|attr| (attr.name.clone(), attr.value.clone()))
                    .collect(),
            },
            NodeData::Text(_) => MirrorKind::Text,
            NodeData::Doctype { .. } => MirrorKind::Doctype,
            NodeData::Other { .. } => MirrorKind::Other,
        };
        let mirror = self.mirror.create(kind);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data, mirror));
        id
    }

    /// Create an empty document node
    pub fn create_document(&mut self) -> NodeId {
        self.alloc(NodeData::Document)
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        if tag.is_empty() || needs_escaping(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }
        Ok(self.alloc(NodeData::Element(ElementData::new(tag))))
    }

    /// Create a detached text node
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a node by ID
    ///
    /// Panics if `id` was not minted by this arena. Use [`Dom::get`] for
    /// handles of unknown origin.
    pub fn node(&self, id: NodeId) -> &Node {
        debug_assert!(
            id.index() < self.nodes.len(),
            "node {} does not belong to this arena of {} nodes",
            id.0,
            self.nodes.len()
        );
        &self.nodes[id.index()]
    }

    pub(crate) fn mirror_of(&self, id: NodeId) -> MirrorId {
        self.node(id).mirror
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type()
    }

    /// Tag name for elements, empty for other nodes
    pub fn tag_name(&self, id: NodeId) -> &str {
        self.node(id).tag_name()
    }

    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn child_node(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id).children.get(index).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    /// Attribute value; `None` when absent or when `id` is not an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).as_element()?.attrs.get(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Attributes in store order (empty for non-elements)
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = &Attr> {
        self.node(id).as_element().into_iter().flat_map(|e| e.attrs.iter())
    }

    /// Visit every descendant of `id` in document order, excluding `id`
    pub fn traverse<F: FnMut(NodeId)>(&self, id: NodeId, mut visit: F) {
        self.traverse_inner(id, &mut visit);
    }

    fn traverse_inner<F: FnMut(NodeId)>(&self, id: NodeId, visit: &mut F) {
        for &child in &self.node(id).children {
            visit(child);
            self.traverse_inner(child, visit);
        }
    }

    /// Descendants of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.traverse(id, |node| found.push(node));
        found
    }

    /// Check that the mirror of `root`'s subtree matches the logical tree
    pub fn is_synchronized(&self, root: NodeId) -> bool {
        self.children_synchronized(root)
            && self
                .node(root)
                .children
                .iter()
                .all(|&child| self.is_synchronized(child))
    }

    /// Check one level: `id`'s mirror children equal its logical children
    pub(crate) fn children_synchronized(&self, id: NodeId) -> bool {
        let node = self.node(id);
        let parent_mirror = self.mirror.get(node.mirror);
        let expected: Vec<MirrorId> = node.children.iter().map(|&c| self.mirror_of(c)).collect();

        if self.mirror.children(node.mirror).ne(expected.iter().copied()) {
            return false;
        }
        if parent_mirror.first_child != expected.first().copied().unwrap_or(MirrorId::NONE)
            || parent_mirror.last_child != expected.last().copied().unwrap_or(MirrorId::NONE)
        {
            return false;
        }

        let mut prev = MirrorId::NONE;
        for (&child, &child_mirror) in node.children.iter().zip(&expected) {
            let linked = self.mirror.get(child_mirror);
            if self.node(child).parent != Some(id) || linked.parent != node.mirror || linked.prev_sibling != prev {
                return false;
            }
            prev = child_mirror;
        }
        true
    }
}
