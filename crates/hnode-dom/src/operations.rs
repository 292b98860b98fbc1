//! DOM Operations
//!
//! Structural and attribute mutations. Each one changes the logical node
//! and its mirror together, so a query issued right after sees the change.

use hnode_html::HtmlError;
use hnode_select::SelectorError;
use thiserror::Error;

use crate::mirror::MirrorId;
use crate::node::NodeType;
use crate::{Dom, NodeId};

/// DOM operation errors
#[derive(Debug, Error)]
pub enum DomError {
    #[error("invalid attribute name {0:?}")]
    InvalidAttributeName(String),

    #[error("invalid tag name {0:?}")]
    InvalidTagName(String),

    #[error("node is already attached to a parent")]
    AlreadyAttached,

    #[error("node cannot be inserted at this position")]
    HierarchyRequest,

    #[error("{operation} is not supported on {node_type} nodes")]
    UnsupportedNodeType {
        operation: &'static str,
        node_type: NodeType,
    },

    #[error("matched node is not a descendant of the query root")]
    NotADescendant,

    #[error("invalid selector: {0}")]
    InvalidSelector(#[from] SelectorError),

    #[error("malformed markup: {0}")]
    MalformedMarkup(#[source] HtmlError),

    #[error("failed to parse document: {0}")]
    Parse(#[source] HtmlError),
}

pub type DomResult<T> = Result<T, DomError>;

impl Dom {
    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent);
        if !parent_node.is_container() {
            return Err(DomError::UnsupportedNodeType {
                operation: "append_child",
                node_type: parent_node.node_type(),
            });
        }
        if self.node(child).parent.is_some() {
            return Err(DomError::AlreadyAttached);
        }
        if self.node_type(child) == NodeType::Document || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.set_parent(child, Some(parent))?;
        self.nodes[parent.index()].children.push(child);
        let (parent_mirror, child_mirror) = (self.mirror_of(parent), self.mirror_of(child));
        self.mirror.append(parent_mirror, child_mirror);

        tracing::trace!(parent = parent.0, child = child.0, "append_child");
        debug_assert!(self.children_synchronized(parent));
        Ok(())
    }

    /// Remove `child` from `parent`'s children
    ///
    /// Returns `false` without changing anything when `child` is not a child
    /// of `parent`. The removed node stays in the arena, detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let siblings = &self.node(parent).children;
        let Some(index) = siblings.iter().position(|&c| c == child) else {
            return false;
        };

        let prev = match index.checked_sub(1) {
            Some(i) => self.mirror_of(siblings[i]),
            None => MirrorId::NONE,
        };
        let next = siblings
            .get(index + 1)
            .map_or(MirrorId::NONE, |&c| self.mirror_of(c));

        self.clear_parent(child);
        self.nodes[parent.index()].children.remove(index);
        self.mirror.join(prev, next);

        let siblings = &self.node(parent).children;
        let first = siblings.first().map_or(MirrorId::NONE, |&c| self.mirror_of(c));
        let last = siblings.last().map_or(MirrorId::NONE, |&c| self.mirror_of(c));
        let parent_mirror = self.mirror_of(parent);
        self.mirror.set_children_bounds(parent_mirror, first, last);

        tracing::trace!(parent = parent.0, child = child.0, index, "remove_child");
        debug_assert!(self.children_synchronized(parent));
        true
    }

    /// Remove `node` from its parent, if it has one
    pub fn detach(&mut self, node: NodeId) -> bool {
        match self.node(node).parent {
            Some(parent) => self.remove_child(parent, node),
            None => false,
        }
    }

    /// Set or clear the parent link of `node` and its mirror
    ///
    /// Sibling lists are left to the caller. Setting the parent a node
    /// already has is a no-op; setting a different one fails.
    pub(crate) fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> DomResult<()> {
        let Some(parent) = parent else {
            self.clear_parent(node);
            return Ok(());
        };
        match self.node(node).parent {
            Some(existing) if existing == parent => Ok(()),
            Some(_) => Err(DomError::AlreadyAttached),
            None => {
                self.nodes[node.index()].parent = Some(parent);
                let parent_mirror = self.mirror_of(parent);
                let node_mirror = self.mirror_of(node);
                self.mirror.get_mut(node_mirror).parent = parent_mirror;
                Ok(())
            }
        }
    }

    pub(crate) fn clear_parent(&mut self, node: NodeId) {
        self.nodes[node.index()].parent = None;
        let mirror = self.mirror_of(node);
        self.mirror.sever(mirror);
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let mirror = self.mirror_of(id);
        let node = &mut self.nodes[id.index()];
        let node_type = node.node_type();
        let element = node.as_element_mut().ok_or(DomError::UnsupportedNodeType {
            operation: "set_attribute",
            node_type,
        })?;

        let existed = element.attrs.contains(name);
        let index = element.attrs.set(name, value)?;

        if let Some(attrs) = self.mirror.attrs_mut(mirror) {
            if existed {
                attrs[index].1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }

        tracing::trace!(node = id.0, name, "set_attribute");
        Ok(())
    }

    /// Remove an attribute from an element; absent names are a no-op
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        let mirror = self.mirror_of(id);
        let node = &mut self.nodes[id.index()];
        let node_type = node.node_type();
        let element = node.as_element_mut().ok_or(DomError::UnsupportedNodeType {
            operation: "remove_attribute",
            node_type,
        })?;

        if let Some((index, _)) = element.attrs.remove(name) {
            if let Some(attrs) = self.mirror.attrs_mut(mirror) {
                attrs.remove(index);
            }
            tracing::trace!(node = id.0, name, "remove_attribute");
        }
        Ok(())
    }
}
