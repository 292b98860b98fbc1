//! Matchable tree
//!
//! Compact linked nodes the selector engine walks. Each logical node owns
//! exactly one mirror node; the mirror carries only links, the tag name and
//! a copy of the attribute list in store order. Mirror nodes know nothing
//! about the logical node that owns them.

use hnode_select::SelectorTree;

/// Mirror node identifier (index into the mirror arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MirrorId(u32);

impl MirrorId {
    /// Invalid/null link
    pub const NONE: MirrorId = MirrorId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn to_option(self) -> Option<MirrorId> {
        self.is_valid().then_some(self)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum MirrorKind {
    Document,
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text,
    Doctype,
    Other,
}

/// Mirror node: links use [`MirrorId::NONE`] for "no node"
#[derive(Debug, Clone)]
pub(crate) struct MirrorNode {
    pub parent: MirrorId,
    pub first_child: MirrorId,
    /// Last child (for O(1) append)
    pub last_child: MirrorId,
    pub prev_sibling: MirrorId,
    pub next_sibling: MirrorId,
    pub kind: MirrorKind,
}

/// Arena-based matchable tree
#[derive(Debug, Default)]
pub(crate) struct MirrorTree {
    nodes: Vec<MirrorNode>,
}

impl MirrorTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn create(&mut self, kind: MirrorKind) -> MirrorId {
        let id = MirrorId(self.nodes.len() as u32);
        self.nodes.push(MirrorNode {
            parent: MirrorId::NONE,
            first_child: MirrorId::NONE,
            last_child: MirrorId::NONE,
            prev_sibling: MirrorId::NONE,
            next_sibling: MirrorId::NONE,
            kind,
        });
        id
    }

    pub fn get(&self, id: MirrorId) -> &MirrorNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: MirrorId) -> &mut MirrorNode {
        &mut self.nodes[id.index()]
    }

    /// Link `child` as the new last child of `parent`
    pub fn append(&mut self, parent: MirrorId, child: MirrorId) {
        let last = self.get(parent).last_child;

        let node = self.get_mut(child);
        node.parent = parent;
        node.prev_sibling = last;
        node.next_sibling = MirrorId::NONE;

        if last.is_valid() {
            self.get_mut(last).next_sibling = child;
        } else {
            self.get_mut(parent).first_child = child;
        }
        self.get_mut(parent).last_child = child;
    }

    /// Clear a node's parent and sibling links, leaving its neighbours alone
    pub fn sever(&mut self, id: MirrorId) {
        let node = self.get_mut(id);
        node.parent = MirrorId::NONE;
        node.prev_sibling = MirrorId::NONE;
        node.next_sibling = MirrorId::NONE;
    }

    /// Make `prev` and `next` adjacent siblings; either may be NONE
    pub fn join(&mut self, prev: MirrorId, next: MirrorId) {
        if prev.is_valid() {
            self.get_mut(prev).next_sibling = next;
        }
        if next.is_valid() {
            self.get_mut(next).prev_sibling = prev;
        }
    }

    pub fn set_children_bounds(&mut self, parent: MirrorId, first: MirrorId, last: MirrorId) {
        let node = self.get_mut(parent);
        node.first_child = first;
        node.last_child = last;
    }

    pub fn attrs_mut(&mut self, id: MirrorId) -> Option<&mut Vec<(String, String)>> {
        match &mut self.get_mut(id).kind {
            MirrorKind::Element { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Children in link order, walking next-sibling pointers
    pub fn children(&self, parent: MirrorId) -> MirrorChildren<'_> {
        MirrorChildren {
            tree: self,
            current: self.get(parent).first_child,
        }
    }
}

pub(crate) struct MirrorChildren<'a> {
    tree: &'a MirrorTree,
    current: MirrorId,
}

impl Iterator for MirrorChildren<'_> {
    type Item = MirrorId;

    fn next(&mut self) -> Option<MirrorId> {
        let id = self.current.to_option()?;
        self.current = self.tree.get(id).next_sibling;
        Some(id)
    }
}

impl SelectorTree for MirrorTree {
    type Handle = MirrorId;

    fn parent(&self, node: MirrorId) -> Option<MirrorId> {
        self.get(node).parent.to_option()
    }

    fn first_child(&self, node: MirrorId) -> Option<MirrorId> {
        self.get(node).first_child.to_option()
    }

    fn prev_sibling(&self, node: MirrorId) -> Option<MirrorId> {
        self.get(node).prev_sibling.to_option()
    }

    fn next_sibling(&self, node: MirrorId) -> Option<MirrorId> {
        self.get(node).next_sibling.to_option()
    }

    fn local_name(&self, node: MirrorId) -> Option<&str> {
        match &self.get(node).kind {
            MirrorKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn attribute(&self, node: MirrorId, name: &str) -> Option<&str> {
        match &self.get(node).kind {
            MirrorKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key.as_str() == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    fn is_document(&self, node: MirrorId) -> bool {
        matches!(self.get(node).kind, MirrorKind::Document)
    }
}
