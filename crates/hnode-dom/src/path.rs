//! Path resolution
//!
//! A mirror node is mapped back to its logical owner by position: climb
//! from the mirror node to the query root recording sibling indices, then
//! replay the indices downward through the logical tree.

use crate::mirror::MirrorId;
use crate::{Dom, DomError, DomResult, NodeId};

impl Dom {
    /// Child-index path from `ancestor` down to `descendant`
    ///
    /// The empty path means the two are the same node.
    pub(crate) fn relation(&self, ancestor: MirrorId, descendant: MirrorId) -> DomResult<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = descendant;

        while current != ancestor {
            let parent = self.mirror.get(current).parent;
            if !parent.is_valid() {
                tracing::error!(?ancestor, ?descendant, "matched node lies outside the query root");
                return Err(DomError::NotADescendant);
            }
            let index = self
                .mirror
                .children(parent)
                .position(|child| child == current)
                .ok_or(DomError::NotADescendant)?;
            path.push(index);
            current = parent;
        }

        path.reverse();
        Ok(path)
    }

    /// Logical node owning the mirror node `found` under `root`
    pub(crate) fn resolve(&self, root: NodeId, found: MirrorId) -> DomResult<NodeId> {
        let path = self.relation(self.mirror_of(root), found)?;

        let mut current = root;
        for index in path {
            current = self.child_node(current, index).ok_or_else(|| {
                tracing::error!(node = current.0, index, "logical tree has no child at index");
                DomError::NotADescendant
            })?;
        }
        Ok(current)
    }
}
