//! Selector queries
//!
//! Selectors run against the matchable tree; each match is resolved back
//! to the logical node occupying the same position under the query root.

use hnode_select::SelectorList;

use crate::{Dom, DomResult, NodeId};

impl Dom {
    /// First node in `root`'s subtree (root included) matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selectors = SelectorList::compile(selector)?;
        self.select_first(root, &selectors)
    }

    /// Every node in `root`'s subtree (root included) matching `selector`,
    /// in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let selectors = SelectorList::compile(selector)?;
        self.select_all(root, &selectors)
    }

    /// Like [`query_selector`](Self::query_selector) with a precompiled list
    pub fn select_first(&self, root: NodeId, selectors: &SelectorList) -> DomResult<Option<NodeId>> {
        match selectors.match_first(&self.mirror, self.mirror_of(root)) {
            Some(found) => self.resolve(root, found).map(Some),
            None => Ok(None),
        }
    }

    pub fn select_all(&self, root: NodeId, selectors: &SelectorList) -> DomResult<Vec<NodeId>> {
        selectors
            .match_all(&self.mirror, self.mirror_of(root))
            .into_iter()
            .map(|found| self.resolve(root, found))
            .collect()
    }

    /// Whether `node` itself matches `selector`
    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        let selectors = SelectorList::compile(selector)?;
        Ok(selectors.matches(&self.mirror, self.mirror_of(node)))
    }
}
