//! hnode selector engine
//!
//! Compiles CSS selector text and matches it against any tree that
//! implements [`SelectorTree`]. The engine only ever sees the tree through
//! that trait, so match results are handles of the traversed tree.
//!
//! ```rust,ignore
//! let list = SelectorList::compile("#list > .item:nth-child(odd)")?;
//! let first = list.match_first(&tree, root);
//! ```

mod parser;
mod selectors;

use std::str::FromStr;

pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, PseudoElement, SelectorComponent, Specificity,
};

/// Read-only traversal surface the matcher walks
///
/// Attribute names are compared exactly. Compiled selectors carry them
/// lowercased, as the HTML parser stores them.
pub trait SelectorTree {
    type Handle: Copy + Eq;

    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;
    fn first_child(&self, node: Self::Handle) -> Option<Self::Handle>;
    fn prev_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;
    fn next_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Tag name for elements, `None` for every other node kind
    fn local_name(&self, node: Self::Handle) -> Option<&str>;

    fn attribute(&self, node: Self::Handle, name: &str) -> Option<&str>;

    fn is_document(&self, node: Self::Handle) -> bool;

    fn is_element(&self, node: Self::Handle) -> bool {
        self.local_name(node).is_some()
    }
}

/// Selector compilation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected end of selector")]
    UnexpectedEnd,

    #[error("unexpected character {ch:?} at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unknown pseudo-class :{0}")]
    UnknownPseudoClass(String),

    #[error("pseudo-element ::{0} cannot match a node")]
    UnsupportedPseudoElement(String),

    #[error("invalid An+B expression {0:?}")]
    InvalidNth(String),

    #[error("combinator without a following selector")]
    DanglingCombinator,
}

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Compile selector text
    pub fn compile(text: &str) -> Result<Self, SelectorError> {
        let selectors = parser::SelectorParser::new(text).parse()?;
        tracing::debug!("Compiled selector {:?} into {} alternatives", text, selectors.len());
        Ok(Self { selectors })
    }

    pub(crate) fn from_selectors(selectors: Vec<ComplexSelector>) -> Self {
        Self { selectors }
    }

    pub fn selectors(&self) -> &[ComplexSelector] {
        &self.selectors
    }

    /// Highest specificity among the alternatives
    pub fn specificity(&self) -> Specificity {
        self.selectors
            .iter()
            .map(ComplexSelector::specificity)
            .max()
            .unwrap_or_default()
    }

    /// Check whether `node` matches any alternative
    pub fn matches<T: SelectorTree>(&self, tree: &T, node: T::Handle) -> bool {
        tree.is_element(node) && self.selectors.iter().any(|sel| sel.matches(tree, node))
    }

    /// First match in `root`'s subtree (root included), in document order
    pub fn match_first<T: SelectorTree>(&self, tree: &T, root: T::Handle) -> Option<T::Handle> {
        let mut current = Some(root);
        while let Some(node) = current {
            if self.matches(tree, node) {
                return Some(node);
            }
            current = next_in_preorder(tree, node, root);
        }
        None
    }

    /// Every match in `root`'s subtree (root included), in document order
    pub fn match_all<T: SelectorTree>(&self, tree: &T, root: T::Handle) -> Vec<T::Handle> {
        let mut found = Vec::new();
        let mut current = Some(root);
        while let Some(node) = current {
            if self.matches(tree, node) {
                found.push(node);
            }
            current = next_in_preorder(tree, node, root);
        }
        found
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

/// Next node after `node` in a preorder walk bounded by `root`
fn next_in_preorder<T: SelectorTree>(tree: &T, node: T::Handle, root: T::Handle) -> Option<T::Handle> {
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    let mut current = node;
    loop {
        if current == root {
            return None;
        }
        if let Some(sibling) = tree.next_sibling(current) {
            return Some(sibling);
        }
        current = tree.parent(current)?;
    }
}
