//! hnode DOM - mutable HTML node tree with selector queries
//!
//! Every logical node owns a node in a parallel matchable tree that the
//! selector engine walks. Mutations update both trees before returning;
//! query results found in the matchable tree are mapped back to logical
//! nodes by their child-index path.
//!
//! ```rust,ignore
//! let (mut dom, doc) = hnode_dom::parse("<div id=\"list\"></div>")?;
//! let list = dom.query_selector(doc, "#list")?.unwrap();
//! dom.set_inner_html(list, "<span class=\"x\"></span>")?;
//! assert_eq!(dom.query_selector_all(doc, ".x")?.len(), 1);
//! ```

mod attributes;
mod fragment;
mod mirror;
mod node;
mod operations;
mod path;
mod query;
mod serializer;
mod tree;

pub use attributes::{Attr, AttributeStore};
pub use node::{ElementData, Node, NodeData, NodeType};
pub use operations::{DomError, DomResult};
pub use serializer::HtmlSerializer;
pub use tree::Dom;

pub use hnode_html::{FragmentContext, ParseOptions};
pub use hnode_select::{SelectorError, SelectorList};

/// Node identifier (index into the arena)
///
/// Two ids are equal iff they denote the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Parse an HTML document into a fresh arena, returning it with the root
pub fn parse(html: &str) -> DomResult<(Dom, NodeId)> {
    let mut dom = Dom::new();
    let root = dom.parse(html)?;
    Ok((dom, root))
}
