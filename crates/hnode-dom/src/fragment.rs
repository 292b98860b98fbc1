//! Markup loading
//!
//! Builds logical nodes (and their mirrors) from parsed markup, either as a
//! whole document or as replacement content for an existing node.

use std::io::Read;

use hnode_html::{FragmentContext, RawKind, RawNode};

use crate::attributes::validate_name;
use crate::mirror::MirrorId;
use crate::node::NodeData;
use crate::{Dom, DomError, DomResult, NodeId};

impl Dom {
    /// Parse a full document into this arena, returning its root
    pub fn parse(&mut self, html: &str) -> DomResult<NodeId> {
        let raw = hnode_html::parse_document(html, &self.options).map_err(DomError::Parse)?;
        self.adopt(raw)
    }

    /// Parse a full document from a UTF-8 reader
    pub fn parse_reader<R: Read>(&mut self, reader: &mut R) -> DomResult<NodeId> {
        let raw = hnode_html::parse_reader(reader, &self.options).map_err(DomError::Parse)?;
        self.adopt(raw)
    }

    /// Replace the children of `id` with the nodes parsed from `html`
    ///
    /// Elements parse `html` as a fragment in their own context; a document
    /// parses it as a whole document. On any error `id` is unchanged.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> DomResult<()> {
        let node = self.node(id);
        let parsed = match &node.data {
            NodeData::Element(element) => {
                let context = FragmentContext::for_element(element.tag());
                hnode_html::parse_fragment(html, &context, &self.options)
            }
            NodeData::Document => {
                hnode_html::parse_document(html, &self.options).map(|root| root.children)
            }
            _ => {
                return Err(DomError::UnsupportedNodeType {
                    operation: "set_inner_html",
                    node_type: node.node_type(),
                });
            }
        };
        let fragment = parsed.map_err(DomError::MalformedMarkup)?;
        // Build the replacement subtrees before touching the current children
        let adopted = fragment
            .into_iter()
            .map(|raw| self.adopt(raw))
            .collect::<DomResult<Vec<_>>>()?;

        let old_children = std::mem::take(&mut self.nodes[id.index()].children);
        for &child in &old_children {
            self.clear_parent(child);
        }
        let mirror = self.mirror_of(id);
        self.mirror.set_children_bounds(mirror, MirrorId::NONE, MirrorId::NONE);

        tracing::trace!(node = id.0, removed = old_children.len(), added = adopted.len(), "set_inner_html");
        for child in adopted {
            self.append_child(id, child)?;
        }
        Ok(())
    }

    /// Allocate a detached subtree for a parsed node
    pub(crate) fn adopt(&mut self, raw: RawNode) -> DomResult<NodeId> {
        let id = match raw.kind {
            RawKind::Document => self.create_document(),
            RawKind::Doctype { name } => self.alloc(NodeData::Doctype { name }),
            RawKind::Text(text) => self.alloc(NodeData::Text(text)),
            RawKind::Element { name, attrs } => {
                let id = self.create_element(&name)?;
                for (key, value) in attrs {
                    if validate_name(&key).is_err() {
                        tracing::warn!(element = %name, attribute = %key, "dropping unserializable attribute");
                        continue;
                    }
                    self.set_attribute(id, &key, &value)?;
                }
                id
            }
            RawKind::Comment(_) => self.alloc(NodeData::Other {
                kind: "comment".to_string(),
            }),
            RawKind::ProcessingInstruction { .. } => self.alloc(NodeData::Other {
                kind: "processing-instruction".to_string(),
            }),
        };

        for child in raw.children {
            let child_id = self.adopt(child)?;
            self.append_child(id, child_id)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeType, ParseOptions};

    #[test]
    fn test_parse_document_shape() {
        let mut dom = Dom::new();
        let doc = dom.parse("<!DOCTYPE html><p>hi</p>").unwrap();

        assert_eq!(dom.node_type(doc), NodeType::Document);
        let kinds: Vec<NodeType> = dom.child_nodes(doc).iter().map(|&c| dom.node_type(c)).collect();
        assert_eq!(kinds, vec![NodeType::Doctype, NodeType::Element]);
        assert!(dom.is_synchronized(doc));
    }

    #[test]
    fn test_parse_reader() {
        let mut dom = Dom::new();
        let doc = dom.parse_reader(&mut "<p id=\"x\">hi</p>".as_bytes()).unwrap();

        let p = dom.query_selector(doc, "#x").unwrap().unwrap();
        assert_eq!(dom.text_content(p).unwrap(), "hi");
    }

    #[test]
    fn test_comments_kept_as_other() {
        let mut dom = Dom::with_options(ParseOptions {
            skip_comments: false,
            ..ParseOptions::default()
        });
        let doc = dom.parse("<div><!-- note --></div>").unwrap();
        let div = dom.query_selector(doc, "div").unwrap().unwrap();

        let comment = dom.first_child(div).unwrap();
        assert_eq!(dom.node_type(comment), NodeType::Other);
        assert!(matches!(
            dom.node(comment).data(),
            NodeData::Other { kind } if kind == "comment"
        ));
    }

    #[test]
    fn test_set_inner_html_replaces_children() {
        let mut dom = Dom::new();
        let doc = dom.parse("<div id=\"box\"><p>old</p></div>").unwrap();
        let div = dom.query_selector(doc, "#box").unwrap().unwrap();
        let old = dom.first_child(div).unwrap();

        dom.set_inner_html(div, "<i>a</i>b").unwrap();
        assert_eq!(dom.inner_html(div).unwrap(), "<i>a</i>b");
        assert_eq!(dom.parent_node(old), None);
        assert!(dom.query_selector(doc, "p").unwrap().is_none());
        assert!(dom.is_synchronized(doc));
    }

    #[test]
    fn test_set_inner_html_uses_element_context() {
        let mut dom = Dom::new();
        let table = dom.create_element("table").unwrap();

        dom.set_inner_html(table, "<tr><td>1</td></tr>").unwrap();
        let tbody = dom.first_child(table).unwrap();
        assert_eq!(dom.tag_name(tbody), "tbody");
    }

    #[test]
    fn test_set_inner_html_strict_failure_keeps_children() {
        let mut dom = Dom::with_options(ParseOptions {
            strict: true,
            ..ParseOptions::default()
        });
        let div = dom.create_element("div").unwrap();
        let text = dom.create_text_node("keep");
        dom.append_child(div, text).unwrap();

        let result = dom.set_inner_html(div, "<p></span>");
        assert!(matches!(result, Err(DomError::MalformedMarkup(_))));
        assert_eq!(dom.child_nodes(div), &[text]);
        assert!(dom.is_synchronized(div));
    }

    #[test]
    fn test_set_inner_html_bad_tag_keeps_children() {
        let mut dom = Dom::new();
        let div = dom.create_element("div").unwrap();
        let text = dom.create_text_node("keep");
        dom.append_child(div, text).unwrap();

        let result = dom.set_inner_html(div, "<p>x</p><a\"b>y</a\"b>");
        assert!(matches!(result, Err(DomError::InvalidTagName(_))));
        assert_eq!(dom.child_nodes(div), &[text]);
        assert_eq!(dom.parent_node(text), Some(div));
        assert_eq!(dom.inner_html(div).unwrap(), "keep");
        assert!(dom.is_synchronized(div));
    }

    #[test]
    fn test_set_inner_html_on_text_fails() {
        let mut dom = Dom::new();
        let text = dom.create_text_node("x");

        assert!(matches!(
            dom.set_inner_html(text, "<b></b>"),
            Err(DomError::UnsupportedNodeType { operation: "set_inner_html", .. })
        ));
    }
}
