//! HTML serialization
//!
//! Renders logical subtrees back to markup and collects text content.

use hnode_html::escape::{escape_attribute, escape_text};

use crate::node::NodeData;
use crate::{Dom, DomError, DomResult, NodeId};

/// Elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Markup writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlSerializer {
    /// Write an end tag for void elements too (`<br></br>`)
    pub close_void_elements: bool,
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self {
            close_void_elements: true,
        }
    }
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup for `id` and its subtree
    pub fn outer_html(&self, dom: &Dom, id: NodeId) -> DomResult<String> {
        let mut output = String::new();
        self.write_node(dom, id, &mut output)?;
        Ok(output)
    }

    /// Markup for the children of `id`
    pub fn inner_html(&self, dom: &Dom, id: NodeId) -> DomResult<String> {
        let mut output = String::new();
        self.write_children(dom, id, &mut output)?;
        Ok(output)
    }

    fn write_node(&self, dom: &Dom, id: NodeId, output: &mut String) -> DomResult<()> {
        let node = dom.node(id);
        match &node.data {
            NodeData::Text(text) => escape_text(text, output),
            NodeData::Doctype { .. } => output.push_str("<!doctype html>"),
            NodeData::Document => self.write_children(dom, id, output)?,
            NodeData::Element(element) => {
                output.push('<');
                output.push_str(&element.tag);
                for attr in element.attrs.iter() {
                    output.push(' ');
                    output.push_str(&attr.name);
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                let is_void = VOID_ELEMENTS.contains(&element.tag.as_str());
                if is_void && !self.close_void_elements && node.children.is_empty() {
                    return Ok(());
                }

                self.write_children(dom, id, output)?;
                output.push_str("</");
                output.push_str(&element.tag);
                output.push('>');
            }
            NodeData::Other { .. } => {
                return Err(DomError::UnsupportedNodeType {
                    operation: "outer_html",
                    node_type: node.node_type(),
                });
            }
        }
        Ok(())
    }

    fn write_children(&self, dom: &Dom, id: NodeId, output: &mut String) -> DomResult<()> {
        let node = dom.node(id);
        match &node.data {
            NodeData::Text(_) | NodeData::Doctype { .. } => Ok(()),
            NodeData::Other { .. } => Err(DomError::UnsupportedNodeType {
                operation: "inner_html",
                node_type: node.node_type(),
            }),
            NodeData::Document | NodeData::Element(_) => {
                for &child in &node.children {
                    self.write_node(dom, child, output)?;
                }
                Ok(())
            }
        }
    }
}

fn collect_text(dom: &Dom, id: NodeId, output: &mut String) -> DomResult<()> {
    let node = dom.node(id);
    match &node.data {
        NodeData::Text(text) => output.push_str(text),
        NodeData::Doctype { .. } => {}
        NodeData::Document | NodeData::Element(_) => {
            for &child in &node.children {
                collect_text(dom, child, output)?;
            }
        }
        NodeData::Other { .. } => {
            return Err(DomError::UnsupportedNodeType {
                operation: "text_content",
                node_type: node.node_type(),
            });
        }
    }
    Ok(())
}

impl Dom {
    /// Markup for `id` and its subtree
    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        HtmlSerializer::default().outer_html(self, id)
    }

    /// Markup for the children of `id`
    pub fn inner_html(&self, id: NodeId) -> DomResult<String> {
        HtmlSerializer::default().inner_html(self, id)
    }

    /// Concatenated text of every text node under `id`, unescaped
    pub fn text_content(&self, id: NodeId) -> DomResult<String> {
        let mut output = String::new();
        collect_text(self, id, &mut output)?;
        Ok(output)
    }
}
