//! HTML5 parser implementation
//!
//! Uses html5ever's RcDom and converts it into owned [`RawNode`]s.

use std::io::Read;

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::{HtmlError, RawKind, RawNode};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parser configuration, passed explicitly to every parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop comments and processing instructions
    pub skip_comments: bool,
    /// Drop text nodes that contain only whitespace
    pub drop_whitespace_text: bool,
    /// Fail on any error html5ever recovered from
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_comments: true,
            drop_whitespace_text: false,
            strict: false,
        }
    }
}

/// Fragment context for innerHTML parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    pub context_element: String,
    pub namespace: String,
}

impl FragmentContext {
    /// Context for parsing inside an HTML element with the given tag
    pub fn for_element(tag: &str) -> Self {
        Self {
            context_element: tag.to_ascii_lowercase(),
            namespace: HTML_NAMESPACE.to_string(),
        }
    }
}

impl Default for FragmentContext {
    fn default() -> Self {
        Self::for_element("body")
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse an HTML string into a document tree
    pub fn parse_document(&self, html: &str) -> Result<RawNode, HtmlError> {
        self.parse_reader(&mut html.as_bytes())
    }

    /// Parse UTF-8 bytes from a reader into a document tree
    pub fn parse_reader<R: Read>(&self, reader: &mut R) -> Result<RawNode, HtmlError> {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(reader)?;
        self.check_errors(&dom)?;

        let mut root = RawNode::new(RawKind::Document);
        root.children = self.convert_children(&dom.document);

        tracing::debug!("Parsed document with {} nodes", root.count());
        Ok(root)
    }

    /// Parse a fragment as if it were the content of `context`
    pub fn parse_fragment(&self, html: &str, context: &FragmentContext) -> Result<Vec<RawNode>, HtmlError> {
        let context_name = QualName::new(
            None,
            Namespace::from(context.namespace.as_str()),
            LocalName::from(context.context_element.as_str()),
        );
        let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context_name, Vec::new(), false)
            .one(html);
        self.check_errors(&dom)?;

        // html5ever wraps fragment content in a synthetic <html> element
        let document_children = dom.document.children.borrow();
        let fragment_root = document_children
            .iter()
            .find(|child| matches!(child.data, RcNodeData::Element { .. }))
            .ok_or(HtmlError::MissingFragmentRoot)?;

        let nodes = self.convert_children(fragment_root);
        tracing::debug!(
            "Parsed fragment in <{}> context into {} top-level nodes",
            context.context_element,
            nodes.len()
        );
        Ok(nodes)
    }

    fn check_errors(&self, dom: &RcDom) -> Result<(), HtmlError> {
        let errors = dom.errors.borrow();
        if errors.is_empty() {
            return Ok(());
        }
        tracing::debug!("html5ever recovered from {} parse errors", errors.len());
        if self.options.strict {
            return Err(HtmlError::Malformed {
                count: errors.len(),
                first: errors[0].to_string(),
            });
        }
        Ok(())
    }

    fn convert_children(&self, handle: &Handle) -> Vec<RawNode> {
        handle
            .children
            .borrow()
            .iter()
            .filter_map(|child| self.convert_node(child))
            .collect()
    }

    /// Convert an RcDom node, or `None` if the options drop it
    fn convert_node(&self, handle: &Handle) -> Option<RawNode> {
        let kind = match &handle.data {
            RcNodeData::Document => RawKind::Document,
            RcNodeData::Doctype { name, .. } => RawKind::Doctype {
                name: name.to_string(),
            },
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if self.options.drop_whitespace_text && text.trim().is_empty() {
                    return None;
                }
                RawKind::Text(text)
            }
            RcNodeData::Comment { contents } => {
                if self.options.skip_comments {
                    return None;
                }
                RawKind::Comment(contents.to_string())
            }
            RcNodeData::ProcessingInstruction { target, .. } => {
                if self.options.skip_comments {
                    return None;
                }
                RawKind::ProcessingInstruction {
                    target: target.to_string(),
                }
            }
            RcNodeData::Element { name, attrs, .. } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        let key = match &attr.name.prefix {
                            Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        (key, attr.value.to_string())
                    })
                    .collect();
                RawKind::Element {
                    name: name.local.to_string(),
                    attrs,
                }
            }
        };

        let mut node = RawNode::new(kind);
        node.children = self.convert_children(handle);
        // rcdom parks <template> content in a separate fragment
        if let RcNodeData::Element { template_contents, .. } = &handle.data {
            if let Some(contents) = template_contents.borrow().as_ref() {
                node.children.extend(self.convert_children(contents));
            }
        }
        Some(node)
    }
}
