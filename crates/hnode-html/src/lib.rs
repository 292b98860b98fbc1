//! hnode HTML bridge
//!
//! Parses markup with html5ever and hands the result back as an owned
//! [`RawNode`] tree, so nothing downstream depends on html5ever types.

mod parser;
pub mod escape;

use std::io::Read;

pub use parser::{FragmentContext, HtmlParser, ParseOptions};

/// Parse a full HTML document
pub fn parse_document(html: &str, options: &ParseOptions) -> Result<RawNode, HtmlError> {
    HtmlParser::new(options.clone()).parse_document(html)
}

/// Parse a full HTML document from a reader
pub fn parse_reader<R: Read>(reader: &mut R, options: &ParseOptions) -> Result<RawNode, HtmlError> {
    HtmlParser::new(options.clone()).parse_reader(reader)
}

/// Parse an HTML fragment in the given context, returning its top-level nodes
pub fn parse_fragment(
    html: &str,
    context: &FragmentContext,
    options: &ParseOptions,
) -> Result<Vec<RawNode>, HtmlError> {
    HtmlParser::new(options.clone()).parse_fragment(html, context)
}

/// A parsed node, detached from the parser's own tree representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    pub kind: RawKind,
    pub children: Vec<RawNode>,
}

/// What a [`RawNode`] is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKind {
    Document,
    Doctype { name: String },
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String },
}

impl RawNode {
    pub fn new(kind: RawKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including self
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RawNode::count).sum::<usize>()
    }

    /// Element tag name, if this is an element
    pub fn element_name(&self) -> Option<&str> {
        match &self.kind {
            RawKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Markup parsing errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("{count} parse error(s), first: {first}")]
    Malformed { count: usize, first: String },

    #[error("fragment parse produced no root element")]
    MissingFragmentRoot,
}
