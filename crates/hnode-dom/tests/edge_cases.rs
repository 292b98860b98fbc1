//! Edge case and stress tests for hnode-dom
//!
//! Unusual tree shapes, rejected operations and long mutation sequences.

use hnode_dom::{Dom, DomError, HtmlSerializer, NodeId, NodeType, ParseOptions};

// ============================================================================
// REJECTED OPERATIONS
// ============================================================================

#[test]
fn test_append_document_rejected() {
    let mut dom = Dom::new();
    let div = dom.create_element("div").unwrap();
    let doc = dom.create_document();

    assert!(matches!(dom.append_child(div, doc), Err(DomError::HierarchyRequest)));
    assert!(dom.child_nodes(div).is_empty());
}

#[test]
fn test_append_ancestor_rejected() {
    let (mut dom, doc) = hnode_dom::parse("<div><p><span></span></p></div>").unwrap();
    let div = dom.query_selector(doc, "div").unwrap().unwrap();
    let span = dom.query_selector(doc, "span").unwrap().unwrap();

    assert!(dom.detach(div));
    assert!(matches!(dom.append_child(span, div), Err(DomError::HierarchyRequest)));
    assert!(dom.is_synchronized(div));
}

#[test]
fn test_failed_append_leaves_child_detached() {
    let mut dom = Dom::new();
    let text = dom.create_text_node("leaf");
    let div = dom.create_element("div").unwrap();

    assert!(dom.append_child(text, div).is_err());
    assert_eq!(dom.parent_node(div), None);

    let body = dom.create_element("body").unwrap();
    dom.append_child(body, div).unwrap();
    assert_eq!(dom.parent_node(div), Some(body));
}

#[test]
fn test_attribute_on_document_rejected() {
    let mut dom = Dom::new();
    let doc = dom.create_document();

    assert!(matches!(
        dom.set_attribute(doc, "id", "x"),
        Err(DomError::UnsupportedNodeType { node_type: NodeType::Document, .. })
    ));
    assert_eq!(dom.get_attribute(doc, "id"), None);
}

#[test]
fn test_invalid_attribute_names() {
    let mut dom = Dom::new();
    let div = dom.create_element("div").unwrap();

    for name in ["", "a>b", "a<b", "a\"b", "a'b", "a&b"] {
        assert!(
            matches!(dom.set_attribute(div, name, "v"), Err(DomError::InvalidAttributeName(_))),
            "{name:?} should be rejected"
        );
    }
    assert_eq!(dom.attributes(div).count(), 0);
}

// ============================================================================
// LOOKUPS
// ============================================================================

#[test]
fn test_lookups_on_empty_nodes() {
    let mut dom = Dom::new();
    let div = dom.create_element("div").unwrap();

    assert_eq!(dom.first_child(div), None);
    assert_eq!(dom.last_child(div), None);
    assert_eq!(dom.child_node(div, 3), None);
    assert_eq!(dom.query_selector(div, "span").unwrap(), None);
    assert_eq!(dom.text_content(div).unwrap(), "");
    assert_eq!(dom.inner_html(div).unwrap(), "");
}

#[test]
fn test_query_on_detached_subtree() {
    let mut dom = Dom::new();
    let div = dom.create_element("div").unwrap();
    dom.set_inner_html(div, r#"<p class="x"><b class="x"></b></p>"#).unwrap();

    let found = dom.query_selector_all(div, ".x").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(dom.tag_name(found[1]), "b");
}

#[test]
fn test_same_shape_subtrees_resolve_separately() {
    let (dom, doc) =
        hnode_dom::parse("<ul><li><b></b></li></ul><ul><li><b></b></li></ul>").unwrap();

    let lists = dom.query_selector_all(doc, "ul").unwrap();
    let first = dom.query_selector(lists[0], "b").unwrap().unwrap();
    let second = dom.query_selector(lists[1], "b").unwrap().unwrap();
    assert_ne!(first, second);
    assert_eq!(dom.query_selector_all(doc, "b").unwrap(), vec![first, second]);
}

#[test]
fn test_attribute_names_match_exactly() {
    let mut dom = Dom::new();
    let div = dom.create_element("div").unwrap();
    dom.set_attribute(div, "ID", "a").unwrap();
    dom.set_attribute(div, "id", "b").unwrap();

    assert_eq!(dom.query_selector(div, "[id=b]").unwrap(), Some(div));
    assert_eq!(dom.query_selector(div, "#b").unwrap(), Some(div));
    assert_eq!(dom.query_selector(div, "[ID=a]").unwrap(), None);
    assert_eq!(dom.get_attribute(div, "id"), Some("b"));
    assert_eq!(dom.get_attribute(div, "ID"), Some("a"));
}

#[test]
fn test_nth_child_extreme_offsets() {
    let (dom, doc) = hnode_dom::parse("<p>a</p><p>b</p>").unwrap();

    assert_eq!(dom.query_selector_all(doc, "p:nth-child(n-2147483648)").unwrap().len(), 2);
    assert_eq!(dom.query_selector_all(doc, "p:nth-child(-n+2147483647)").unwrap().len(), 2);
    assert!(dom.query_selector_all(doc, "p:nth-child(2147483647n+2147483647)").unwrap().is_empty());
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[test]
fn test_text_is_escaped() {
    let (dom, doc) = hnode_dom::parse("<p>a &lt; b &amp;&amp; c &gt; d</p>").unwrap();
    let p = dom.query_selector(doc, "p").unwrap().unwrap();

    assert_eq!(dom.text_content(p).unwrap(), "a < b && c > d");
    assert_eq!(dom.inner_html(p).unwrap(), "a &lt; b &amp;&amp; c &gt; d");
}

#[test]
fn test_void_element_serialization() {
    let (dom, doc) = hnode_dom::parse("<p>a<br>b</p>").unwrap();
    let p = dom.query_selector(doc, "p").unwrap().unwrap();

    assert_eq!(dom.outer_html(p).unwrap(), "<p>a<br></br>b</p>");
    let serializer = HtmlSerializer {
        close_void_elements: false,
    };
    assert_eq!(serializer.outer_html(&dom, p).unwrap(), "<p>a<br>b</p>");
}

#[test]
fn test_comment_blocks_serialization() {
    let mut dom = Dom::with_options(ParseOptions {
        skip_comments: false,
        ..ParseOptions::default()
    });
    let doc = dom.parse("<div>a<!--x--></div>").unwrap();
    let div = dom.query_selector(doc, "div").unwrap().unwrap();

    assert!(matches!(dom.outer_html(div), Err(DomError::UnsupportedNodeType { .. })));
    assert!(dom.text_content(div).is_err());
}

#[test]
fn test_whitespace_text_dropped_by_option() {
    let mut dom = Dom::with_options(ParseOptions {
        drop_whitespace_text: true,
        ..ParseOptions::default()
    });
    let doc = dom.parse("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>").unwrap();
    let ul = dom.query_selector(doc, "ul").unwrap().unwrap();

    assert_eq!(dom.child_nodes(ul).len(), 2);
    assert_eq!(dom.inner_html(ul).unwrap(), "<li>a</li><li>b</li>");
}

#[test]
fn test_template_contents_round_trip() {
    let html = "<html><head></head><body><template><p>x</p></template></body></html>";
    let (dom, doc) = hnode_dom::parse(html).unwrap();

    assert_eq!(dom.outer_html(doc).unwrap(), html);
    let p = dom.query_selector(doc, "template > p").unwrap().unwrap();
    assert_eq!(dom.text_content(p).unwrap(), "x");
    assert!(dom.is_synchronized(doc));
}

#[test]
fn test_set_inner_html_is_all_or_nothing() {
    let (mut dom, doc) = hnode_dom::parse(r#"<div id="box">keep</div>"#).unwrap();
    let div = dom.query_selector(doc, "#box").unwrap().unwrap();
    let before = dom.child_nodes(div).to_vec();

    let result = dom.set_inner_html(div, "<p>x</p><a\"b>y</a\"b>");
    assert!(matches!(result, Err(DomError::InvalidTagName(_))));
    assert_eq!(dom.child_nodes(div), before.as_slice());
    assert_eq!(dom.inner_html(div).unwrap(), "keep");
    assert!(dom.query_selector(doc, "p").unwrap().is_none());
    assert!(dom.is_synchronized(doc));
}

// ============================================================================
// STRESS
// ============================================================================

#[test]
fn test_many_children_remove_every_other() {
    let mut dom = Dom::new();
    let ul = dom.create_element("ul").unwrap();
    let items: Vec<NodeId> = (0..200)
        .map(|i| {
            let li = dom.create_element("li").unwrap();
            dom.set_attribute(li, "data-i", &i.to_string()).unwrap();
            dom.append_child(ul, li).unwrap();
            li
        })
        .collect();

    for &li in items.iter().step_by(2) {
        assert!(dom.remove_child(ul, li));
    }

    assert_eq!(dom.child_nodes(ul).len(), 100);
    assert!(dom.is_synchronized(ul));
    let found = dom.query_selector_all(ul, "li").unwrap();
    assert_eq!(found, dom.child_nodes(ul));
    assert_eq!(dom.get_attribute(found[0], "data-i"), Some("1"));
    assert_eq!(dom.query_selector(ul, "[data-i=\"199\"]").unwrap(), Some(items[199]));
}

#[test]
fn test_deep_nesting() {
    let mut dom = Dom::new();
    let root = dom.create_element("div").unwrap();
    let mut current = root;
    for _ in 0..100 {
        let child = dom.create_element("div").unwrap();
        dom.append_child(current, child).unwrap();
        current = child;
    }
    dom.set_attribute(current, "id", "bottom").unwrap();

    assert_eq!(dom.query_selector(root, "#bottom").unwrap(), Some(current));
    assert_eq!(dom.descendants(root).len(), 100);
    assert!(dom.is_synchronized(root));
}

#[test]
fn test_repeated_inner_html_replacement() {
    let (mut dom, doc) = hnode_dom::parse(r#"<div id="box"></div>"#).unwrap();
    let div = dom.query_selector(doc, "#box").unwrap().unwrap();

    for i in 0..20 {
        dom.set_inner_html(div, &format!("<i>{i}</i><b>{i}</b>")).unwrap();
    }

    assert_eq!(dom.inner_html(div).unwrap(), "<i>19</i><b>19</b>");
    assert_eq!(dom.query_selector_all(doc, "i, b").unwrap().len(), 2);
    assert!(dom.is_synchronized(doc));
}

#[test]
fn test_attribute_churn_stays_consistent() {
    let mut dom = Dom::new();
    let div = dom.create_element("div").unwrap();

    for name in ["a", "b", "c", "d"] {
        dom.set_attribute(div, name, name).unwrap();
    }
    dom.remove_attribute(div, "b").unwrap();
    dom.set_attribute(div, "e", "e").unwrap();
    dom.set_attribute(div, "a", "A").unwrap();
    dom.remove_attribute(div, "d").unwrap();

    let names: Vec<&str> = dom.attributes(div).map(|attr| attr.name.as_str()).collect();
    assert_eq!(names, ["a", "c", "e"]);
    assert!(dom.matches(div, "[a=A][c][e]").unwrap());
    assert!(!dom.matches(div, "[b]").unwrap());
    assert!(!dom.matches(div, "[d]").unwrap());
    assert_eq!(dom.outer_html(div).unwrap(), r#"<div a="A" c="c" e="e"></div>"#);
}
