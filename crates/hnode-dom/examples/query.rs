//! Example: parse a page, query it, mutate it and print the result
//!
//! Run with `RUST_LOG=hnode_dom=trace` to see every mutation.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!doctype html><html><head><title>Todo</title></head><body><ul id="todo"><li class="done">write parser</li><li>write queries</li></ul></body></html>"#;

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let (mut dom, doc) = hnode_dom::parse(PAGE)?;
    let list = dom
        .query_selector(doc, "#todo")?
        .context("page has no #todo list")?;

    for item in dom.query_selector_all(list, "li:not(.done)")? {
        println!("open: {}", dom.text_content(item)?);
    }

    let item = dom.create_element("li")?;
    let text = dom.create_text_node("ship it");
    dom.append_child(item, text)?;
    dom.set_attribute(item, "class", "new")?;
    dom.append_child(list, item)?;

    println!("{}", dom.outer_html(doc)?);
    println!("{} list items", dom.query_selector_all(doc, "#todo > li")?.len());
    Ok(())
}
