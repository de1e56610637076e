//! Shrinks reader HTML before it is placed in a prompt.
//!
//! Scripts, styles, comments and every attribute are dropped, same-tag
//! single-child chains are unwrapped and empty elements are removed. The
//! structure that is left is serialised back to HTML.

use scraper::{ElementRef, Html, Node};

const STRIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Children of these are not entity-escaped when serialised.
const RAW_TEXT_ELEMENTS: [&str; 5] = ["iframe", "noembed", "noframes", "plaintext", "xmp"];

/// The parser drops one newline directly after the open tag of these.
const LEADING_NEWLINE_ELEMENTS: [&str; 3] = ["listing", "pre", "textarea"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum CleanNode {
    Doctype(String),
    Element { name: String, children: Vec<CleanNode> },
    Text(String),
}

impl CleanNode {
    fn is_element_named(&self, tag: &str) -> bool {
        matches!(self, CleanNode::Element { name, .. } if name == tag)
    }
}

/// Cleans `raw` HTML. Pure: the same input always yields the same output,
/// and cleaning an already cleaned document changes nothing.
pub fn clean_html(raw: &str) -> String {
    let mut nodes = parse(raw);

    loop {
        unwrap_same_tag_chains(&mut nodes);
        if !remove_empty_elements(&mut nodes) {
            break;
        }
    }

    let mut out = String::with_capacity(raw.len() / 2);
    for node in &nodes {
        serialize(node, false, &mut out);
    }
    out
}

fn is_full_document(raw: &str) -> bool {
    let lowered = raw.trim_start().to_ascii_lowercase();
    lowered.starts_with("<!doctype") || lowered.contains("<html")
}

fn parse(raw: &str) -> Vec<CleanNode> {
    if is_full_document(raw) {
        let document = Html::parse_document(raw);
        let mut nodes = Vec::new();
        for child in document.tree.root().children() {
            match child.value() {
                Node::Doctype(doctype) => nodes.push(CleanNode::Doctype(doctype.name().to_string())),
                Node::Element(_) => {
                    if let Some(mut node) = ElementRef::wrap(child).and_then(convert_element) {
                        drop_inter_element_whitespace(&mut node);
                        nodes.push(node);
                    }
                }
                _ => {}
            }
        }
        nodes
    } else {
        // Fragments are parsed under a synthetic <html> root that is not part of the input.
        let fragment = Html::parse_fragment(raw);
        convert_children(fragment.root_element())
    }
}

/// Whitespace directly under `<html>` is discarded on parse, so it must not
/// be written back out once `<head>` is removed.
fn drop_inter_element_whitespace(root: &mut CleanNode) {
    if let CleanNode::Element { children, .. } = root {
        children.retain(|child| !matches!(child, CleanNode::Text(text) if text.trim().is_empty()));
    }
}

fn convert_element(element: ElementRef<'_>) -> Option<CleanNode> {
    let name = element.value().name();
    if STRIPPED_ELEMENTS.contains(&name) {
        return None;
    }
    let children = if name == "noscript" && is_raw_text_only(element) {
        convert_noscript_markup(element)
    } else {
        convert_children(element)
    };
    Some(CleanNode::Element {
        name: name.to_string(),
        children,
    })
}

fn is_raw_text_only(element: ElementRef<'_>) -> bool {
    element
        .children()
        .all(|child| matches!(child.value(), Node::Text(_)))
}

/// With scripting enabled the parser keeps `<noscript>` content as one text
/// node. It is parsed again as a fragment so its markup is cleaned too.
fn convert_noscript_markup(element: ElementRef<'_>) -> Vec<CleanNode> {
    let markup: String = element.text().collect();
    if markup.is_empty() {
        return Vec::new();
    }
    let fragment = Html::parse_fragment(&markup);
    convert_children(fragment.root_element())
}

fn convert_children(element: ElementRef<'_>) -> Vec<CleanNode> {
    let mut children = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(&mut children, text),
            Node::Element(_) => {
                if let Some(node) = ElementRef::wrap(child).and_then(convert_element) {
                    children.push(node);
                }
            }
            // comments, processing instructions
            _ => {}
        }
    }
    children
}

fn push_text(nodes: &mut Vec<CleanNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(CleanNode::Text(previous)) = nodes.last_mut() {
        previous.push_str(text);
    } else {
        nodes.push(CleanNode::Text(text.to_string()));
    }
}

/// Collapses `<x><x>..</x></x>` into `<x>..</x>` until no such pair is left.
fn unwrap_same_tag_chains(nodes: &mut [CleanNode]) {
    for node in nodes.iter_mut() {
        if let CleanNode::Element { name, children } = node {
            unwrap_same_tag_chains(children);
            while children.len() == 1 && children[0].is_element_named(name) {
                if let Some(CleanNode::Element {
                    children: grandchildren,
                    ..
                }) = children.pop()
                {
                    *children = grandchildren;
                }
            }
        }
    }
}

/// Removes childless elements bottom-up. Returns whether anything was removed.
fn remove_empty_elements(nodes: &mut Vec<CleanNode>) -> bool {
    let mut removed = false;
    for node in nodes.iter_mut() {
        if let CleanNode::Element { children, .. } = node {
            removed |= remove_empty_elements(children);
        }
    }

    let before = nodes.len();
    let drained: Vec<CleanNode> = nodes.drain(..).collect();
    for node in drained {
        match node {
            CleanNode::Element { ref children, .. } if children.is_empty() => {}
            CleanNode::Text(text) => push_text(nodes, &text),
            other => nodes.push(other),
        }
    }

    removed || nodes.len() != before
}

fn serialize(node: &CleanNode, raw_text: bool, out: &mut String) {
    match node {
        CleanNode::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        CleanNode::Text(text) if raw_text => out.push_str(text),
        CleanNode::Text(text) => escape_text(text, out),
        CleanNode::Element { name, children } => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            if LEADING_NEWLINE_ELEMENTS.contains(&name.as_str())
                && matches!(children.first(), Some(CleanNode::Text(text)) if text.starts_with('\n'))
            {
                out.push('\n');
            }
            let raw_children = RAW_TEXT_ELEMENTS.contains(&name.as_str());
            for child in children {
                serialize(child, raw_children, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwraps_nested_same_tag() {
        assert_eq!(
            clean_html("<div><div><p>Hi</p></div></div>"),
            "<div><p>Hi</p></div>"
        );
    }

    #[test]
    fn test_unwrap_reaches_fixpoint() {
        assert_eq!(
            clean_html("<section><section><section><b>deep</b></section></section></section>"),
            "<section><b>deep</b></section>"
        );
    }

    #[test]
    fn test_different_tags_are_not_unwrapped() {
        assert_eq!(clean_html("<div><p>Hi</p></div>"), "<div><p>Hi</p></div>");
    }

    #[test]
    fn test_sibling_text_blocks_unwrap() {
        assert_eq!(
            clean_html("<div>intro<div><p>Hi</p></div></div>"),
            "<div>intro<div><p>Hi</p></div></div>"
        );
    }

    #[test]
    fn test_removes_empty_span() {
        assert_eq!(clean_html("<span></span>"), "");
        assert_eq!(clean_html("<p>a<span></span>b</p>"), "<p>ab</p>");
    }

    #[test]
    fn test_whitespace_child_is_kept() {
        assert_eq!(clean_html("<p> </p>"), "<p> </p>");
    }

    #[test]
    fn test_strips_scripts_styles_and_comments() {
        let raw = r#"<div class="a"><script>alert(1)</script><style>p{}</style><!-- note --><p id="x" style="color:red">Text</p></div>"#;
        let cleaned = clean_html(raw);
        assert_eq!(cleaned, "<div><p>Text</p></div>");
        assert!(!cleaned.contains("script"));
        assert!(!cleaned.contains("<!--"));
    }

    #[test]
    fn test_strips_attributes() {
        let raw = r#"<a href="/x" class="link" data-id="1">Go</a>"#;
        assert_eq!(clean_html(raw), "<a>Go</a>");
    }

    #[test]
    fn test_full_document_keeps_structure() {
        let raw = r#"<!DOCTYPE html><html lang="en"><head><title>T</title><script src="a.js"></script></head><body><main><h1>Hello</h1><img src="x.png"></main></body></html>"#;
        assert_eq!(
            clean_html(raw),
            "<!DOCTYPE html><html><head><title>T</title></head><body><main><h1>Hello</h1></main></body></html>"
        );
    }

    #[test]
    fn test_removal_cascades_to_emptied_parents() {
        assert_eq!(clean_html("<div><span><i></i></span></div><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_removal_exposes_new_unwrap() {
        assert_eq!(
            clean_html("<div><div>a</div><span></span></div>"),
            "<div>a</div>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(clean_html("<p>a &lt; b &amp; c</p>"), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_is_idempotent() {
        let samples = [
            "<div><div><p>Hi</p></div></div>",
            r#"<!DOCTYPE html><html><head><meta charset="utf-8"><style>a{}</style></head><body><div id="root"><div><div><ul><li>One</li><li></li></ul></div></div></div><!-- c --></body></html>"#,
            "<div>\n  <div><span> </span></div>\n</div>",
            "<table><tr><td>1</td><td></td></tr></table>",
            "plain text with <b>bold</b>",
            "<html><head><meta charset=x></head>\n<body>\n<div><div>x</div></div>\n</body>\n</html>",
            "<pre>\n\ncode</pre>",
            "<div><textarea>\nnotes</textarea><listing>\n\nlisted</listing></div>",
            "<div><noscript><p class=\"c\">Enable <b>JS</b> &amp; reload</p></noscript></div>",
        ];
        for sample in samples {
            let once = clean_html(sample);
            let twice = clean_html(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_emptied_head_leaves_no_whitespace_under_html() {
        assert_eq!(
            clean_html("<html><head><meta charset=x></head>\n<body>\n<div><div>x</div></div>\n</body>\n</html>"),
            "<html><body>\n<div>x</div>\n\n</body></html>"
        );
    }

    #[test]
    fn test_pre_keeps_leading_newline() {
        assert_eq!(clean_html("<pre>\n\ncode</pre>"), "<pre>\n\ncode</pre>");
        assert_eq!(clean_html("<pre>\ncode</pre>"), "<pre>code</pre>");
    }

    #[test]
    fn test_noscript_markup_is_cleaned() {
        let cleaned = clean_html(
            r#"<div><noscript><img src="track.gif" class="x"></noscript><p>a</p></div>"#,
        );
        assert_eq!(cleaned, "<div><p>a</p></div>");
        assert!(!cleaned.contains("src="));
        assert!(!cleaned.contains("class="));

        assert_eq!(
            clean_html(r#"<div><noscript><p class="c">Enable <b id="b">JS</b></p></noscript></div>"#),
            "<div><noscript><p>Enable <b>JS</b></p></noscript></div>"
        );
    }

    #[test]
    fn test_no_attributes_survive() {
        let raw = r#"<html><body><div class="c" id="i"><p style="x" title="t">Hello <em data-x="1">world</em></p></div></body></html>"#;
        let document = Html::parse_document(&clean_html(raw));
        for node in document.tree.nodes() {
            if let Node::Element(element) = node.value() {
                assert_eq!(element.attrs().count(), 0, "attributes left on {}", element.name());
            }
        }
    }
}
