//! Serialize a condensed DOM back to compact HTML.

use crate::error::Result;
use markup5ever_rcdom::{Handle, NodeData};
use phf::phf_set;
use std::io::{self, Write};

/// Elements written without an end tag.
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "source", "track", "wbr",
};

/// Elements whose text keeps its whitespace.
static PRESERVE_WHITESPACE: phf::Set<&'static str> = phf_set! {
    "pre", "textarea",
};

/// Elements whose text is written unescaped.
static RAW_TEXT: phf::Set<&'static str> = phf_set! {
    "script", "style", "noscript", "template",
};

/// Elements that break the line on their own. Whitespace next to them is dropped.
static BLOCK_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "address", "article", "aside", "base", "blockquote", "body", "br", "caption",
    "dd", "details", "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hr",
    "html", "legend", "li", "link", "main", "menu", "meta", "nav", "ol", "optgroup",
    "option", "p", "pre", "script", "section", "style", "summary", "table", "tbody",
    "td", "tfoot", "th", "thead", "title", "tr", "ul",
};

/// How text children of the current element are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextMode {
    Collapse,
    Preserve,
    Raw,
}

/// Serialize the tree below `handle` to an HTML string.
pub fn serialize_html(handle: &Handle) -> Result<String> {
    let mut output = Vec::new();
    serialize_node(handle, &mut output, TextMode::Collapse)?;
    Ok(String::from_utf8_lossy(&output).trim().to_string())
}

/// Serialize a DOM node into HTML.
fn serialize_node<W: Write>(handle: &Handle, writer: &mut W, mode: TextMode) -> io::Result<()> {
    match handle.data {
        NodeData::Document => serialize_children(handle, writer, mode)?,
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag: &str = &name.local;

            write!(writer, "<{}", tag)?;

            for attr in attrs.borrow().iter() {
                write!(
                    writer,
                    " {}=\"{}\"",
                    &*attr.name.local,
                    escape_attribute(&attr.value)
                )?;
            }

            write!(writer, ">")?;

            if VOID_ELEMENTS.contains(tag) {
                return Ok(());
            }

            let mode = if RAW_TEXT.contains(tag) {
                TextMode::Raw
            } else if mode == TextMode::Preserve || PRESERVE_WHITESPACE.contains(tag) {
                TextMode::Preserve
            } else {
                TextMode::Collapse
            };

            serialize_children(handle, writer, mode)?;

            write!(writer, "</{}>", tag)?;
        }
        NodeData::Text { ref contents } => {
            let contents = contents.borrow();

            if mode == TextMode::Raw {
                write!(writer, "{}", contents)?;
            } else if mode == TextMode::Preserve {
                write!(writer, "{}", escape_text(&contents))?;
            } else if !contents.trim().is_empty() {
                let leading = contents.starts_with(char::is_whitespace);
                let trailing = contents.ends_with(char::is_whitespace);
                let collapsed = crate::dom::collapse_whitespace(&contents);

                write!(
                    writer,
                    "{}{}{}",
                    if leading { " " } else { "" },
                    escape_text(&collapsed),
                    if trailing { " " } else { "" }
                )?;
            }
        }
        NodeData::Comment { ref contents } => {
            write!(writer, "<!--{}-->", contents)?;
        }
        NodeData::Doctype { ref name, .. } => {
            write!(writer, "<!DOCTYPE {}>", name)?;
        }
        _ => (),
    }
    Ok(())
}

/// Whitespace-only text.
fn is_blank_text(handle: &Handle) -> bool {
    match handle.data {
        NodeData::Text { ref contents } => contents.borrow().trim().is_empty(),
        _ => false,
    }
}

/// Does the node flow inline with its neighbours.
fn is_inline(handle: &Handle) -> bool {
    match handle.data {
        NodeData::Element { ref name, .. } => !BLOCK_ELEMENTS.contains(&*name.local),
        NodeData::Text { .. } => !is_blank_text(handle),
        _ => false,
    }
}

/// Serialize the children of a node. In collapse mode a whitespace-only text
/// node becomes one space between two inline siblings and is dropped elsewhere.
fn serialize_children<W: Write>(
    handle: &Handle,
    writer: &mut W,
    mode: TextMode,
) -> io::Result<()> {
    let children = handle.children.borrow();

    for (i, child) in children.iter().enumerate() {
        if mode == TextMode::Collapse && is_blank_text(child) {
            let before = i.checked_sub(1).and_then(|j| children.get(j));
            let after = children.get(i + 1);

            if before.map_or(false, is_inline) && after.map_or(false, is_inline) {
                write!(writer, " ")?;
            }
            continue;
        }

        serialize_node(child, writer, mode)?;
    }

    Ok(())
}

/// Escape special characters in text content.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape special characters in attribute values.
fn escape_attribute(text: &str) -> String {
    text.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    #[test]
    fn test_compact_output() {
        let dom = parse(
            "<!DOCTYPE html><html><head><title>T</title></head><body>\n  <p class=\"a\"  title='x \"y\"'>Hello\n\n   <b>world</b> &amp; more</p><br>\n<pre>  keep\n  this </pre></body></html>",
        );
        let html = serialize_html(&dom.document).unwrap();

        assert_eq!(
            html,
            "<!DOCTYPE html><html><head><title>T</title></head><body><p class=\"a\" title=\"x &quot;y&quot;\">Hello <b>world</b> &amp; more</p><br><pre>  keep\n  this </pre></body></html>"
        );
    }

    #[test]
    fn test_comment_written() {
        let dom = parse("<ul><!-- 4× item --><li>x</li></ul>");
        let html = serialize_html(&dom.document).unwrap();
        assert!(html.contains("<ul><!-- 4× item --><li>x</li></ul>"));
    }

    #[test]
    fn test_raw_text_unescaped() {
        let dom = parse("<script>if (a < b && c) { go(); }</script><p>a < b</p>");
        let html = serialize_html(&dom.document).unwrap();
        assert!(html.contains("<script>if (a < b && c) { go(); }</script>"));
        assert!(html.contains("<p>a &lt; b</p>"));
    }

    #[test]
    fn test_space_between_inline_siblings() {
        let dom = parse("<p><b>Hello</b> <i>world</i></p>\n<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
        let html = serialize_html(&dom.document).unwrap();
        assert!(html.contains("<p><b>Hello</b> <i>world</i></p><ul><li>a</li><li>b</li></ul>"));
    }
}
