//! Thin helpers over the `markup5ever_rcdom` tree.
//!
//! Every phase reads and mutates the document through these functions so
//! parent links stay consistent after detaching or rebuilding children.

use markup5ever_rcdom::{Handle, Node, NodeData};
use std::rc::{Rc, Weak};
use tendril::StrTendril;

/// Visitor called for the document node and every element still attached
/// when the traversal reaches it.
pub trait NodeVisitor {
    /// Visit a node. The visitor may rewrite the node's children; the walk
    /// descends into whatever children remain afterwards.
    fn visit(&mut self, node: &Handle);
}

impl<F: FnMut(&Handle)> NodeVisitor for F {
    fn visit(&mut self, node: &Handle) {
        self(node)
    }
}

/// Top-down depth-first walk with an explicit stack.
pub fn walk<V: NodeVisitor + ?Sized>(root: &Handle, visitor: &mut V) {
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        visitor.visit(&node);

        let children = node.children.borrow();
        stack.extend(
            children
                .iter()
                .rev()
                .filter(|child| is_element(child))
                .cloned(),
        );
    }
}

/// Is the node an element.
#[inline]
pub fn is_element(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Element { .. })
}

/// The local tag name of an element.
pub fn tag_name(handle: &Handle) -> Option<&str> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Get the attribute value of an element.
pub fn get_attr(handle: &Handle, attr_name: &str) -> Option<String> {
    match handle.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Whitespace split class tokens in source order. Missing attribute yields none.
pub fn class_list(handle: &Handle) -> Vec<String> {
    match get_attr(handle, "class") {
        Some(class) => class.split_whitespace().map(String::from).collect(),
        _ => Vec::new(),
    }
}

/// Element children in document order.
pub fn element_children(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

/// Collapse whitespace runs to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }

    out
}

/// Text of the direct text children only.
pub fn own_text(handle: &Handle) -> String {
    let mut text = String::new();

    for child in handle.children.borrow().iter() {
        if let NodeData::Text { ref contents } = child.data {
            text.push_str(&contents.borrow());
        }
    }

    collapse_whitespace(&text)
}

/// Text of the node and all descendants, in document order.
pub fn full_text(handle: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![handle.clone()];

    while let Some(node) = stack.pop() {
        if let NodeData::Text { ref contents } = node.data {
            text.push_str(&contents.borrow());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }

    collapse_whitespace(&text)
}

/// The parent of a node, if still attached.
pub fn parent(handle: &Handle) -> Option<Handle> {
    let weak = handle.parent.take();
    let parent = weak.as_ref().and_then(Weak::upgrade);
    handle.parent.set(weak);
    parent
}

/// Remove a node (and its subtree) from its parent.
pub fn detach(handle: &Handle) {
    if let Some(parent) = handle.parent.take().and_then(|weak| weak.upgrade()) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, handle));
    }
}

/// Replace the children of `parent` in one step, fixing parent links for
/// both the new children and the ones dropped.
pub fn replace_children(parent: &Handle, children: Vec<Handle>) {
    let mut current = parent.children.borrow_mut();

    for old in current.iter() {
        if !children.iter().any(|child| Rc::ptr_eq(child, old)) {
            old.parent.set(None);
        }
    }

    for child in children.iter() {
        child.parent.set(Some(Rc::downgrade(parent)));
    }

    *current = children;
}

/// A detached comment node.
pub fn new_comment(text: &str) -> Handle {
    Node::new(NodeData::Comment {
        contents: StrTendril::from_slice(text),
    })
}

/// A detached text node.
pub fn new_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: std::cell::RefCell::new(StrTendril::from_slice(text)),
    })
}

#[cfg(test)]
pub(crate) fn parse(html: &str) -> markup5ever_rcdom::RcDom {
    use html5ever::tendril::TendrilSink;
    html5ever::parse_document(markup5ever_rcdom::RcDom::default(), Default::default()).one(html)
}

#[cfg(test)]
pub(crate) fn find_by_id(root: &Handle, id: &str) -> Option<Handle> {
    let mut found = None;
    walk(root, &mut |node: &Handle| {
        if found.is_none() && get_attr(node, "id").as_deref() == Some(id) {
            found = Some(node.clone());
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_reads() {
        let dom = parse(r#"<div id="x">  Hello <b>big</b>
            world </div>"#);
        let node = find_by_id(&dom.document, "x").unwrap();
        assert_eq!(own_text(&node), "Hello world");
        assert_eq!(full_text(&node), "Hello big world");
    }

    #[test]
    fn test_class_list_missing() {
        let dom = parse(r#"<p id="x">text</p>"#);
        let node = find_by_id(&dom.document, "x").unwrap();
        assert!(class_list(&node).is_empty());
        assert_eq!(tag_name(&node), Some("p"));
    }

    #[test]
    fn test_detach_and_replace() {
        let dom = parse(r#"<ul id="list"><li id="a"></li><li id="b"></li></ul>"#);
        let list = find_by_id(&dom.document, "list").unwrap();
        let a = find_by_id(&dom.document, "a").unwrap();
        let b = find_by_id(&dom.document, "b").unwrap();

        detach(&a);
        assert!(parent(&a).is_none());
        assert_eq!(element_children(&list).len(), 1);

        let marker = new_comment("marker");
        replace_children(&list, vec![marker.clone(), b.clone()]);
        assert_eq!(list.children.borrow().len(), 2);
        assert!(Rc::ptr_eq(&parent(&marker).unwrap(), &list));
    }
}
