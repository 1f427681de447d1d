//! Empty element removal.
//!
//! Elements are settled bottom-up, so a parent left empty by its children's
//! removal goes in the same pass. One pass reaches the fixed point.

use crate::dom;
use markup5ever_rcdom::{Handle, NodeData};
use phf::phf_set;

/// Elements kept even when empty: void, replaced, form and table cells.
static KEEP_EMPTY: phf::Set<&'static str> = phf_set! {
    "html", "head", "body", "img", "input", "br", "hr", "area", "source",
    "track", "wbr", "col", "video", "audio", "picture", "textarea", "select",
    "button", "td", "th",
};

/// Attributes that carry content on their own.
static CONTENT_ATTRIBUTES: phf::Set<&'static str> = phf_set! {
    "href", "src", "alt", "title", "aria-label", "placeholder", "value", "name",
};

fn is_empty_element(node: &Handle) -> bool {
    let (name, attrs) = match node.data {
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => (name, attrs),
        _ => return false,
    };

    if KEEP_EMPTY.contains(&*name.local) {
        return false;
    }

    if attrs
        .borrow()
        .iter()
        .any(|attr| CONTENT_ATTRIBUTES.contains(&*attr.name.local) && !attr.value.trim().is_empty())
    {
        return false;
    }

    node.children.borrow().iter().all(|child| match child.data {
        NodeData::Text { ref contents } => contents.borrow().trim().is_empty(),
        _ => false,
    })
}

/// Remove empty elements below `root`. Returns the number removed.
pub fn remove_empty_elements(root: &Handle) -> usize {
    let mut removed = 0;
    let mut stack = vec![(root.clone(), false)];

    while let Some((node, settled)) = stack.pop() {
        if settled {
            if is_empty_element(&node) {
                dom::detach(&node);
                removed += 1;
            }
            continue;
        }

        stack.push((node.clone(), true));
        stack.extend(
            node.children
                .borrow()
                .iter()
                .filter(|child| dom::is_element(child))
                .map(|child| (child.clone(), false)),
        );
    }

    log::debug!("removed {} empty elements", removed);

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{find_by_id, parse};

    #[test]
    fn test_nested_empty_in_one_pass() {
        let dom = parse(
            r#"<div id="main"><div class="a"><div class="b"><span> </span></div></div><p>Kept</p></div>"#,
        );
        let removed = remove_empty_elements(&dom.document);
        let main = find_by_id(&dom.document, "main").unwrap();

        assert_eq!(removed, 3);
        assert_eq!(dom::element_children(&main).len(), 1);
        assert_eq!(remove_empty_elements(&dom.document), 0);
    }

    #[test]
    fn test_keeps_void_and_content_attributes() {
        let dom = parse(
            r#"<div id="main"><img src="a.png"><a href="/x"></a><i class="icon"></i><!-- 3× card --></div>"#,
        );
        let removed = remove_empty_elements(&dom.document);
        let main = find_by_id(&dom.document, "main").unwrap();

        assert_eq!(removed, 1);
        assert_eq!(dom::element_children(&main).len(), 2);
    }
}
