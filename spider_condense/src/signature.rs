//! Bounded structural fingerprints.

use crate::dom;
use markup5ever_rcdom::Handle;

/// Children summarized per element.
pub const MAX_SIGNATURE_CHILDREN: usize = 5;
/// Classes kept per summarized child.
pub const MAX_CHILD_CLASSES: usize = 3;

/// Shape of one summarized child: tag and its first sorted classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildShape {
    /// Tag name.
    pub tag: String,
    /// At most [`MAX_CHILD_CLASSES`] classes, sorted.
    pub classes: Vec<String>,
}

/// Structural fingerprint of an element. Text is ignored, so two elements
/// with equal signatures are interchangeable for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementSignature {
    /// Tag name.
    pub tag: String,
    /// All classes, sorted.
    pub classes: Vec<String>,
    /// The first [`MAX_SIGNATURE_CHILDREN`] element children.
    pub children: Vec<ChildShape>,
}

fn sorted_classes(handle: &Handle) -> Vec<String> {
    let mut classes = dom::class_list(handle);
    classes.sort_unstable();
    classes
}

/// Build the signature of an element. Non-elements have none.
pub fn signature(handle: &Handle) -> Option<ElementSignature> {
    let tag = dom::tag_name(handle)?.to_string();

    let children = handle
        .children
        .borrow()
        .iter()
        .filter(|child| dom::is_element(child))
        .take(MAX_SIGNATURE_CHILDREN)
        .map(|child| {
            let mut classes = sorted_classes(child);
            classes.truncate(MAX_CHILD_CLASSES);

            ChildShape {
                tag: dom::tag_name(child).unwrap_or_default().to_string(),
                classes,
            }
        })
        .collect();

    Some(ElementSignature {
        tag,
        classes: sorted_classes(handle),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{find_by_id, parse};

    #[test]
    fn test_class_order_ignored() {
        let dom = parse(r#"<div id="a" class="card big"></div><div id="b" class="big card"></div>"#);
        let a = find_by_id(&dom.document, "a").unwrap();
        let b = find_by_id(&dom.document, "b").unwrap();
        assert_eq!(signature(&a), signature(&b));
    }

    #[test]
    fn test_text_ignored() {
        let dom = parse(r#"<li id="a"><span class="name">Alpha</span></li><li id="b"><span class="name">Beta gamma</span></li>"#);
        let a = find_by_id(&dom.document, "a").unwrap();
        let b = find_by_id(&dom.document, "b").unwrap();
        assert_eq!(signature(&a), signature(&b));
    }

    #[test]
    fn test_bounded_children() {
        let dom = parse(
            r#"<div id="a"><i></i><i></i><i></i><i></i><i></i><b></b></div>
               <div id="b"><i></i><i></i><i></i><i></i><i></i><p class="x"></p><p></p></div>"#,
        );
        let a = find_by_id(&dom.document, "a").unwrap();
        let b = find_by_id(&dom.document, "b").unwrap();
        assert_eq!(signature(&a), signature(&b));
        assert_eq!(signature(&a).unwrap().children.len(), MAX_SIGNATURE_CHILDREN);
    }

    #[test]
    fn test_bounded_child_classes() {
        let dom = parse(
            r#"<div id="a"><span class="a b c d"></span></div><div id="b"><span class="c b a z"></span></div>"#,
        );
        let a = find_by_id(&dom.document, "a").unwrap();
        let b = find_by_id(&dom.document, "b").unwrap();
        assert_eq!(signature(&a), signature(&b));
    }

    #[test]
    fn test_shape_differs() {
        let dom = parse(r#"<div id="a"><span></span></div><div id="b"><em></em></div>"#);
        let a = find_by_id(&dom.document, "a").unwrap();
        let b = find_by_id(&dom.document, "b").unwrap();
        assert_ne!(signature(&a), signature(&b));
    }
}
