//! Badge and variant text extraction.
//!
//! Structurally identical siblings can still differ in a short label such as
//! "New", "Sold out" or a button caption. Those strings are collected so the
//! deduplication engine keeps one representative per variant.

use crate::dom;
use indexmap::IndexSet;
use markup5ever_rcdom::{Handle, NodeData};
use phf::phf_set;

/// Attributes read as badge candidates.
const BADGE_ATTRIBUTES: &[&str] = &["aria-label", "title", "placeholder"];

/// Class segments marking an element as a badge holder.
static BADGE_CLASS_WORDS: phf::Set<&'static str> = phf_set! {
    "badge", "label", "tag", "chip", "status", "indicator", "pill", "flag",
    "ribbon", "overlay",
};

/// Tags whose own text is always a badge candidate. `link` is a void head
/// element and never yields text; anchors only contribute through their
/// `title` or `aria-label` attributes.
static INTERACTIVE_TAGS: phf::Set<&'static str> = phf_set! {
    "button", "link", "input", "select", "option",
};

/// Badge strings must be shorter than this many chars.
pub const MAX_BADGE_CHARS: usize = 60;
/// The whole-text fallback must be shorter than this many chars.
pub const MAX_FALLBACK_CHARS: usize = 40;

/// Separator for joined badge keys.
const KEY_SEPARATOR: char = '\u{1f}';

/// Grouping key derived from a [`BadgeSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BadgeKey {
    /// No badges were found.
    Empty,
    /// Sorted badges joined.
    Joined(String),
}

/// Distinct badge strings in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeSet(IndexSet<String>);

impl BadgeSet {
    /// Add a candidate if it is non-empty and shorter than `max_chars`.
    fn offer(&mut self, candidate: &str, max_chars: usize) {
        let candidate = candidate.trim();
        let len = candidate.chars().count();

        if len > 0 && len < max_chars && !self.0.contains(candidate) {
            self.0.insert(candidate.to_string());
        }
    }

    /// No badges found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of badges.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Badges in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Does the set hold the badge.
    pub fn contains(&self, badge: &str) -> bool {
        self.0.contains(badge)
    }

    /// The canonical grouping key.
    pub fn key(&self) -> BadgeKey {
        if self.0.is_empty() {
            return BadgeKey::Empty;
        }

        let mut badges: Vec<&str> = self.iter().collect();
        badges.sort_unstable();

        let mut key = String::new();
        for (i, badge) in badges.iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(badge);
        }

        BadgeKey::Joined(key)
    }
}

/// Does a class token name a badge holder, ex: `badge`, `product-status`, `chip_new`.
fn is_badge_class(class: &str) -> bool {
    class
        .split(['-', '_'])
        .any(|segment| BADGE_CLASS_WORDS.contains(segment.to_ascii_lowercase().as_str()))
}

fn holds_badge_text(handle: &Handle) -> bool {
    match dom::tag_name(handle) {
        Some(tag) if INTERACTIVE_TAGS.contains(tag) => true,
        Some(_) => dom::class_list(handle).iter().any(|c| is_badge_class(c)),
        None => false,
    }
}

/// Collect the badges of an element and its whole subtree.
pub fn extract_badges(handle: &Handle) -> BadgeSet {
    let mut set = BadgeSet::default();
    let mut stack = vec![handle.clone()];

    while let Some(node) = stack.pop() {
        if let NodeData::Element { ref attrs, .. } = node.data {
            for attr in attrs.borrow().iter() {
                if BADGE_ATTRIBUTES.contains(&&*attr.name.local) {
                    set.offer(&attr.value, MAX_BADGE_CHARS);
                }
            }

            if holds_badge_text(&node) {
                set.offer(&dom::own_text(&node), MAX_BADGE_CHARS);
            }
        }

        stack.extend(
            node.children
                .borrow()
                .iter()
                .rev()
                .filter(|child| dom::is_element(child))
                .cloned(),
        );
    }

    if set.is_empty() {
        set.offer(&dom::full_text(handle), MAX_FALLBACK_CHARS);
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{find_by_id, parse};

    fn badges_of(html: &str) -> BadgeSet {
        let dom = parse(html);
        let node = find_by_id(&dom.document, "root").unwrap();
        extract_badges(&node)
    }

    #[test]
    fn test_badge_class_text() {
        let set = badges_of(
            r#"<div id="root"><h3>A long product name that is way past the fallback</h3><span class="product-badge">New</span></div>"#,
        );
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["New"]);
    }

    #[test]
    fn test_attributes_and_interactive() {
        let set = badges_of(
            r#"<div id="root"><a title="Open details">x</a><button aria-label="Add">+ <b>cart</b></button><input placeholder="Email"></div>"#,
        );
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["Open details", "Add", "+", "Email"]
        );
    }

    #[test]
    fn test_own_text_only() {
        let set = badges_of(
            r#"<div id="root"><span class="status">Live <em>now and forever more, with a very long trailing description</em></span></div>"#,
        );
        assert!(set.contains("Live"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_fallback_short_text() {
        let set = badges_of(r#"<li id="root">Home</li>"#);
        assert_eq!(set.key(), BadgeKey::Joined("Home".into()));
    }

    #[test]
    fn test_fallback_long_text_is_empty() {
        let set = badges_of(
            r#"<li id="root">A paragraph of text that runs well beyond forty characters.</li>"#,
        );
        assert!(set.is_empty());
        assert_eq!(set.key(), BadgeKey::Empty);
    }

    #[test]
    fn test_key_is_order_independent() {
        let a = badges_of(r#"<div id="root"><i class="tag">b</i><i class="tag">a</i></div>"#);
        let b = badges_of(r#"<div id="root"><i class="tag">a</i><i class="tag">b</i></div>"#);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_tagline_is_not_badge() {
        assert!(!is_badge_class("tagline"));
        assert!(is_badge_class("Status-pill"));
    }

    #[test]
    fn test_anchor_text_needs_attribute() {
        let plain = badges_of(
            r#"<div id="root"><p>A long product name that is way past the fallback</p><a href="/p">View</a></div>"#,
        );
        assert!(plain.is_empty());

        let labelled = badges_of(
            r#"<div id="root"><p>A long product name that is way past the fallback</p><a href="/p" aria-label="View deal">View</a></div>"#,
        );
        assert_eq!(labelled.iter().collect::<Vec<_>>(), vec!["View deal"]);
    }
}
