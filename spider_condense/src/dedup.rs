//! Content-aware structural deduplication.
//!
//! Repeated siblings (product cards, list rows, search results) are grouped by
//! their [`ElementSignature`], then sub-grouped by [`BadgeKey`]. One element
//! per badge variant survives and a marker summarizes the group:
//!
//! ```text
//! <!-- 12× product-card; variants: New ×3, Sold out ×2 -->
//! ```

use crate::badges::{extract_badges, BadgeKey, BadgeSet};
use crate::config::{DedupConfig, MarkerStyle};
use crate::dom::{self, NodeVisitor};
use crate::signature::{signature, ElementSignature};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use markup5ever_rcdom::{Handle, Node, NodeData};
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

lazy_static! {
    /// Leading text of a marker in either style.
    static ref MARKER_PREFIX: Regex = Regex::new(r"^\[?\d+× ").expect("valid regex pattern");
}

/// Summary written in place of a collapsed group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupMarker {
    /// Members in the structural group, removed ones included.
    pub total: usize,
    /// First class token of the first member, else its tag name.
    pub descriptor: String,
    /// Badge strings with the number of members carrying them, in first
    /// occurrence order. Empty unless the group holds two or more badge keys
    /// or badge strings.
    pub variants: Vec<(String, usize)>,
}

impl fmt::Display for DedupMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}× {}", self.total, self.descriptor)?;

        for (i, (badge, count)) in self.variants.iter().enumerate() {
            let sep = if i == 0 { "; variants: " } else { ", " };
            write!(f, "{}{} ×{}", sep, badge, count)?;
        }

        Ok(())
    }
}

impl DedupMarker {
    /// Build the marker node.
    pub fn to_node(&self, style: MarkerStyle) -> Handle {
        match style {
            MarkerStyle::Comment => {
                // "--" would close the comment early.
                let text = self.to_string().replace("--", "- -");
                dom::new_comment(&format!(" {} ", text))
            }
            MarkerStyle::Text => dom::new_text(&format!("[{}]", self)),
        }
    }
}

/// Counters for one deduplication run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    /// Containers whose children were rebuilt.
    pub containers_collapsed: usize,
    /// Structural groups at or above the threshold.
    pub groups: usize,
    /// Elements removed.
    pub elements_removed: usize,
    /// Markers inserted.
    pub markers: usize,
}

/// Is the node a marker written by an earlier run.
fn is_marker(handle: &Handle) -> bool {
    match handle.data {
        NodeData::Comment { ref contents } => MARKER_PREFIX.is_match(contents.trim()),
        NodeData::Text { ref contents } => MARKER_PREFIX.is_match(contents.borrow().trim()),
        _ => false,
    }
}

/// The closest preceding sibling that is not whitespace-only text.
fn previous_sibling(handle: &Handle) -> Option<Handle> {
    let parent = dom::parent(handle)?;
    let children = parent.children.borrow();
    let index = children.iter().position(|child| Rc::ptr_eq(child, handle))?;

    let previous = children[..index]
        .iter()
        .rev()
        .find(|child| match child.data {
            NodeData::Text { ref contents } => !contents.borrow().trim().is_empty(),
            _ => true,
        })
        .cloned();

    previous
}

/// The decision for one structural group, computed before any mutation.
struct GroupPlan {
    first: Handle,
    marker: DedupMarker,
    /// Skipped when the first member already follows a marker.
    insert_marker: bool,
    removed: Vec<Handle>,
}

/// Decide what to keep in a structural group.
fn plan_group(members: Vec<Handle>) -> GroupPlan {
    let badge_sets: Vec<BadgeSet> = members.iter().map(extract_badges).collect();
    let mut by_key: IndexMap<BadgeKey, Vec<usize>> = IndexMap::new();

    for (i, set) in badge_sets.iter().enumerate() {
        by_key.entry(set.key()).or_default().push(i);
    }

    let removed: Vec<Handle> = by_key
        .values()
        .flat_map(|indices| indices.iter().skip(1))
        .map(|&i| members[i].clone())
        .collect();

    let mut counts: IndexMap<&str, usize> = IndexMap::new();

    for set in badge_sets.iter() {
        for badge in set.iter() {
            *counts.entry(badge).or_insert(0) += 1;
        }
    }

    let variants = if by_key.len() >= 2 || counts.len() >= 2 {
        counts
            .into_iter()
            .map(|(badge, count)| (badge.to_string(), count))
            .collect()
    } else {
        Vec::new()
    };

    let first = members[0].clone();
    let descriptor = match dom::class_list(&first).into_iter().next() {
        Some(class) => class,
        _ => dom::tag_name(&first).unwrap_or_default().to_string(),
    };

    let insert_marker = !previous_sibling(&first).map_or(false, |prev| is_marker(&prev));

    GroupPlan {
        marker: DedupMarker {
            total: members.len(),
            descriptor,
            variants,
        },
        insert_marker,
        first,
        removed,
    }
}

/// Rebuild the container's children: markers go in front of each group's
/// first member and removed members are dropped.
fn apply(container: &Handle, plans: &[GroupPlan], style: MarkerStyle) {
    let removed: HashSet<*const Node> = plans
        .iter()
        .flat_map(|plan| plan.removed.iter().map(Rc::as_ptr))
        .collect();
    let markers: HashMap<*const Node, Handle> = plans
        .iter()
        .filter(|plan| plan.insert_marker)
        .map(|plan| (Rc::as_ptr(&plan.first), plan.marker.to_node(style)))
        .collect();

    let current: Vec<Handle> = container.children.borrow().clone();
    let mut rebuilt = Vec::with_capacity(current.len() + markers.len());

    for child in current {
        let ptr = Rc::as_ptr(&child);

        if removed.contains(&ptr) {
            continue;
        }
        if let Some(marker) = markers.get(&ptr) {
            rebuilt.push(marker.clone());
        }
        rebuilt.push(child);
    }

    dom::replace_children(container, rebuilt);
}

struct Deduplicator<'a> {
    config: &'a DedupConfig,
    stats: DedupStats,
}

impl Deduplicator<'_> {
    fn evaluate(&mut self, container: &Handle) {
        let threshold = self.config.min_repeat_count;
        let children = dom::element_children(container);

        if children.len() < threshold {
            return;
        }

        let mut groups: IndexMap<ElementSignature, Vec<Handle>> = IndexMap::new();

        for child in children {
            if let Some(sig) = signature(&child) {
                groups.entry(sig).or_default().push(child);
            }
        }

        let plans: Vec<GroupPlan> = groups
            .into_values()
            .filter(|members| members.len() >= threshold)
            .map(plan_group)
            .collect();

        let mut changed = false;

        for plan in plans.iter() {
            log::debug!(
                "collapsed {} (kept {}, removed {})",
                plan.marker,
                plan.marker.total - plan.removed.len(),
                plan.removed.len()
            );
            self.stats.groups += 1;
            self.stats.elements_removed += plan.removed.len();

            if plan.insert_marker {
                self.stats.markers += 1;
            }
            changed |= plan.insert_marker || !plan.removed.is_empty();
        }

        if changed {
            self.stats.containers_collapsed += 1;
            apply(container, &plans, self.config.marker);
        }
    }
}

impl NodeVisitor for Deduplicator<'_> {
    fn visit(&mut self, node: &Handle) {
        self.evaluate(node)
    }
}

/// Collapse repeated siblings across the whole tree below `root`.
pub fn deduplicate(root: &Handle, config: &DedupConfig) -> DedupStats {
    let mut deduplicator = Deduplicator {
        config,
        stats: DedupStats::default(),
    };

    dom::walk(root, &mut deduplicator);

    deduplicator.stats
}
