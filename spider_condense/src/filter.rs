//! Attribute filtering phase.
//!
//! Runs before deduplication: drops noise elements and comments, keeps only
//! allow-listed attributes, removes generated class tokens and ids, and
//! truncates long URLs and text.

use crate::classify::{classify, ClassifierRules};
use crate::config::FilterConfig;
use crate::dom;
use markup5ever_rcdom::{Handle, NodeData};
use serde::Serialize;
use tendril::StrTendril;

/// Appended to anything cut short.
pub const ELLIPSIS: char = '…';

/// Counters for one filter run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Elements and comments removed with their subtree.
    pub nodes_removed: usize,
    /// Attributes dropped by the allow-list.
    pub attributes_removed: usize,
    /// Generated class tokens and ids dropped.
    pub identifiers_removed: usize,
    /// URLs and text nodes truncated.
    pub truncated: usize,
}

/// Cut `text` to `max` chars plus an ellipsis. `None` when it already fits.
pub fn truncate_chars(text: &str, max: usize) -> Option<String> {
    match text.char_indices().nth(max) {
        Some((end, _)) => {
            let mut out = String::with_capacity(end + ELLIPSIS.len_utf8());
            out.push_str(&text[..end]);
            out.push(ELLIPSIS);
            Some(out)
        }
        _ => None,
    }
}

/// Shorten a URL. `data:` URIs are always collapsed.
pub fn truncate_url(url: &str, max: usize) -> Option<String> {
    if url.starts_with("data:") {
        let collapsed = format!("data:{}", ELLIPSIS);
        return if url == collapsed { None } else { Some(collapsed) };
    }
    truncate_chars(url, max)
}

struct Filter<'a> {
    config: &'a FilterConfig,
    rules: &'a ClassifierRules,
    stats: FilterStats,
}

impl Filter<'_> {
    fn strips(&self, child: &Handle) -> bool {
        match child.data {
            NodeData::Comment { .. } | NodeData::ProcessingInstruction { .. } => true,
            NodeData::Element { ref name, .. } => {
                self.config.strip_tags.iter().any(|t| t == &*name.local)
            }
            _ => false,
        }
    }

    fn filter_children(&mut self, node: &Handle) {
        let children: Vec<Handle> = node.children.borrow().clone();
        let before = children.len();
        let kept: Vec<Handle> = children.into_iter().filter(|c| !self.strips(c)).collect();

        if kept.len() != before {
            self.stats.nodes_removed += before - kept.len();
            dom::replace_children(node, kept);
        }

        if let Some(max) = self.config.max_text_length {
            for child in node.children.borrow().iter() {
                if let NodeData::Text { ref contents } = child.data {
                    let truncated = truncate_chars(&contents.borrow(), max);
                    if let Some(text) = truncated {
                        *contents.borrow_mut() = StrTendril::from(text);
                        self.stats.truncated += 1;
                    }
                }
            }
        }
    }

    fn filter_attributes(&mut self, node: &Handle) {
        let attrs = match node.data {
            NodeData::Element { ref attrs, .. } => attrs,
            _ => return,
        };
        let mut attrs = attrs.borrow_mut();

        let before = attrs.len();
        attrs.retain(|attr| {
            self.config
                .keep_attributes
                .iter()
                .any(|keep| keep == &*attr.name.local)
        });
        self.stats.attributes_removed += before - attrs.len();

        for attr in attrs.iter_mut() {
            let name: &str = &attr.name.local;

            match name {
                "class" if self.config.filter_generated => {
                    let tokens: Vec<&str> = attr.value.split_whitespace().collect();
                    let kept: Vec<&str> = tokens
                        .iter()
                        .copied()
                        .filter(|token| !classify(token, self.rules))
                        .collect();

                    if kept.len() != tokens.len() {
                        self.stats.identifiers_removed += tokens.len() - kept.len();
                        let value = kept.join(" ");
                        attr.value = StrTendril::from(value);
                    }
                }
                "id" if self.config.filter_generated => {
                    if classify(&attr.value, self.rules) {
                        self.stats.identifiers_removed += 1;
                        attr.value = StrTendril::new();
                    }
                }
                "href" | "src" => {
                    if let Some(max) = self.config.max_url_length {
                        if let Some(url) = truncate_url(&attr.value, max) {
                            attr.value = StrTendril::from(url);
                            self.stats.truncated += 1;
                        }
                    }
                }
                _ => (),
            }
        }

        attrs.retain(|attr| {
            !matches!(&*attr.name.local, "class" | "id") || !attr.value.trim().is_empty()
        });
    }
}

/// Run the filter phase over the whole tree below `root`.
pub fn filter_document(
    root: &Handle,
    config: &FilterConfig,
    rules: &ClassifierRules,
) -> FilterStats {
    let mut filter = Filter {
        config,
        rules,
        stats: FilterStats::default(),
    };

    dom::walk(root, &mut |node: &Handle| {
        filter.filter_attributes(node);
        filter.filter_children(node);
    });

    log::debug!("filter phase: {:?}", filter.stats);

    filter.stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{find_by_id, parse};

    fn run(html: &str, config: &FilterConfig) -> (markup5ever_rcdom::RcDom, FilterStats) {
        let dom = parse(html);
        let stats = filter_document(&dom.document, config, &ClassifierRules::default());
        (dom, stats)
    }

    #[test]
    fn test_strip_noise() {
        let (dom, stats) = run(
            r#"<div id="main"><script>x()</script><!-- hi --><style>.a{}</style><p>Hello</p></div>"#,
            &FilterConfig::default(),
        );
        let main = find_by_id(&dom.document, "main").unwrap();
        assert_eq!(dom::element_children(&main).len(), 1);
        assert_eq!(main.children.borrow().len(), 1);
        assert_eq!(stats.nodes_removed, 3);
    }

    #[test]
    fn test_generated_identifiers_removed() {
        let (dom, stats) = run(
            r#"<div id="main"><p id="p" class="css-1a2b3c title jss12" style="color:red" onclick="go()">Hi</p><span id="ember1234" class="sc-bdVaJa">x</span></div>"#,
            &FilterConfig::default(),
        );
        let p = find_by_id(&dom.document, "p").unwrap();
        assert_eq!(dom::get_attr(&p, "class").as_deref(), Some("title"));
        assert_eq!(dom::get_attr(&p, "style"), None);
        assert_eq!(dom::get_attr(&p, "onclick"), None);
        assert!(find_by_id(&dom.document, "ember1234").is_none());

        let main = find_by_id(&dom.document, "main").unwrap();
        let span = dom::element_children(&main).pop().unwrap();
        assert_eq!(dom::get_attr(&span, "class"), None);
        assert_eq!(stats.identifiers_removed, 4);
        assert_eq!(stats.attributes_removed, 2);
    }

    #[test]
    fn test_keep_generated_when_disabled() {
        let config = FilterConfig {
            filter_generated: false,
            ..Default::default()
        };
        let (dom, _) = run(r#"<p id="p" class="css-1a2b3c">Hi</p>"#, &config);
        let p = find_by_id(&dom.document, "p").unwrap();
        assert_eq!(dom::get_attr(&p, "class").as_deref(), Some("css-1a2b3c"));
    }

    #[test]
    fn test_truncation() {
        let config = FilterConfig {
            max_url_length: Some(10),
            max_text_length: Some(5),
            ..Default::default()
        };
        let (dom, stats) = run(
            r#"<p id="p">Hello world<a id="a" href="https://example.com/very/long"></a><img id="i" src="data:image/png;base64,AAAA"></p>"#,
            &config,
        );
        let p = find_by_id(&dom.document, "p").unwrap();
        let a = find_by_id(&dom.document, "a").unwrap();
        let img = find_by_id(&dom.document, "i").unwrap();

        assert_eq!(dom::own_text(&p), "Hello…");
        assert_eq!(dom::get_attr(&a, "href").as_deref(), Some("https://ex…"));
        assert_eq!(dom::get_attr(&img, "src").as_deref(), Some("data:…"));
        assert_eq!(stats.truncated, 3);
    }

    #[test]
    fn test_truncate_chars_boundary() {
        assert_eq!(truncate_chars("héllo", 2).as_deref(), Some("hé…"));
        assert_eq!(truncate_chars("abc", 3), None);
    }
}
