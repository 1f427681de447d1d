//! Pipeline configuration.
//!
//! Every phase takes its configuration as an explicit value. Nothing is read
//! from ambient or global state.

use crate::classify::ClassifierRules;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default minimum group size for deduplication.
pub const DEFAULT_MIN_REPEAT_COUNT: usize = 3;
/// Default maximum kept length for `href`/`src` values.
pub const DEFAULT_MAX_URL_LENGTH: usize = 100;

/// Elements removed outright by the filter phase.
pub const DEFAULT_STRIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "canvas", "iframe", "link", "meta",
    "object", "embed",
];

/// Attributes kept by the filter phase.
pub const DEFAULT_KEEP_ATTRIBUTES: &[&str] = &[
    "id",
    "class",
    "href",
    "src",
    "alt",
    "title",
    "aria-label",
    "placeholder",
    "name",
    "type",
    "value",
    "role",
    "for",
    "action",
    "colspan",
    "rowspan",
    "lang",
];

/// How a collapsed group marker is written into the document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    #[default]
    /// An HTML comment node.
    Comment,
    /// A plain text node.
    Text,
}

/// Deduplication engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupConfig {
    /// Minimum children of a container, and members of a structural group,
    /// before collapsing is considered.
    pub min_repeat_count: usize,
    /// Marker representation.
    pub marker: MarkerStyle,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            min_repeat_count: DEFAULT_MIN_REPEAT_COUNT,
            marker: MarkerStyle::default(),
        }
    }
}

/// Filter phase settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Elements removed with their subtree.
    pub strip_tags: Vec<String>,
    /// Attributes kept, everything else is dropped.
    pub keep_attributes: Vec<String>,
    /// Drop generated class tokens and ids.
    pub filter_generated: bool,
    /// Truncate `href`/`src` values longer than this.
    pub max_url_length: Option<usize>,
    /// Truncate text nodes longer than this.
    pub max_text_length: Option<usize>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        CondenseConfig::default().filter_config()
    }
}

/// Full pipeline configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CondenseConfig {
    /// Minimum repeat count for deduplication.
    pub min_repeat_count: usize,
    /// Run the deduplication phase.
    pub dedupe: bool,
    /// Drop generated class tokens and ids.
    pub filter_generated: bool,
    /// Elements removed with their subtree.
    pub strip_tags: Vec<String>,
    /// Attributes kept on elements.
    pub keep_attributes: Vec<String>,
    /// Max `href`/`src` length.
    pub max_url_length: Option<usize>,
    /// Max text node length.
    pub max_text_length: Option<usize>,
    /// Marker representation.
    pub marker: MarkerStyle,
    /// Words never treated as generated, on top of the built-in list.
    pub extra_semantic_words: Vec<String>,
    /// Regex patterns always treated as generated, on top of the built-in set.
    pub extra_generated_patterns: Vec<String>,
}

impl Default for CondenseConfig {
    fn default() -> Self {
        Self {
            min_repeat_count: DEFAULT_MIN_REPEAT_COUNT,
            dedupe: true,
            filter_generated: true,
            strip_tags: DEFAULT_STRIP_TAGS.iter().map(|t| t.to_string()).collect(),
            keep_attributes: DEFAULT_KEEP_ATTRIBUTES
                .iter()
                .map(|a| a.to_string())
                .collect(),
            max_url_length: Some(DEFAULT_MAX_URL_LENGTH),
            max_text_length: None,
            marker: MarkerStyle::default(),
            extra_semantic_words: Vec::new(),
            extra_generated_patterns: Vec::new(),
        }
    }
}

impl CondenseConfig {
    /// Decode a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.min_repeat_count < 2 {
            return Err(Error::InvalidConfig(format!(
                "min_repeat_count must be at least 2, got {}",
                self.min_repeat_count
            )));
        }
        if self.max_url_length == Some(0) || self.max_text_length == Some(0) {
            return Err(Error::InvalidConfig(
                "truncation lengths must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Deduplication settings.
    pub fn dedup_config(&self) -> DedupConfig {
        DedupConfig {
            min_repeat_count: self.min_repeat_count,
            marker: self.marker,
        }
    }

    /// Filter settings.
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            strip_tags: self.strip_tags.clone(),
            keep_attributes: self.keep_attributes.clone(),
            filter_generated: self.filter_generated,
            max_url_length: self.max_url_length,
            max_text_length: self.max_text_length,
        }
    }

    /// Compile the classifier rules.
    pub fn classifier_rules(&self) -> Result<ClassifierRules> {
        ClassifierRules::new(&self.extra_semantic_words, &self.extra_generated_patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config = CondenseConfig::from_json(r#"{"min_repeat_count": 4, "marker": "text"}"#)
            .unwrap();
        assert_eq!(config.min_repeat_count, 4);
        assert_eq!(config.marker, MarkerStyle::Text);
        assert!(config.dedupe);
        assert_eq!(config.max_url_length, Some(DEFAULT_MAX_URL_LENGTH));
    }

    #[test]
    fn test_validate() {
        let mut config = CondenseConfig::default();
        assert!(config.validate().is_ok());
        config.min_repeat_count = 1;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_pattern() {
        let config = CondenseConfig {
            extra_generated_patterns: vec!["[".into()],
            ..Default::default()
        };
        assert!(matches!(config.classifier_rules(), Err(Error::Pattern(_))));
    }

    #[test]
    fn test_marker_names() {
        let config = CondenseConfig::from_json(r#"{"marker": "text"}"#).unwrap();
        assert_eq!(config.marker, MarkerStyle::Text);
        assert!(matches!(
            CondenseConfig::from_json(r#"{"marker": "bold"}"#),
            Err(Error::Json(_))
        ));
    }
}
