//! # Spider Condense
//!
//! Condense HTML before sending it to LLM models.
//!
//! Two engines do the heavy lifting:
//!
//! - [`classify`] decides whether a class token or id was generated by a
//!   build tool or CSS-in-JS runtime, so the filter phase can drop it.
//! - [`deduplicate`] collapses repeated siblings to one representative per
//!   badge variant and leaves a marker with the counts.
//!
//! The [`Condenser`] runs the full pipeline: parse, filter, deduplicate,
//! remove empty elements and serialize.
//!
//! ```
//! use spider_condense::condense_html;
//!
//! let html = r#"<ul>
//!   <li class="item css-1a2b3c"><p>The first product, described at a length past forty</p></li>
//!   <li class="item css-9z8y7x"><p>The second product, described at a length past forty</p></li>
//!   <li class="item css-4d5e6f"><p>The third product, described at a length past forty</p></li>
//! </ul>"#;
//!
//! let condensed = condense_html(html).unwrap();
//! assert!(condensed.contains("<!-- 3× item -->"));
//! assert!(!condensed.contains("css-"));
//! ```

pub mod badges;
pub mod classify;
pub mod cleanup;
pub mod config;
pub mod dedup;
pub mod dom;
pub mod error;
pub mod filter;
pub mod serialize;
pub mod signature;

pub use badges::{extract_badges, BadgeKey, BadgeSet};
pub use classify::{classify, is_word_like, ClassifierRules};
pub use config::{CondenseConfig, DedupConfig, FilterConfig, MarkerStyle};
pub use dedup::{deduplicate, DedupMarker, DedupStats};
pub use error::{Error, Result};
pub use filter::FilterStats;
pub use signature::{signature, ElementSignature};

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;
use serde::Serialize;

/// Counters for one pipeline run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CondenseStats {
    /// Input size in bytes.
    pub input_bytes: usize,
    /// Output size in bytes.
    pub output_bytes: usize,
    /// Filter phase counters.
    pub filter: FilterStats,
    /// Deduplication counters.
    pub dedup: DedupStats,
    /// Empty elements removed.
    pub empty_removed: usize,
}

/// A condensed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condensed {
    /// The condensed HTML.
    pub html: String,
    /// What the run did.
    pub stats: CondenseStats,
}

/// The condense pipeline with compiled rules. Reusable across documents.
#[derive(Debug, Clone)]
pub struct Condenser {
    config: CondenseConfig,
    rules: ClassifierRules,
    filter: FilterConfig,
    dedup: DedupConfig,
}

impl Default for Condenser {
    fn default() -> Self {
        let config = CondenseConfig::default();

        Self {
            filter: config.filter_config(),
            dedup: config.dedup_config(),
            rules: ClassifierRules::default(),
            config,
        }
    }
}

impl Condenser {
    /// Validate the configuration and compile the classifier rules.
    pub fn new(config: CondenseConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            rules: config.classifier_rules()?,
            filter: config.filter_config(),
            dedup: config.dedup_config(),
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &CondenseConfig {
        &self.config
    }

    /// The compiled classifier rules.
    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    /// Run the pipeline over one document.
    pub fn condense(&self, html: &str) -> Result<Condensed> {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        // classification has to run first so hashed classes do not split groups
        let filter = filter::filter_document(&dom.document, &self.filter, &self.rules);

        let dedup = if self.config.dedupe {
            deduplicate(&dom.document, &self.dedup)
        } else {
            DedupStats::default()
        };

        let empty_removed = cleanup::remove_empty_elements(&dom.document);
        let html_out = serialize::serialize_html(&dom.document)?;

        let stats = CondenseStats {
            input_bytes: html.len(),
            output_bytes: html_out.len(),
            filter,
            dedup,
            empty_removed,
        };

        log::info!(
            "condensed {} bytes to {} bytes ({} groups collapsed)",
            stats.input_bytes,
            stats.output_bytes,
            stats.dedup.groups
        );

        Ok(Condensed {
            html: html_out,
            stats,
        })
    }
}

/// Condense HTML with the default configuration.
pub fn condense_html(html: &str) -> Result<String> {
    Ok(Condenser::default().condense(html)?.html)
}
