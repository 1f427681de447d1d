//! Generated identifier detection.
//!
//! Decides whether a class token or id value was produced by a build tool,
//! CSS-in-JS runtime or template engine rather than written by a developer.
//! Generated identifiers carry no meaning for a reader and are dropped by the
//! filter phase before deduplication runs.

use crate::error::Result;
use lazy_static::lazy_static;
use phf::phf_set;
use regex::{Regex, RegexSet};
use std::collections::HashSet;

/// Common developer-authored words. A case-insensitive exact match is never
/// treated as generated.
pub static SEMANTIC_WORDS: phf::Set<&'static str> = phf_set! {
    "active", "alert", "article", "author", "avatar", "badge", "banner", "body",
    "bottom", "breadcrumb", "btn", "button", "caption", "card", "center",
    "checkbox", "clearfix", "closed", "col", "column", "comment", "container",
    "content", "danger", "date", "description", "dialog", "disabled", "dropdown",
    "error", "even", "field", "first", "footer", "form", "grid", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hero", "hidden", "icon", "image", "img",
    "info", "input", "item", "label", "large", "last", "left", "link", "list",
    "loader", "logo", "main", "menu", "message", "meta", "modal", "nav",
    "navbar", "navigation", "notification", "odd", "open", "overlay",
    "pagination", "panel", "player", "post", "price", "primary", "product",
    "profile", "radio", "right", "row", "search", "secondary", "section",
    "select", "selected", "sidebar", "small", "spinner", "status", "subtitle",
    "success", "summary", "tab", "table", "tabs", "tag", "text", "thumbnail",
    "time", "title", "toggle", "tooltip", "top", "user", "video", "visible",
    "warning", "wrapper",
};

/// Signatures of framework and build tool output.
pub const SIGNATURE_PATTERNS: &[&str] = &[
    // emotion / css-in-js hashes
    r"^css-[a-z0-9]*\d[a-z0-9]*$",
    // styled-components
    r"^sc-[A-Za-z0-9]+$",
    r"^[A-Za-z]+-sc-[A-Za-z0-9]+$",
    // jss / material makeStyles
    r"^jss\d+$",
    r"^(?:makeStyles|withStyles)-[A-Za-z]+-\d+$",
    // scoped styles
    r"^data-v-[0-9a-f]{6,}$",
    r"^svelte-[a-z0-9]+$",
    r"^astro-[a-z0-9]{8}$",
    // angular content and host markers
    r"^_ng(?:content|host)-[a-z0-9-]+$",
    r"^ng-tns-c\d+-\d+$",
    // runtime ids
    r"^ember\d+$",
    r"^yui_[0-9_]+$",
    r"^:r[0-9a-z]+:$",
    // css modules and bundler internals
    r"^[A-Za-z][A-Za-z0-9]*_[A-Za-z][A-Za-z0-9-]*__[A-Za-z0-9_-]{5}$",
    r"^_[A-Za-z0-9_-]*\d[A-Za-z0-9_-]*$",
];

lazy_static! {
    static ref DEFAULT_SIGNATURES: RegexSet =
        RegexSet::new(SIGNATURE_PATTERNS).expect("valid regex pattern");
    static ref TRAILING_SUFFIX: Regex =
        Regex::new(r"[-_]([A-Za-z0-9]{6,})$").expect("valid regex pattern");
    static ref UNDERSCORE_NUMBERS: Regex =
        Regex::new(r"[A-Za-z]+(?:_\d+){2,}$").expect("valid regex pattern");
    static ref NUMERIC_ID: Regex =
        Regex::new(r"^(?:\d+|[A-Za-z]\d+|\d+[A-Za-z])$").expect("valid regex pattern");
    static ref LETTERS_DIGITS: Regex =
        Regex::new(r"[A-Za-z]+\d{3,}").expect("valid regex pattern");
    static ref HEX_RUN: Regex = Regex::new(r"[0-9A-Fa-f]{8,}").expect("valid regex pattern");
}

/// Max `-`/`_` segments before a token counts as utility soup.
const MAX_SEGMENTS: usize = 6;
/// Share of word-like segments a multi-word token needs.
const MIN_WORD_RATIO: f32 = 0.3;

/// The classifier configuration: allow-list words and signature patterns.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    /// Lower-cased words added to [`SEMANTIC_WORDS`].
    extra_words: HashSet<String>,
    /// Framework signatures.
    signatures: RegexSet,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            extra_words: HashSet::new(),
            signatures: DEFAULT_SIGNATURES.clone(),
        }
    }
}

impl ClassifierRules {
    /// Build rules from the defaults plus extra allow-list words and extra
    /// signature patterns.
    pub fn new<W, P>(extra_words: W, extra_patterns: P) -> Result<Self>
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let extra_words = extra_words
            .into_iter()
            .map(|w| w.as_ref().to_ascii_lowercase())
            .collect();

        let patterns: Vec<String> = SIGNATURE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(extra_patterns.into_iter().map(|p| p.as_ref().to_string()))
            .collect();

        Ok(Self {
            extra_words,
            signatures: RegexSet::new(&patterns)?,
        })
    }

    /// Case-insensitive allow-list check.
    pub fn is_semantic_word(&self, token: &str) -> bool {
        let lower = token.to_ascii_lowercase();
        SEMANTIC_WORDS.contains(lower.as_str()) || self.extra_words.contains(&lower)
    }

    /// Does the token match a framework signature.
    pub fn matches_signature(&self, token: &str) -> bool {
        self.signatures.is_match(token)
    }
}

/// Split a token into its `-`/`_` delimited segments, skipping empties.
fn segments(token: &str) -> impl Iterator<Item = &str> {
    token.split(['-', '_']).filter(|s| !s.is_empty())
}

#[inline]
fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Does a segment read like a human word.
pub fn is_word_like(segment: &str) -> bool {
    if segment.chars().count() < 2 {
        return false;
    }

    let mut letters = 0usize;
    let mut digits = 0usize;
    let mut vowels = 0usize;
    let mut consonant_run = 0usize;
    let mut repeat_run = 0usize;
    let mut prev: Option<char> = None;

    for c in segment.chars() {
        let lower = c.to_ascii_lowercase();

        if c.is_ascii_digit() {
            digits += 1;
        } else if c.is_alphabetic() {
            letters += 1;
        }

        if c.is_ascii_alphabetic() && !is_vowel(c) {
            consonant_run += 1;
            if consonant_run >= 4 {
                return false;
            }
        } else {
            consonant_run = 0;
        }

        if is_vowel(c) {
            vowels += 1;
        }

        repeat_run = if prev == Some(lower) { repeat_run + 1 } else { 1 };
        if repeat_run >= 3 {
            return false;
        }
        prev = Some(lower);
    }

    digits <= letters && vowels > 0
}

/// Hex-looking run of 8+ characters holding at least one digit.
fn has_hex_run(token: &str) -> bool {
    HEX_RUN
        .find_iter(token)
        .any(|m| m.as_str().bytes().any(|b| b.is_ascii_digit()))
}

/// Is the class token or id value machine generated.
pub fn classify(token: &str, rules: &ClassifierRules) -> bool {
    let token = token.trim();

    if token.is_empty() || rules.is_semantic_word(token) {
        return false;
    }

    let generated = rules.matches_signature(token)
        || TRAILING_SUFFIX
            .captures(token)
            .and_then(|caps| caps.get(1))
            .map_or(false, |suffix| !is_word_like(suffix.as_str()))
        || UNDERSCORE_NUMBERS.is_match(token)
        || NUMERIC_ID.is_match(token)
        || segments(token).count() > MAX_SEGMENTS
        || LETTERS_DIGITS.is_match(token)
        || has_hex_run(token)
        || mostly_gibberish(token);

    log::trace!("identifier {:?} generated={}", token, generated);

    generated
}

/// More than two segments with under 30% of them word-like.
fn mostly_gibberish(token: &str) -> bool {
    let words: Vec<&str> = segments(token).collect();

    if words.len() <= 2 {
        return false;
    }

    let word_like = words.iter().filter(|w| is_word_like(w)).count();

    (word_like as f32) / (words.len() as f32) < MIN_WORD_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(token: &str) -> bool {
        classify(token, &ClassifierRules::default())
    }

    #[test]
    fn test_allow_list_case_insensitive() {
        assert!(!generated("Content"));
        assert!(!generated("content"));
        assert!(!generated("NAV"));
        assert!(!generated("h2"));
    }

    #[test]
    fn test_known_tokens() {
        assert!(generated("css-1a2b3c"));
        assert!(!generated("video-title"));
        assert!(generated("d2l_1_7_757"));
        assert!(generated("ember1234"));
        assert!(!generated("is-active"));
    }

    #[test]
    fn test_framework_signatures() {
        assert!(generated("sc-bdVaJa"));
        assert!(generated("Header-sc-1xyz9"));
        assert!(generated("jss12"));
        assert!(generated("data-v-7ba5bd90"));
        assert!(generated("svelte-1kd3lp"));
        assert!(generated("_ngcontent-c14"));
        assert!(generated("ng-tns-c12-3"));
        assert!(generated(":r1:"));
        assert!(generated("Button_primary__a1B2c"));
    }

    #[test]
    fn test_structural_rules() {
        // trailing hash
        assert!(generated("card-x7kq2z"));
        assert!(!generated("card-header"));
        // numeric ids
        assert!(generated("12345"));
        assert!(generated("a12"));
        assert!(generated("12a"));
        // utility soup
        assert!(generated("p-4-m-2-flex-col-gap"));
        // hex run
        assert!(generated("theme-5f3e2a1b"));
        // mostly gibberish words
        assert!(generated("qz-xv-kw"));
        assert!(!generated("product-card-title"));
    }

    #[test]
    fn test_empty_token() {
        assert!(!generated(""));
        assert!(!generated("   "));
    }

    #[test]
    fn test_word_like() {
        assert!(is_word_like("button"));
        assert!(!is_word_like("xyzzqq"));
        assert!(!is_word_like("a"));
        assert!(!is_word_like("aaab"));
        assert!(!is_word_like("ab123"));
        assert!(is_word_like("my"));
    }

    #[test]
    fn test_extra_rules() {
        let rules = ClassifierRules::new(["Widgetzzz"], [r"^tw-[0-9a-f]+$"]).unwrap();
        assert!(!classify("widgetzzz", &rules));
        assert!(classify("tw-abc", &rules));
        assert!(ClassifierRules::new(Vec::<String>::new(), ["("]).is_err());
    }
}
