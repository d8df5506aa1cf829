//! Grammar-safe tokens and label text.
//!
//! # Responsibility
//! - Map opaque person ids to flowchart node tokens.
//! - Strip characters from free text that would break label delimiters.
//!
//! # Invariants
//! - `node_token` is injective: distinct ids never share a token.
//! - Node tokens start with `N_`; synthesizer-internal tokens use other
//!   prefixes, so the two families cannot collide.
//! - Sanitized label text never contains `<`, `>` or `"`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Prefix of every person node token.
pub const NODE_TOKEN_PREFIX: &str = "N_";
/// Prefix of marriage merge-node tokens.
pub const MERGE_TOKEN_PREFIX: &str = "M_";
/// Prefix of marriage grouping blocks.
pub const MARRIAGE_GROUP_PREFIX: &str = "SG_";

static LABEL_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>"]"#).expect("valid label delimiter regex"));
static URL_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>"'\s]"#).expect("valid url delimiter regex"));
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid line break regex"));

/// Returns the node token for a person id.
///
/// ASCII letters and digits are kept. Every other character, `_` included,
/// becomes `_<hex code point>_`, so the mapping can be reversed and two ids
/// can never meet on the same token.
pub fn node_token(id: &str) -> String {
    let mut token = String::with_capacity(NODE_TOKEN_PREFIX.len() + id.len());
    token.push_str(NODE_TOKEN_PREFIX);
    for ch in id.chars() {
        if ch.is_ascii_alphanumeric() {
            token.push(ch);
        } else {
            token.push('_');
            token.push_str(&format!("{:x}", u32::from(ch)));
            token.push('_');
        }
    }
    token
}

/// Removes label delimiters and line breaks from free text.
pub fn sanitize_text(value: &str) -> String {
    let single_line = LINE_BREAK_RE.replace_all(value, " ");
    LABEL_DELIMITER_RE.replace_all(&single_line, "").into_owned()
}

/// Removes quotes, angle brackets and whitespace from an image reference.
pub fn sanitize_url(value: &str) -> String {
    URL_DELIMITER_RE.replace_all(value.trim(), "").into_owned()
}

/// Canonical unordered pair of node tokens identifying one marriage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    low: String,
    high: String,
}

impl PairKey {
    /// Builds the key; argument order does not matter.
    pub fn new(a: String, b: String) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Builds the key for two raw person ids.
    pub fn for_ids(a: &str, b: &str) -> Self {
        Self::new(node_token(a), node_token(b))
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }
}

impl Display for PairKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.low, self.high)
    }
}
