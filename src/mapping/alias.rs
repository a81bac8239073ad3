//! Lexical classification of corpus alias strings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Pattern for CAS registry numbers, cf. https://en.wikipedia.org/wiki/CAS_Registry_Number
    ///
    /// Two to seven digits, hyphen, two digits, hyphen, one digit.  The check
    /// digit is not verified.
    static ref CAS_RE: Regex = Regex::new(r"^\d{2,7}-\d{2}-\d$").expect("invalid regex");
}

/// Recognized kind of an alias string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum AliasKind {
    /// A ChEBI identifier, e.g., `CHEBI:16236`.
    Chebi,
    /// A CAS registry number, e.g., `50-00-0`.
    Cas,
    /// Any other synonym string.
    Other,
}

/// Classify the given alias string.
///
/// Total over all inputs; a string that is neither a ChEBI identifier nor a
/// CAS registry number classifies as `Other`.  The two recognized patterns
/// cannot overlap (the `CHEBI:` prefix is not a digit).
///
/// # Arguments
///
/// * `alias` - The raw alias string from the corpus.
///
/// # Returns
///
/// The `AliasKind` of the alias.
pub fn classify(alias: &str) -> AliasKind {
    if alias.starts_with("CHEBI:") {
        AliasKind::Chebi
    } else if CAS_RE.is_match(alias) {
        AliasKind::Cas
    } else {
        AliasKind::Other
    }
}
