//! Glob-style name matching for override keys
//!
//! Override keys may contain `*`, which matches any run of characters
//! (including none). Everything else in a key is literal.

use regex::Regex;

/// Test whether `name` matches `pattern`.
///
/// A pattern without `*` degenerates to strict string equality. Otherwise
/// the pattern is split on `*`, each literal fragment is regex-escaped and
/// the fragments are joined with `.*`, anchored at both ends.
///
/// Matching is case-sensitive; callers lowercase names before asking.
///
/// # Example
///
/// ```
/// use pixelface::wildcard::matches;
///
/// assert!(matches("*zombie*", "baby_zombie"));
/// assert!(!matches("zombie", "zombie_villager"));
/// ```
pub fn matches(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern).is_match(name)
}

/// Whether a key contains a wildcard at all.
pub fn is_pattern(key: &str) -> bool {
    key.contains('*')
}

/// A key compiled once for repeated matching.
///
/// Override maps build these when they are loaded so that lookups on the
/// request path never construct a regex.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// No `*`: strict equality
    Literal(String),
    /// Anchored expression built from the `*`-separated fragments
    Glob(Regex),
    /// The expression exceeded the regex size limit; matches nothing
    Invalid,
}

impl Pattern {
    pub fn new(pattern: &str) -> Self {
        if !is_pattern(pattern) {
            return Pattern::Literal(pattern.to_string());
        }
        let body = pattern.split('*').map(regex::escape).collect::<Vec<_>>().join(".*");
        // Escaped fragments always form a valid expression; only the size
        // limit can reject them.
        match Regex::new(&format!("^{}$", body)) {
            Ok(re) => Pattern::Glob(re),
            Err(_) => Pattern::Invalid,
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Pattern::Literal(literal) => literal == name,
            Pattern::Glob(re) => re.is_match(name),
            Pattern::Invalid => false,
        }
    }
}
