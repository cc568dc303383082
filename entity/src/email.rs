//! Address syntax shared by every table that stores an email.

use once_cell::sync::Lazy;
use regex::Regex;

// `\w` is spelled out: the regex crate's `\w` also matches non-ASCII letters.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$",
    )
    .expect("static email pattern")
});

/// Whether `email` is a syntactically valid address. Callers normalize case first.
pub fn is_valid(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
