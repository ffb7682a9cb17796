//! Free-text validation for meal and ingredient names.

use lazy_static::lazy_static;
use regex::Regex;

/// Accepts case-insensitive runs of letters (including accented Latin) and
/// apostrophes, separated by single spaces. Digits and other punctuation are
/// rejected. Every meal name and ingredient name passes through this before
/// it is stored.
pub fn is_valid_text(s: &str) -> bool {
    lazy_static! {
        static ref NAME_RE: Regex =
            Regex::new(r"(?i)^[a-zÀ-ÿ]+(['a-zÀ-ÿ]+)*(\s[a-zÀ-ÿ]+(['a-zÀ-ÿ]+)*)*$").unwrap();
    }
    NAME_RE.is_match(s)
}
