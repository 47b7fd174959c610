//! URL slug shape

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Lower-case, collapse runs of non-alphanumerics into `-`, trim `-` at both ends.
///
/// Uniqueness is not handled here; the store resolves collisions.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_ALNUM.replace_all(&lower, "-").trim_matches('-').to_string()
}

/// `base`, then `base-2`, `base-3`, ... for collision resolution
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}
