//! Untrusted-input shaping for catalog queries
//!
//! Everything here is total: bad input is replaced with a safe default or an
//! absent constraint, never an error. These are the two hard "never fails"
//! contracts of the engine; the fallbacks are silent and the caller cannot
//! observe which path was taken.

use once_cell::sync::Lazy;
use regex::Regex;
use storepulse_core::catalog::{CatalogFilter, SearchTerm};

/// Default sort expression: newest first by creation order
pub const DEFAULT_SORT: &str = "-createdAt";

static SORT_EXPRESSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-\s]+$").unwrap());

/// Escape every regex metacharacter so `input` can be embedded in a pattern
/// as a literal.
///
/// Identity on strings without metacharacters. For all `s`, the escaped form
/// compiles and matches the literal `s`.
pub fn escape_regex(input: &str) -> String {
    regex::escape(input)
}

/// Allow-list a caller-supplied sort expression.
///
/// Accepts only word characters, hyphens, and whitespace; anything else
/// (including the empty string) silently becomes [`DEFAULT_SORT`].
pub fn validate_sort_expression(input: &str) -> String {
    if SORT_EXPRESSION.is_match(input) {
        input.to_string()
    } else {
        DEFAULT_SORT.to_string()
    }
}

/// Canonicalize a free-text query: trim, collapse internal whitespace runs
/// to single spaces, lowercase. Idempotent.
pub fn normalize_search_query(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True when `input` has the shape of a 24-hex-character object id
pub fn is_object_id(input: &str) -> bool {
    input.len() == 24 && input.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Build a catalog filter from caller-supplied parameters.
///
/// An empty or whitespace-only search produces no search constraint at all
/// (not a match-nothing constraint, and not an empty-pattern regex that
/// matches everything). A non-empty search additionally carries an exact-id
/// alternative when it has object-id shape.
pub fn build_catalog_filter(
    search: &str,
    category_slug: Option<&str>,
    model_number: Option<&str>,
    featured_only: bool,
) -> CatalogFilter {
    let trimmed = search.trim();

    let term = if trimmed.is_empty() {
        None
    } else {
        let id_match = is_object_id(trimmed).then(|| trimmed.to_string());
        Some(SearchTerm::new(
            trimmed.to_string(),
            normalize_search_query(trimmed),
            escape_regex(trimmed),
            id_match,
        ))
    };

    CatalogFilter {
        search: term,
        category_slug: category_slug
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .map(str::to_string),
        model_number: model_number
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .map(str::to_string),
        featured_only,
    }
}
