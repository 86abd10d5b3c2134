//! Alternate-query suggestions for zero-result responses.
//!
//! [`suggest`] is pure and never fails: it substring-matches the query
//! against a small fixed keyword table and falls back to a generic list.
//! At most [`MAX_SUGGESTIONS`] strings are returned.

/// Upper bound on suggestions per response.
pub const MAX_SUGGESTIONS: usize = 3;

/// Keyword → suggested alternate queries, first match wins.
const SUGGESTION_TABLE: &[(&str, &[&str])] = &[
    ("nike", &["nike shoes", "nike running shoes", "nike air max"]),
    ("adidas", &["adidas sneakers", "adidas originals", "adidas running"]),
    ("shoe", &["running shoes", "casual sneakers", "leather boots"]),
    ("laptop", &["gaming laptop", "ultrabook", "laptop under 500"]),
    ("phone", &["smartphone", "budget phone", "phone case"]),
    ("watch", &["smart watch", "fitness tracker", "analog watch"]),
    ("headphone", &["wireless headphones", "noise cancelling headphones", "earbuds"]),
];

/// Fallback shown when nothing in the table matches.
const GENERIC_SUGGESTIONS: &[&str] = &["best sellers", "new arrivals", "deals of the day"];

/// Produce up to [`MAX_SUGGESTIONS`] alternate queries for `query`.
pub fn suggest(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();

    for (keyword, suggestions) in SUGGESTION_TABLE {
        if lowered.contains(keyword) {
            return suggestions
                .iter()
                .take(MAX_SUGGESTIONS)
                .map(|s| (*s).to_owned())
                .collect();
        }
    }

    GENERIC_SUGGESTIONS
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|s| (*s).to_owned())
        .collect()
}
