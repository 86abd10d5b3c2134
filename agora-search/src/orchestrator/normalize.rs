//! Title normalisation for cross-source deduplication.
//!
//! Canonicalises product titles so that listings differing only in
//! punctuation, capitalisation, or whitespace compare as equal, then
//! derives a stable fingerprint from the canonical form.

/// Length of the hex fingerprint derived from a normalised title.
const FINGERPRINT_LEN: usize = 16;

/// Normalise a title for deduplication comparison.
///
/// Lower-cases, replaces every non-alphanumeric character with a space,
/// and collapses runs of whitespace to a single space. The result is
/// trimmed; an all-punctuation title normalises to the empty string.
pub fn normalize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_space = true;
        }
    }

    out
}

/// Stable fingerprint of a title: a short blake3 hex digest of the
/// normalised form. Identical normalised titles always produce identical
/// fingerprints, across sources and across runs.
pub fn title_fingerprint(title: &str) -> String {
    let normalised = normalize_title(title);
    let digest = blake3::hash(normalised.as_bytes());
    digest.to_hex()[..FINGERPRINT_LEN].to_string()
}
