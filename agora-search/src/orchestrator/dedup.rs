//! Cross-source item deduplication by normalised-title fingerprint.
//!
//! Items whose titles normalise to the same fingerprint represent the same
//! underlying product listed by different sources; only the first
//! occurrence survives. This is a blunt equality policy, not fuzzy
//! matching — "Nike Air Max 270" and "Nike Air Max 270 Running Shoes" are
//! distinct on purpose.

use std::collections::HashSet;

use crate::types::Item;

use super::normalize::title_fingerprint;

/// Deduplicate items by normalised-title fingerprint, keeping the first
/// item seen for each fingerprint and preserving the input order of the
/// survivors.
///
/// Idempotent: `dedup(dedup(x)) == dedup(x)`. Never grows the set.
pub fn dedup(items: Vec<Item>) -> Vec<Item> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut kept = Vec::with_capacity(items.len());

    for item in items {
        let fingerprint = title_fingerprint(&item.title);
        if seen.insert(fingerprint) {
            kept.push(item);
        } else {
            tracing::trace!(id = %item.id, source = %item.source, "duplicate listing dropped");
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Availability, Price};
    use std::collections::BTreeMap;

    fn make_item(id: &str, source: &str, title: &str) -> Item {
        Item {
            id: format!("{source}:{id}"),
            title: title.to_owned(),
            brand: None,
            price: Price {
                amount: 10.0,
                currency: "USD".to_owned(),
            },
            images: vec![],
            source: source.to_owned(),
            url: format!("https://{source}.example/{id}"),
            attributes: BTreeMap::new(),
            shipping: None,
            category: None,
            rating: None,
            reviews_count: None,
            availability: Availability::InStock,
            region: "us".to_owned(),
        }
    }

    #[test]
    fn unique_titles_pass_through() {
        let items = vec![
            make_item("1", "amazon", "Desk Lamp"),
            make_item("2", "ebay", "Floor Lamp"),
        ];
        assert_eq!(dedup(items).len(), 2);
    }

    #[test]
    fn first_occurrence_wins_across_sources() {
        let items = vec![
            make_item("1", "amazon", "Nike Air Max 270"),
            make_item("2", "ebay", "Nike Air Max 270"),
        ];
        let kept = dedup(items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, "amazon");
    }

    #[test]
    fn punctuation_and_case_variants_collapse() {
        let items = vec![
            make_item("1", "amazon", "Nike Air-Max 270"),
            make_item("2", "ebay", "nike air max 270!"),
            make_item("3", "walmart", "NIKE AIR MAX 270"),
        ];
        assert_eq!(dedup(items).len(), 1);
    }

    #[test]
    fn different_titles_survive() {
        let items = vec![
            make_item("1", "amazon", "Nike Air Max 270"),
            make_item("2", "amazon", "Nike Air Max 270 Running Shoes"),
        ];
        // Exact-match policy: the longer title is a distinct listing.
        assert_eq!(dedup(items).len(), 2);
    }

    #[test]
    fn order_preserved_over_survivors() {
        let items = vec![
            make_item("1", "amazon", "Alpha"),
            make_item("2", "ebay", "Beta"),
            make_item("3", "walmart", "Alpha"),
            make_item("4", "etsy", "Gamma"),
        ];
        let kept = dedup(items);
        let titles: Vec<&str> = kept.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let items = vec![
            make_item("1", "amazon", "Alpha"),
            make_item("2", "ebay", "Alpha"),
            make_item("3", "walmart", "Beta"),
        ];
        let once = dedup(items);
        let twice = dedup(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn never_grows_the_set() {
        let items: Vec<Item> = (0..20)
            .map(|i| make_item(&i.to_string(), "amazon", &format!("Item {}", i % 7)))
            .collect();
        let kept = dedup(items.clone());
        assert!(kept.len() <= items.len());
        assert_eq!(kept.len(), 7);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(dedup(vec![]).is_empty());
    }
}
