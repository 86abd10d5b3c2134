//! Query understanding: raw text → structured [`QueryIntent`].
//!
//! Deliberately simple keyword scanning — no NLP, no network, no state.
//! [`parse`] is a pure function: the same input always yields byte-identical
//! output, and absence of a detected entity just leaves that field empty.

use serde::{Deserialize, Serialize};

use crate::types::UserType;

/// Brand vocabulary scanned for substring matches, first hit wins.
const BRAND_VOCABULARY: &[&str] = &[
    "nike", "adidas", "puma", "reebok", "new balance", "apple", "samsung", "sony", "lg", "dell",
    "hp", "lenovo", "asus", "dyson", "bosch", "philips", "levis", "zara",
];

/// Category detection table: first category whose any keyword appears as a
/// substring of the lower-cased query wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("shoes", &["shoe", "sneaker", "trainer", "boot", "sandal"]),
    (
        "electronics",
        &["phone", "laptop", "tablet", "tv", "headphone", "camera", "monitor", "console"],
    ),
    (
        "clothing",
        &["shirt", "jacket", "dress", "jeans", "hoodie", "sock", "coat"],
    ),
    (
        "home",
        &["sofa", "lamp", "mattress", "cookware", "vacuum", "kettle", "blender"],
    ),
    ("beauty", &["shampoo", "perfume", "lipstick", "moisturiser", "serum"]),
    ("sports", &["dumbbell", "yoga", "racket", "bicycle", "treadmill"]),
];

/// Detected entities within a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEntities {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price_range: PriceRange,
}

/// Inclusive price bounds detected in the query text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Structured interpretation of one raw query. Created once per request
/// and immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryIntent {
    pub raw_query: String,
    /// Original query, trimmed. Tokenised by the ranker.
    pub processed_query: String,
    pub entities: QueryEntities,
    pub user_type: UserType,
}

/// Parse a raw query into a [`QueryIntent`]. Never fails.
///
/// Scanning is done on the lower-cased query:
/// - `under`/`below` followed by a number sets `price_range.max`
/// - first brand vocabulary hit sets `entities.brand`
/// - first category with any keyword substring sets `entities.category`
pub fn parse(query: &str, user_type: UserType) -> QueryIntent {
    let lowered = query.to_lowercase();

    let mut entities = QueryEntities::default();
    entities.price_range.max = detect_price_ceiling(&lowered);

    for brand in BRAND_VOCABULARY {
        if lowered.contains(brand) {
            entities.brand = Some((*brand).to_owned());
            break;
        }
    }

    'categories: for (category, keywords) in CATEGORY_KEYWORDS {
        for keyword in *keywords {
            if lowered.contains(keyword) {
                entities.category = Some((*category).to_owned());
                break 'categories;
            }
        }
    }

    QueryIntent {
        raw_query: query.to_owned(),
        processed_query: query.trim().to_owned(),
        entities,
        user_type,
    }
}

/// Find `under`/`below` followed by a numeric token and return that number.
fn detect_price_ceiling(lowered: &str) -> Option<f64> {
    let mut tokens = lowered.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "under" || token == "below" {
            if let Some(next) = tokens.next() {
                if let Some(amount) = parse_amount(next) {
                    return Some(amount);
                }
            }
        }
    }
    None
}

/// Parse a price token, tolerating currency symbols and thousands separators
/// (`$1,500`, `€50`, `100.`).
fn parse_amount(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|amount| *amount >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_pure() {
        let first = parse("Nike shoes under $100", UserType::Shopper);
        let second = parse("Nike shoes under $100", UserType::Shopper);
        assert_eq!(first, second);
    }

    #[test]
    fn detects_brand_case_insensitively() {
        let intent = parse("NIKE running shoes", UserType::Shopper);
        assert_eq!(intent.entities.brand.as_deref(), Some("nike"));
    }

    #[test]
    fn detects_category_from_keyword() {
        let intent = parse("cheap wireless headphone deals", UserType::Shopper);
        assert_eq!(intent.entities.category.as_deref(), Some("electronics"));
    }

    #[test]
    fn detects_price_ceiling_with_under() {
        let intent = parse("laptop under 800", UserType::Shopper);
        assert_eq!(intent.entities.price_range.max, Some(800.0));
    }

    #[test]
    fn detects_price_ceiling_with_below_and_symbol() {
        let intent = parse("sofa below $1,250", UserType::Shopper);
        assert_eq!(intent.entities.price_range.max, Some(1250.0));
    }

    #[test]
    fn missing_entities_stay_empty() {
        let intent = parse("generic gizmo", UserType::Shopper);
        assert!(intent.entities.brand.is_none());
        assert!(intent.entities.category.is_none());
        assert!(intent.entities.price_range.max.is_none());
    }

    #[test]
    fn under_without_number_is_ignored() {
        let intent = parse("blanket to hide under", UserType::Shopper);
        assert!(intent.entities.price_range.max.is_none());
    }

    #[test]
    fn processed_query_is_trimmed_original() {
        let intent = parse("  Nike Shoes  ", UserType::Shopper);
        assert_eq!(intent.processed_query, "Nike Shoes");
        assert_eq!(intent.raw_query, "  Nike Shoes  ");
    }

    #[test]
    fn first_brand_hit_wins() {
        let intent = parse("adidas vs nike comparison", UserType::Shopper);
        // Vocabulary order decides ties, not query order.
        assert_eq!(intent.entities.brand.as_deref(), Some("nike"));
    }

    #[test]
    fn user_type_carried_through() {
        let intent = parse("bulk office chairs", UserType::Business);
        assert_eq!(intent.user_type, UserType::Business);
    }
}
