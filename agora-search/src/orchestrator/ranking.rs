//! Multi-factor relevance scoring over the merged, deduplicated item set.
//!
//! Every term is additive and driven by [`RankingWeights`] — the structure
//! of the formula is fixed here, the magnitudes are configuration:
//!
//! ```text
//! score = token_overlap * matched_query_tokens
//!       + brand_match                  (detected brand within item brand)
//!       + rating * rating_factor
//!       + ln(reviews + 1) * popularity_factor
//!       + price_fit_bonus | -price_over_penalty   (vs. detected ceiling)
//!       + user-type bonus              (shopper / vendor / business)
//! ```
//!
//! The sort is stable and descending, so equal-score items retain their
//! post-dedup merge order.

use crate::config::SearchConfig;
use crate::intent::QueryIntent;
use crate::types::{Item, UserType};

/// Title keyword that marks a listing as a bulk offer for business callers.
const BULK_KEYWORD: &str = "bulk";

/// Rank items by descending relevance score.
///
/// Returns a new vector; the input slice is not mutated. Ties break by
/// stable input order, which after dedup is the merge order of the
/// contributing sources.
pub fn rank(items: &[Item], intent: &QueryIntent, config: &SearchConfig) -> Vec<Item> {
    let mut scored: Vec<(f64, Item)> = items
        .iter()
        .map(|item| (score_item(item, intent, config), item.clone()))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored.into_iter().map(|(_, item)| item).collect()
}

/// Compute the relevance score for a single item.
pub fn score_item(item: &Item, intent: &QueryIntent, config: &SearchConfig) -> f64 {
    let weights = &config.weights;
    let mut score = 0.0;

    // Token-overlap relevance.
    let title_lower = item.title.to_lowercase();
    let title_tokens: Vec<&str> = title_lower.split_whitespace().collect();
    for query_token in intent.processed_query.to_lowercase().split_whitespace() {
        if title_tokens.iter().any(|t| t.contains(query_token)) {
            score += weights.token_overlap;
        }
    }

    // Brand match.
    if let (Some(brand), Some(item_brand)) = (&intent.entities.brand, &item.brand) {
        if item_brand.to_lowercase().contains(brand.as_str()) {
            score += weights.brand_match;
        }
    }

    // Rating bonus.
    if let Some(rating) = item.rating {
        score += f64::from(rating) * weights.rating_factor;
    }

    // Popularity bonus.
    if let Some(reviews) = item.reviews_count {
        score += f64::from(reviews + 1).ln() * weights.popularity_factor;
    }

    // Price-fit. Over-budget items are deprioritised, never removed.
    if let Some(max) = intent.entities.price_range.max {
        if item.price.amount <= max {
            score += weights.price_fit_bonus;
        } else {
            score -= weights.price_over_penalty;
        }
    }

    // User-type weighting.
    match intent.user_type {
        UserType::Shopper => {
            if item.rating.is_some_and(|r| r >= weights.shopper_rating_floor) {
                score += weights.shopper_rating_bonus;
            }
        }
        UserType::Vendor => {
            if item.price.amount < weights.vendor_price_ceiling {
                score += weights.vendor_price_bonus;
            }
        }
        UserType::Business => {
            if title_lower.contains(BULK_KEYWORD)
                || config.b2b_sources.iter().any(|s| s == &item.source)
            {
                score += weights.business_bonus;
            }
        }
    }

    score
}
