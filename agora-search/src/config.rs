//! Engine configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the request deadline, cache TTL, pagination
//! bounds, and the full set of ranking weights. Weights are named fields
//! rather than inline literals so the scoring formula can be tuned without
//! touching the ranking algorithm itself.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::health::BreakerConfig;

/// Configuration for the aggregation engine.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Overall request deadline shared by every connector task, in
    /// milliseconds. A connector still running when it fires is treated
    /// as a failed source for that request only.
    pub request_timeout_ms: u64,
    /// How long a computed response stays cached, in seconds.
    /// Set to 0 to disable caching.
    pub cache_ttl_secs: u64,
    /// Page size applied when the caller does not supply one.
    pub default_limit: usize,
    /// Upper bound on the caller-supplied page size.
    pub max_limit: usize,
    /// Relevance scoring weights.
    pub weights: RankingWeights,
    /// Sources treated as B2B suppliers for business-caller ranking.
    pub b2b_sources: Vec<String>,
    /// Per-source circuit breaker behaviour.
    pub breaker: BreakerConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            cache_ttl_secs: 900,
            default_limit: 20,
            max_limit: 100,
            weights: RankingWeights::default(),
            b2b_sources: vec!["alibaba".to_owned(), "globalsources".to_owned()],
            breaker: BreakerConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `request_timeout_ms` must be greater than 0
    /// - `default_limit` must be greater than 0
    /// - `max_limit` must be >= `default_limit`
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.request_timeout_ms == 0 {
            return Err(SearchError::Config(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.default_limit == 0 {
            return Err(SearchError::Config(
                "default_limit must be greater than 0".into(),
            ));
        }
        if self.max_limit < self.default_limit {
            return Err(SearchError::Config(
                "max_limit must be >= default_limit".into(),
            ));
        }
        Ok(())
    }
}

/// Named, injectable weights for the additive relevance score.
///
/// The formula's structure is fixed (see the ranking module); these values
/// are policy and may be tuned or A/B tested without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Added once per processed-query token found as a substring of any
    /// title token.
    pub token_overlap: f64,
    /// Added when the detected brand appears in the item's brand.
    pub brand_match: f64,
    /// Multiplier applied to the item rating (0–5).
    pub rating_factor: f64,
    /// Multiplier applied to `ln(reviews_count + 1)`.
    pub popularity_factor: f64,
    /// Added when the item price fits under the detected price ceiling.
    pub price_fit_bonus: f64,
    /// Subtracted when the item price exceeds the detected price ceiling.
    /// A penalty, not an exclusion — the item stays in the result set.
    pub price_over_penalty: f64,
    /// Shopper bonus for items rated at or above `shopper_rating_floor`.
    pub shopper_rating_bonus: f64,
    /// Minimum rating that earns the shopper bonus.
    pub shopper_rating_floor: f32,
    /// Vendor bonus for items priced below `vendor_price_ceiling`.
    pub vendor_price_bonus: f64,
    /// Currency-unit-relative price threshold for the vendor bonus.
    pub vendor_price_ceiling: f64,
    /// Business bonus for bulk listings or known B2B sources.
    pub business_bonus: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            token_overlap: 2.0,
            brand_match: 3.0,
            rating_factor: 0.5,
            popularity_factor: 0.2,
            price_fit_bonus: 1.0,
            price_over_penalty: 2.0,
            shopper_rating_bonus: 1.0,
            shopper_rating_floor: 4.0,
            vendor_price_bonus: 0.5,
            vendor_price_ceiling: 10_000.0,
            business_bonus: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.request_timeout_ms, 5_000);
        assert_eq!(config.cache_ttl_secs, 900);
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.max_limit, 100);
    }

    #[test]
    fn default_weights_match_scoring_policy() {
        let weights = RankingWeights::default();
        assert!((weights.token_overlap - 2.0).abs() < f64::EPSILON);
        assert!((weights.brand_match - 3.0).abs() < f64::EPSILON);
        assert!((weights.rating_factor - 0.5).abs() < f64::EPSILON);
        assert!((weights.popularity_factor - 0.2).abs() < f64::EPSILON);
        assert!((weights.price_fit_bonus - 1.0).abs() < f64::EPSILON);
        assert!((weights.price_over_penalty - 2.0).abs() < f64::EPSILON);
        assert!((weights.business_bonus - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            request_timeout_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn zero_default_limit_rejected() {
        let config = SearchConfig {
            default_limit: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_limit"));
    }

    #[test]
    fn max_limit_below_default_rejected() {
        let config = SearchConfig {
            default_limit: 20,
            max_limit: 5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_limit"));
    }

    #[test]
    fn partial_config_fills_remaining_defaults() {
        let parsed: SearchConfig = serde_json::from_str(r#"{"cache_ttl_secs": 0}"#).expect("parse");
        assert_eq!(parsed.cache_ttl_secs, 0);
        assert_eq!(parsed.default_limit, 20);
        assert!((parsed.weights.brand_match - 3.0).abs() < f64::EPSILON);
    }
}
