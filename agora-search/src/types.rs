//! Core types for the federated product-search pipeline.
//!
//! [`Item`] is the unified product schema every connector normalises into.
//! [`SearchRequest`] and [`SearchResponse`] form the caller-facing contract.
//! Wire field names are camelCase to match the public JSON schema.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Stock status reported by a product source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Available for immediate purchase.
    InStock,
    /// Available but the source reports low stock.
    Limited,
    /// Listed but not currently purchasable.
    OutOfStock,
}

impl Default for Availability {
    fn default() -> Self {
        Self::InStock
    }
}

/// The kind of caller issuing a search, used for ranking weight selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Individual consumer (the default).
    Shopper,
    /// Marketplace seller researching inventory.
    Vendor,
    /// B2B purchaser looking for bulk listings.
    Business,
}

impl Default for UserType {
    fn default() -> Self {
        Self::Shopper
    }
}

impl UserType {
    /// Returns the wire name of this user type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shopper => "shopper",
            Self::Vendor => "vendor",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UserType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shopper" => Ok(Self::Shopper),
            "vendor" => Ok(Self::Vendor),
            "business" => Ok(Self::Business),
            other => Err(SearchError::Validation(format!(
                "unknown user_type: {other}"
            ))),
        }
    }
}

/// A monetary amount as supplied by the source. No conversion is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Non-negative amount in the source's currency units.
    pub amount: f64,
    /// ISO 4217 currency code, e.g. `"USD"`.
    pub currency: String,
}

/// Optional delivery details a source may attach to an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    /// Estimated delivery time in days.
    pub eta_days: Option<u32>,
    /// Shipping cost in the item's currency, if charged separately.
    pub cost: Option<f64>,
    /// Whether the source offers free shipping on this item.
    pub free: bool,
}

/// A single product normalised into the unified schema.
///
/// Owned exclusively by the aggregation call that produced it; the pipeline
/// never shares or mutates an `Item` across requests. `id` is globally
/// unique per source + source-local id and immutable once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: Price,
    /// Ordered image URLs, may be empty.
    #[serde(default)]
    pub images: Vec<String>,
    /// Connector identifier this item came from.
    pub source: String,
    pub url: String,
    /// Free-form source attributes, e.g. colour or size.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Shipping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Average rating in `[0, 5]` when the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u32>,
    #[serde(default)]
    pub availability: Availability,
    pub region: String,
}

/// Immutable caller input describing one search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: String,
    pub user_type: UserType,
    /// Page size; must be at least 1.
    pub limit: usize,
    /// Zero-based item offset into the ranked result list.
    pub offset: usize,
    pub filters: BTreeMap<String, String>,
    pub sort_by: Option<String>,
    pub region: String,
    pub currency: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            user_type: UserType::Shopper,
            limit: 20,
            offset: 0,
            filters: BTreeMap::new(),
            sort_by: None,
            region: "us".to_owned(),
            currency: "USD".to_owned(),
        }
    }
}

impl SearchRequest {
    /// Validates this request, returning a [`SearchError::Validation`] for
    /// input the engine must reject before any connector fan-out.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.query.trim().is_empty() {
            return Err(SearchError::Validation("query must not be empty".into()));
        }
        if self.limit == 0 {
            return Err(SearchError::Validation("limit must be at least 1".into()));
        }
        Ok(())
    }
}

/// The aggregated, ranked, paginated answer to one [`SearchRequest`].
///
/// Read-only once returned; also stored verbatim as a cache value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// One page of ranked items.
    pub results: Vec<Item>,
    /// Count of ranked, deduplicated items before pagination.
    pub total: usize,
    /// The query this response answers.
    pub query: String,
    /// Sources that contributed at least one item to this response.
    pub active_sources: Vec<String>,
    pub execution_time_ms: u64,
    /// Alternate queries, populated only when `total == 0`.
    #[serde(default)]
    pub suggestions: Vec<String>,
}
