//! Generic REST connector for JSON product-search APIs.
//!
//! Queries a configured endpoint with `GET ?q=…&region=…&limit=…` and
//! normalises whatever JSON shape comes back into unified [`Item`]s.
//! Field extraction is deliberately tolerant: sources disagree about
//! payload layout, so each field is probed under its common aliases and
//! an item is dropped (not failed) when its essentials are missing.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::connector::{Connector, SearchParams};
use crate::error::SearchError;
use crate::types::{Availability, Item, Price, Shipping};

/// A product source reachable through a JSON search endpoint.
pub struct RestConnector {
    source: String,
    endpoint: Url,
    client: reqwest::Client,
}

impl RestConnector {
    /// Build a connector for `source` talking to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an unparseable endpoint and
    /// [`SearchError::Http`] if the HTTP client cannot be constructed.
    pub fn new(source: &str, endpoint: &str, timeout: Duration) -> Result<Self, SearchError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SearchError::Config(format!("{source}: invalid endpoint: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Http(format!("{source}: failed to build HTTP client: {e}")))?;
        Ok(Self {
            source: source.to_owned(),
            endpoint,
            client,
        })
    }
}

#[async_trait]
impl Connector for RestConnector {
    async fn search(&self, query: &str, params: &SearchParams) -> Result<Vec<Item>, SearchError> {
        tracing::trace!(source = %self.source, query, "REST source search");

        let mut pairs: Vec<(String, String)> = vec![
            ("q".to_owned(), query.to_owned()),
            ("region".to_owned(), params.region.clone()),
            ("currency".to_owned(), params.currency.clone()),
            ("limit".to_owned(), params.limit.to_string()),
        ];
        for (key, value) in &params.filters {
            pairs.push((key.clone(), value.clone()));
        }

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&pairs)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("{}: request failed: {e}", self.source)))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("{}: HTTP error: {e}", self.source)))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("{}: invalid JSON: {e}", self.source)))?;

        let items = normalize_payload(&self.source, &params.region, &payload, params.limit);
        tracing::debug!(source = %self.source, count = items.len(), "REST source results normalised");
        Ok(items)
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Normalise a source payload into items, dropping malformed entries.
///
/// Extracted as a separate function for testability with fixture JSON.
pub(crate) fn normalize_payload(source: &str, region: &str, raw: &Value, limit: usize) -> Vec<Item> {
    find_items_array(raw)
        .into_iter()
        .filter_map(|entry| normalize_single(source, region, entry))
        .take(limit)
        .collect()
}

/// Find the product array in the common response layouts.
fn find_items_array(raw: &Value) -> Vec<&Value> {
    for field in &["products", "items", "results", "data", "listings"] {
        if let Some(arr) = raw.get(*field).and_then(|v| v.as_array()) {
            return arr.iter().collect();
        }
    }
    if let Some(arr) = raw.as_array() {
        return arr.iter().collect();
    }
    Vec::new()
}

/// Normalise one product entry. Returns `None` when the entry is missing
/// its id, title, or a usable non-negative price.
fn normalize_single(source: &str, region: &str, entry: &Value) -> Option<Item> {
    let id = extract_id(entry)?;
    let title = extract_str(entry, &["title", "name"])?;
    let price = extract_price(entry)?;

    Some(Item {
        id: format!("{source}:{id}"),
        title,
        brand: extract_str(entry, &["brand", "manufacturer"]),
        price,
        images: extract_images(entry),
        source: source.to_owned(),
        url: extract_str(entry, &["url", "link", "product_url", "productUrl"]).unwrap_or_default(),
        attributes: extract_attributes(entry),
        shipping: extract_shipping(entry),
        category: extract_str(entry, &["category"]),
        rating: extract_rating(entry),
        reviews_count: extract_u32(entry, &["reviews_count", "reviewsCount", "review_count", "reviews"]),
        availability: extract_availability(entry),
        region: extract_str(entry, &["region"]).unwrap_or_else(|| region.to_owned()),
    })
}

/// Source-local id from the common id fields, numeric ids included.
fn extract_id(entry: &Value) -> Option<String> {
    for field in &["id", "sku", "asin", "product_id", "productId"] {
        match entry.get(*field) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn extract_str(entry: &Value, fields: &[&str]) -> Option<String> {
    for field in fields {
        if let Some(s) = entry.get(*field).and_then(|v| v.as_str()) {
            if !s.trim().is_empty() {
                return Some(s.trim().to_owned());
            }
        }
    }
    None
}

fn extract_u32(entry: &Value, fields: &[&str]) -> Option<u32> {
    for field in fields {
        if let Some(n) = entry.get(*field).and_then(|v| v.as_u64()) {
            return u32::try_from(n).ok();
        }
    }
    None
}

/// Price as a bare number, a string, or an `{amount, currency}` object.
/// Entries with a negative amount violate the schema and are dropped.
fn extract_price(entry: &Value) -> Option<Price> {
    let price = entry.get("price")?;

    let (amount, currency) = match price {
        Value::Number(n) => (n.as_f64()?, None),
        Value::String(s) => (s.trim().trim_start_matches('$').parse::<f64>().ok()?, None),
        Value::Object(_) => {
            let amount = price
                .get("amount")
                .or_else(|| price.get("value"))
                .and_then(|v| v.as_f64())?;
            let currency = price
                .get("currency")
                .and_then(|v| v.as_str())
                .map(str::to_owned);
            (amount, currency)
        }
        _ => return None,
    };

    if amount < 0.0 {
        return None;
    }

    let currency = currency
        .or_else(|| {
            entry
                .get("currency")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| "USD".to_owned());

    Some(Price { amount, currency })
}

fn extract_images(entry: &Value) -> Vec<String> {
    if let Some(arr) = entry.get("images").and_then(|v| v.as_array()) {
        return arr
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_owned)
            .collect();
    }
    for field in &["image", "thumbnail"] {
        if let Some(s) = entry.get(*field).and_then(|v| v.as_str()) {
            return vec![s.to_owned()];
        }
    }
    Vec::new()
}

fn extract_rating(entry: &Value) -> Option<f32> {
    for field in &["rating", "stars", "average_rating"] {
        if let Some(r) = entry.get(*field).and_then(|v| v.as_f64()) {
            return Some((r as f32).clamp(0.0, 5.0));
        }
    }
    None
}

fn extract_availability(entry: &Value) -> Availability {
    if let Some(flag) = entry
        .get("in_stock")
        .or_else(|| entry.get("inStock"))
        .and_then(|v| v.as_bool())
    {
        return if flag {
            Availability::InStock
        } else {
            Availability::OutOfStock
        };
    }
    match entry.get("availability").and_then(|v| v.as_str()) {
        Some("limited") => Availability::Limited,
        Some("out_of_stock") => Availability::OutOfStock,
        _ => Availability::InStock,
    }
}

fn extract_shipping(entry: &Value) -> Option<Shipping> {
    let shipping = entry.get("shipping")?.as_object()?;
    Some(Shipping {
        eta_days: shipping
            .get("eta_days")
            .or_else(|| shipping.get("etaDays"))
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok()),
        cost: shipping.get("cost").and_then(|v| v.as_f64()),
        free: shipping.get("free").and_then(|v| v.as_bool()).unwrap_or(false),
    })
}

fn extract_attributes(entry: &Value) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    if let Some(map) = entry.get("attributes").and_then(|v| v.as_object()) {
        for (key, value) in map {
            if let Some(s) = value.as_str() {
                attributes.insert(key.clone(), s.to_owned());
            }
        }
    }
    attributes
}
