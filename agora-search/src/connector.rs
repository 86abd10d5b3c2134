//! Trait definition for pluggable product-source connectors.
//!
//! Each product source implements [`Connector`] to provide a uniform search
//! capability. The orchestrator depends only on this trait and holds its
//! connectors as a registered list of trait objects — it never names a
//! concrete connector type.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::{Item, SearchRequest};

/// Per-request parameters forwarded to every connector.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Caller region, forwarded so sources can localise listings.
    pub region: String,
    /// Caller currency preference. No conversion happens in the engine.
    pub currency: String,
    /// Upper bound on items a single source should return.
    pub limit: usize,
    /// Free-form caller filters, forwarded verbatim.
    pub filters: BTreeMap<String, String>,
}

impl SearchParams {
    /// Derive connector parameters from a validated request.
    pub fn from_request(req: &SearchRequest, per_source_limit: usize) -> Self {
        Self {
            region: req.region.clone(),
            currency: req.currency.clone(),
            limit: per_source_limit,
            filters: req.filters.clone(),
        }
    }
}

/// A pluggable product source.
///
/// Implementations must:
///
/// - respect caller cancellation and return promptly when their future is
///   dropped (the orchestrator wraps every call in a request deadline)
/// - return an error rather than panicking on any internal failure
/// - tag every returned [`Item`] with their own `source` identifier
/// - never block indefinitely
///
/// All implementations must be `Send + Sync` for concurrent fan-out.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Search this source and return zero or more normalised items.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the source request fails or the response
    /// cannot be normalised. A failing source is recovered by the
    /// orchestrator and never aborts the whole request.
    async fn search(&self, query: &str, params: &SearchParams) -> Result<Vec<Item>, SearchError>;

    /// Unique source tag, used for item attribution, `active_sources`
    /// reporting, and per-source health tracking.
    fn source(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Availability, Price};
    use std::sync::Arc;

    struct MockConnector {
        source: String,
        items: Vec<Item>,
    }

    impl MockConnector {
        fn new(source: &str, items: Vec<Item>) -> Self {
            Self {
                source: source.to_owned(),
                items,
            }
        }

        fn failing(source: &str) -> Self {
            Self::new(source, vec![])
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        async fn search(
            &self,
            _query: &str,
            _params: &SearchParams,
        ) -> Result<Vec<Item>, SearchError> {
            if self.items.is_empty() {
                return Err(SearchError::Http("mock source failure".into()));
            }
            Ok(self.items.clone())
        }

        fn source(&self) -> &str {
            &self.source
        }
    }

    fn make_item(source: &str) -> Item {
        Item {
            id: format!("{source}:1"),
            title: "Widget".to_owned(),
            brand: None,
            price: Price {
                amount: 10.0,
                currency: "USD".to_owned(),
            },
            images: vec![],
            source: source.to_owned(),
            url: "https://shop.example/widget".to_owned(),
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
    fn connector_is_object_safe() {
        let connector: Arc<dyn Connector> = Arc::new(MockConnector::failing("demo"));
        assert_eq!(connector.source(), "demo");
    }

    #[tokio::test]
    async fn mock_connector_returns_items() {
        let connector = MockConnector::new("demo", vec![make_item("demo")]);
        let params = SearchParams::from_request(&SearchRequest::default(), 20);

        let items = connector.search("widget", &params).await.expect("items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "demo");
    }

    #[tokio::test]
    async fn mock_connector_propagates_errors() {
        let connector = MockConnector::failing("demo");
        let params = SearchParams::from_request(&SearchRequest::default(), 20);

        let result = connector.search("widget", &params).await;
        assert!(result.is_err());
    }

    #[test]
    fn params_derive_from_request() {
        let mut req = SearchRequest {
            query: "widget".to_owned(),
            region: "eu".to_owned(),
            currency: "EUR".to_owned(),
            ..Default::default()
        };
        req.filters.insert("color".to_owned(), "red".to_owned());

        let params = SearchParams::from_request(&req, 50);
        assert_eq!(params.region, "eu");
        assert_eq!(params.currency, "EUR");
        assert_eq!(params.limit, 50);
        assert_eq!(params.filters.get("color").map(String::as_str), Some("red"));
    }
}
