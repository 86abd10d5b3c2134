//! # agora
//!
//! Federated product-search aggregation service. The heavy lifting —
//! concurrent source fan-out, dedup, ranking, caching — lives in the
//! [`agora_search`] engine crate; this crate is the service shell that
//! loads configuration, wires connectors and cache into a
//! [`agora_search::SearchAggregator`], and exposes the HTTP contract.

pub mod config;
pub mod error;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use agora_search::cache::MokaResponseCache;
use agora_search::connector::Connector;
use agora_search::connectors::RestConnector;
use agora_search::SearchAggregator;

use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Wire the configured connectors and cache into an aggregator.
///
/// # Errors
///
/// Returns [`ServiceError::Config`] when no connectors are configured and
/// [`ServiceError::Engine`] for invalid engine settings or endpoints.
pub fn build_aggregator(config: &ServiceConfig) -> Result<Arc<SearchAggregator>, ServiceError> {
    if config.connectors.is_empty() {
        return Err(ServiceError::Config(
            "no connectors configured: add at least one [[connector]] entry".into(),
        ));
    }

    let timeout = Duration::from_millis(config.search.request_timeout_ms);
    let mut connectors: Vec<Arc<dyn Connector>> = Vec::with_capacity(config.connectors.len());
    for settings in &config.connectors {
        tracing::info!(source = %settings.source, endpoint = %settings.endpoint, "registering connector");
        connectors.push(Arc::new(RestConnector::new(
            &settings.source,
            &settings.endpoint,
            timeout,
        )?));
    }

    let aggregator = SearchAggregator::new(
        config.search.clone(),
        connectors,
        Arc::new(MokaResponseCache::new()),
    )?;
    Ok(Arc::new(aggregator))
}
