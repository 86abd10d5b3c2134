//! # agora-search
//!
//! Federated product search for Agora: one shopper query fanned out
//! concurrently to multiple independent product sources, merged into a
//! single ranked, deduplicated, paginated response.
//!
//! ## Design
//!
//! - Sources are [`connector::Connector`] trait objects registered in a
//!   list; the orchestrator never depends on a concrete connector type
//! - Fan-out launches one task per source under a shared request deadline
//!   and joins all of them — a failing or slow source contributes nothing
//!   and never aborts the request
//! - Cross-source duplicates collapse by normalised-title fingerprint
//! - Ranking is an additive multi-factor score with named, injectable
//!   weights ([`config::RankingWeights`])
//! - Final responses are cached behind the [`cache::ResponseCache`]
//!   abstraction with a bounded TTL
//! - Sources that fail repeatedly are skipped via a per-source circuit
//!   breaker until their cooldown elapses
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> agora_search::Result<()> {
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use agora_search::cache::MokaResponseCache;
//! use agora_search::connector::Connector;
//! use agora_search::connectors::RestConnector;
//! use agora_search::{SearchAggregator, SearchConfig, SearchRequest};
//!
//! let connectors: Vec<Arc<dyn Connector>> = vec![
//!     Arc::new(RestConnector::new(
//!         "amazon",
//!         "https://products.example/amazon/search",
//!         Duration::from_secs(5),
//!     )?),
//! ];
//! let aggregator = SearchAggregator::new(
//!     SearchConfig::default(),
//!     connectors,
//!     Arc::new(MokaResponseCache::new()),
//! )?;
//!
//! let response = aggregator
//!     .search(SearchRequest {
//!         query: "nike shoes under 100".to_owned(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{} items from {:?}", response.total, response.active_sources);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod connector;
pub mod connectors;
pub mod error;
pub mod health;
pub mod intent;
pub mod orchestrator;
pub mod suggest;
pub mod types;

pub use config::{RankingWeights, SearchConfig};
pub use error::{Result, SearchError};
pub use orchestrator::SearchAggregator;
pub use types::{Availability, Item, Price, SearchRequest, SearchResponse, UserType};
