//! Core aggregation orchestrator: concurrent source fan-out, merge, dedup,
//! rank, paginate, cache.
//!
//! Fans one query out to every registered connector concurrently, joins
//! all outcomes, merges the successful partial results, deduplicates by
//! title fingerprint, ranks with the multi-factor scorer, applies clamped
//! pagination, and caches the final response. Source failures are
//! recovered here and never abort a request.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::timeout;

use crate::cache::{CacheKey, ResponseCache};
use crate::config::SearchConfig;
use crate::connector::{Connector, SearchParams};
use crate::error::SearchError;
use crate::health::SourceBreaker;
use crate::intent;
use crate::suggest;
use crate::types::{Item, SearchRequest, SearchResponse};

use super::dedup::dedup;
use super::ranking::rank;

/// The composition root for federated search.
///
/// Holds the registered connectors, the injected response cache, the
/// engine configuration, and per-source health state. Stateless between
/// requests apart from the cache and breaker.
pub struct SearchAggregator {
    config: SearchConfig,
    connectors: Vec<Arc<dyn Connector>>,
    cache: Arc<dyn ResponseCache>,
    breaker: Mutex<SourceBreaker>,
}

impl std::fmt::Debug for SearchAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAggregator")
            .field("config", &self.config)
            .field("connectors", &self.connectors.len())
            .finish_non_exhaustive()
    }
}

impl SearchAggregator {
    /// Build an aggregator over the given connectors and cache.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid configuration or an
    /// empty connector list.
    pub fn new(
        config: SearchConfig,
        connectors: Vec<Arc<dyn Connector>>,
        cache: Arc<dyn ResponseCache>,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        if connectors.is_empty() {
            return Err(SearchError::Config(
                "at least one connector must be registered".into(),
            ));
        }
        let breaker = Mutex::new(SourceBreaker::new(config.breaker.clone()));
        Ok(Self {
            config,
            connectors,
            cache,
            breaker,
        })
    }

    /// Execute one federated search.
    ///
    /// # Pipeline
    ///
    /// 1. Validate the request (the only caller-visible failure mode)
    /// 2. Cache lookup by `(query, user_type, region)` — hit returns immediately
    /// 3. Parse the query into a [`intent::QueryIntent`]
    /// 4. Fan out to every healthy connector concurrently, one spawned task
    ///    each, all bounded by the shared request deadline
    /// 5. Join **all** tasks and classify each outcome; failures and
    ///    timeouts contribute nothing and are logged at warn
    /// 6. Merge, dedup, rank; `total` is the pre-pagination count
    /// 7. Paginate with clamped bounds
    /// 8. Populate suggestions when nothing matched
    /// 9. Cache the response unless every source failed
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] for malformed requests, before
    /// any connector is invoked. Source failures never surface here.
    pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse, SearchError> {
        req.validate()?;
        let started = Instant::now();

        let limit = req.limit.min(self.config.max_limit);
        let key = CacheKey::new(&req.query, req.user_type, &req.region);

        if self.config.cache_ttl_secs > 0 {
            if let Some(hit) = self.cache.get(&key).await {
                tracing::debug!(query = %req.query, "cache hit");
                return Ok(hit);
            }
        }

        let query_intent = intent::parse(&req.query, req.user_type);
        let params = SearchParams::from_request(&req, self.config.max_limit);

        let (merged, active_sources, any_success) =
            self.fan_out(&query_intent.processed_query, &params).await;

        let ranked = rank(&dedup(merged), &query_intent, &self.config);
        let total = ranked.len();
        let results = paginate(&ranked, req.offset, limit);

        let suggestions = if total == 0 {
            suggest::suggest(&req.query)
        } else {
            Vec::new()
        };

        let response = SearchResponse {
            results,
            total,
            query: req.query.clone(),
            active_sources,
            execution_time_ms: started.elapsed().as_millis() as u64,
            suggestions,
        };

        // A total outage is a valid empty response but must not be cached,
        // or the failure snapshot would be pinned for the whole TTL.
        if any_success && self.config.cache_ttl_secs > 0 {
            self.cache
                .set(
                    key,
                    response.clone(),
                    Duration::from_secs(self.config.cache_ttl_secs),
                )
                .await;
        }

        tracing::debug!(
            query = %req.query,
            total,
            sources = response.active_sources.len(),
            elapsed_ms = response.execution_time_ms,
            "search aggregated"
        );
        Ok(response)
    }

    /// Per-source health report: `(source, state, consecutive_failures)`.
    pub fn health_report(&self) -> Vec<(String, crate::health::CircuitState, u32)> {
        self.breaker.lock().map(|b| b.report()).unwrap_or_default()
    }

    /// Launch one task per healthy connector, join all, classify outcomes.
    ///
    /// Returns the merged items, the sources that contributed at least one
    /// item (in registration order), and whether any source succeeded at
    /// all.
    async fn fan_out(&self, query: &str, params: &SearchParams) -> (Vec<Item>, Vec<String>, bool) {
        let deadline = Duration::from_millis(self.config.request_timeout_ms);

        let attempts: Vec<Arc<dyn Connector>> = {
            let mut breaker = match self.breaker.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            self.connectors
                .iter()
                .filter(|c| {
                    let attempt = breaker.should_attempt(c.source());
                    if !attempt {
                        tracing::debug!(source = c.source(), "source skipped: circuit open");
                    }
                    attempt
                })
                .cloned()
                .collect()
        };

        let tasks: Vec<_> = attempts
            .iter()
            .map(|connector| {
                let connector = Arc::clone(connector);
                let query = query.to_owned();
                let params = params.clone();
                tokio::spawn(async move {
                    let source = connector.source().to_owned();
                    let outcome = match timeout(deadline, connector.search(&query, &params)).await {
                        Ok(result) => result,
                        Err(_) => Err(SearchError::Timeout(format!(
                            "{source}: no response within {}ms",
                            deadline.as_millis()
                        ))),
                    };
                    (source, outcome)
                })
            })
            .collect();

        // Every task must reach a terminal state before merging: the final
        // set of active sources is part of the response contract.
        let outcomes = join_all(tasks).await;

        let mut merged: Vec<Item> = Vec::new();
        let mut active_sources: Vec<String> = Vec::new();
        let mut any_success = false;

        for (connector, joined) in attempts.iter().zip(outcomes) {
            match joined {
                Ok((source, Ok(items))) => {
                    self.record(&source, true);
                    any_success = true;
                    tracing::debug!(source = %source, count = items.len(), "source answered");
                    if !items.is_empty() {
                        active_sources.push(source);
                        merged.extend(items);
                    }
                }
                Ok((source, Err(err))) => {
                    self.record(&source, false);
                    tracing::warn!(source = %source, error = %err, "source query failed");
                }
                Err(join_err) => {
                    let source = connector.source();
                    self.record(source, false);
                    tracing::warn!(source, error = %join_err, "source task aborted");
                }
            }
        }

        (merged, active_sources, any_success)
    }

    fn record(&self, source: &str, success: bool) {
        let mut breaker = match self.breaker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if success {
            breaker.record_success(source);
        } else {
            breaker.record_failure(source);
        }
    }
}

/// Slice one page out of the ranked list with clamped bounds.
///
/// An offset at or beyond the list length yields an empty page; `total`
/// reported by the caller still reflects the full count.
fn paginate(items: &[Item], offset: usize, limit: usize) -> Vec<Item> {
    if offset >= items.len() {
        return Vec::new();
    }
    let end = offset.saturating_add(limit).min(items.len());
    items[offset..end].to_vec()
}
