//! Search API
//!
//! Endpoint-level entry points for the contractor search. This is the layer
//! an HTTP handler or server-rendered page calls: it validates the request,
//! consults the response cache, parses the phrase, assembles and executes
//! the query, and shapes the paginated response.
//!
//! The cache and metrics services are owned here and shared via handles;
//! nothing in this module reaches for module-level state.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::contractors::{Contractor, ContractorRepository};
use crate::metrics::Metrics;
use crate::search::parser::{parse_smart_search, PredicateSet};
use crate::search::query::{assemble, QueryOptions};
use crate::storage::Database;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a search phrase should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Free-text phrase routed through the smart parser
    Smart,
    /// Business-name substring search
    Name,
    /// License-number substring search
    License,
    /// Exact city match
    City,
}

impl SearchType {
    /// Parse the wire value of `searchType`
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "smart" => Ok(SearchType::Smart),
            "name" => Ok(SearchType::Name),
            "license" => Ok(SearchType::License),
            "city" => Ok(SearchType::City),
            other => Err(Error::UnknownSearchType(other.to_string())),
        }
    }
}

/// A contractor search request, mirroring the search endpoint's JSON body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search_term: String,
    pub search_type: SearchType,
    /// Explicit city filter, applied to name/license searches. Smart
    /// searches extract their own city from the phrase.
    #[serde(default)]
    pub city: Option<String>,
    /// Accepted for wire compatibility; the directory is fixed to CA and
    /// this field does not alter the query.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Pagination block of a search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// A page of matching contractors plus pagination totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub contractors: Vec<Contractor>,
    pub pagination: Pagination,
}

/// Contractor search service: database plus cache and metrics handles
pub struct SearchService {
    db: Database,
    cache: Arc<TtlCache<SearchResponse>>,
    metrics: Arc<Metrics>,
    default_limit: i64,
    max_limit: i64,
    cache_ttl: Duration,
}

impl SearchService {
    /// Create a search service with fresh cache and metrics handles
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            cache: Arc::new(TtlCache::new()),
            metrics: Arc::new(Metrics::new()),
            default_limit: config.search.default_limit,
            max_limit: config.search.max_limit,
            cache_ttl: Duration::from_secs(config.cache.ttl_secs),
        }
    }

    /// Handle to the shared metrics accumulator
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Handle to the shared response cache
    pub fn cache(&self) -> Arc<TtlCache<SearchResponse>> {
        Arc::clone(&self.cache)
    }

    /// Run a contractor search.
    ///
    /// Missing search terms are rejected; everything else is total. Results
    /// are memoized in the TTL cache keyed by the full request.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        if request.search_term.trim().is_empty() {
            return Err(Error::InvalidInput("searchTerm is required".to_string()));
        }

        let page = request.page.unwrap_or(1).max(1);
        let limit = request
            .limit
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit);
        let offset = page.saturating_sub(1).saturating_mul(limit);

        let cache_key = cache_key(request, page, limit);
        if let Some(cached) = self.cache.get(&cache_key) {
            self.metrics.record_cache_hit();
            tracing::debug!(key = %cache_key, "Search served from cache");
            return Ok(cached);
        }

        let predicates = build_predicates(request);
        let query = assemble(&predicates, QueryOptions { limit, offset });

        let started = Instant::now();
        let repo = ContractorRepository::new(&self.db);
        let (contractors, total) = match repo.search(&query).await {
            Ok(result) => result,
            Err(e) => {
                self.metrics.record_error();
                return Err(e);
            }
        };
        self.metrics.record_search(started.elapsed());

        let response = SearchResponse {
            contractors,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: (total + limit - 1) / limit,
            },
        };
        self.cache.set(cache_key, response.clone(), self.cache_ttl);
        Ok(response)
    }
}

/// Build the predicate set for a request. Smart searches go through the
/// phrase parser; the plain types map directly onto single columns.
fn build_predicates(request: &SearchRequest) -> PredicateSet {
    let term = request.search_term.trim();
    match request.search_type {
        SearchType::Smart => parse_smart_search(term, 1),
        SearchType::Name => with_city_filter(
            PredicateSet {
                conditions: vec!["business_name LIKE $1".to_string()],
                params: vec![format!("%{term}%")],
            },
            request.city.as_deref(),
        ),
        SearchType::License => with_city_filter(
            PredicateSet {
                conditions: vec!["license_no LIKE $1".to_string()],
                params: vec![format!("%{term}%")],
            },
            request.city.as_deref(),
        ),
        SearchType::City => PredicateSet {
            conditions: vec!["UPPER(TRIM(city)) = UPPER($1)".to_string()],
            params: vec![term.to_string()],
        },
    }
}

fn with_city_filter(mut set: PredicateSet, city: Option<&str>) -> PredicateSet {
    if let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) {
        let index = set.params.len() + 1;
        set.conditions
            .push(format!("UPPER(TRIM(city)) = UPPER(${index})"));
        set.params.push(city.to_string());
    }
    set
}

fn cache_key(request: &SearchRequest, page: i64, limit: i64) -> String {
    format!(
        "{:?}|{}|{}|{}|{}|{}",
        request.search_type,
        request.search_term.trim().to_lowercase(),
        request.city.as_deref().unwrap_or(""),
        request.state.as_deref().unwrap_or(""),
        page,
        limit,
    )
}
