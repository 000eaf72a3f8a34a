//! Crawl coordinator - cycle resolution and the per-airport crawl
//!
//! One airport crawl is strictly sequential:
//! 1. Resolve the current cycle code from the landing page
//! 2. For each requested filter, build the results query
//! 3. Walk that filter's pages until the reported page count is reached
//! 4. Concatenate every filter's records in order, without deduplication

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_html};
use crate::crawler::parser::{parse_results_page, PageOutcome, PageResult};
use crate::cycle::{
    extract_cycle, locate_date_range, normalize_label, parse_effective_dates, Cycle, CycleKind,
    EffectiveDateRange,
};
use crate::procedure::{ListOptions, ProcedureRecord, QueryFilter};
use crate::TppError;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Client;
use scraper::Html;
use url::Url;

/// Client for the d-TPP search pages
///
/// Holds no state between calls beyond the HTTP connection pool: every cycle
/// lookup is a fresh request and nothing is cached across crawls.
#[derive(Debug, Clone)]
pub struct ProceduresClient {
    client: Client,
    search_url: Url,
    results_url: Url,
}

impl ProceduresClient {
    /// Creates a client from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ProceduresClient)` - Ready to query
    /// * `Err(TppError)` - Invalid base URL or HTTP client construction failure
    pub fn new(config: &Config) -> Result<Self, TppError> {
        let client = build_http_client(config).map_err(TppError::ClientBuild)?;
        Self::with_client(client, &config.source.base_url)
    }

    /// Creates a client around an existing HTTP client
    ///
    /// `base_url` is the search root; a missing trailing slash is added so that
    /// `results/` resolves beneath it.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, TppError> {
        let mut search_url = Url::parse(base_url)?;
        if !search_url.path().ends_with('/') {
            let path = format!("{}/", search_url.path());
            search_url.set_path(&path);
        }
        search_url.set_query(None);
        let results_url = search_url.join("results/")?;

        Ok(Self {
            client,
            search_url,
            results_url,
        })
    }

    /// The search landing page
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    /// Looks up a published cycle on the landing page
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Cycle))` - The cycle is listed
    /// * `Ok(None)` - The cycle is not listed (e.g. next cycle not yet published)
    /// * `Err(TppError)` - The landing page could not be fetched
    pub async fn resolve_cycle(&self, kind: CycleKind) -> Result<Option<Cycle>, TppError> {
        let body = fetch_html(&self.client, self.search_url.as_str()).await?;
        let cycle = extract_cycle(&Html::parse_document(&body), kind);

        match &cycle {
            Some(cycle) => tracing::debug!("{} cycle is {} ({})", kind, cycle.code, cycle.label),
            None => tracing::debug!("{} cycle not listed on {}", kind, self.search_url),
        }

        Ok(cycle)
    }

    /// Code of the current cycle
    pub async fn resolve_current_cycle_code(&self) -> Result<Option<String>, TppError> {
        Ok(self
            .resolve_cycle(CycleKind::Current)
            .await?
            .map(|cycle| cycle.code))
    }

    /// Same as [`resolve_current_cycle_code`](Self::resolve_current_cycle_code)
    pub async fn fetch_current_cycle(&self) -> Result<Option<String>, TppError> {
        self.resolve_current_cycle_code().await
    }

    /// Code of the next cycle, once it is published
    pub async fn resolve_next_cycle_code(&self) -> Result<Option<String>, TppError> {
        Ok(self
            .resolve_cycle(CycleKind::Next)
            .await?
            .map(|cycle| cycle.code))
    }

    /// Effective dates of a cycle, read from its label on the landing page
    ///
    /// `Ok(None)` when the cycle is not listed or its label carries no
    /// parsable date range.
    pub async fn effective_dates_for(
        &self,
        kind: CycleKind,
    ) -> Result<Option<EffectiveDateRange>, TppError> {
        let Some(cycle) = self.resolve_cycle(kind).await? else {
            return Ok(None);
        };

        let label = normalize_label(&cycle.label);
        let range = locate_date_range(&label).and_then(|text| parse_effective_dates(text));
        if range.is_none() {
            tracing::debug!("No effective dates in {} cycle label '{}'", kind, label);
        }

        Ok(range)
    }

    /// Effective dates of the current cycle
    pub async fn current_cycle_effective_dates(
        &self,
    ) -> Result<Option<EffectiveDateRange>, TppError> {
        self.effective_dates_for(CycleKind::Current).await
    }

    /// Fetches and parses one results page
    pub async fn fetch_page(&self, url: &str) -> Result<PageResult, TppError> {
        let page_url = Url::parse(url)?;
        let body = fetch_html(&self.client, url).await?;
        Ok(parse_results_page(&body, &page_url))
    }

    /// Builds the first-page query for one airport and filter
    ///
    /// `sort=type&dir=asc&ident=<icao>[&cycle=<code>]` plus the filter's own
    /// parameter. Without a cycle code the upstream defaults to the latest cycle.
    pub fn query_url(&self, icao: &str, cycle: Option<&str>, filter: QueryFilter) -> Url {
        let mut url = self.results_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("sort", "type")
                .append_pair("dir", "asc")
                .append_pair("ident", icao);
            if let Some(code) = cycle {
                query.append_pair("cycle", code);
            }
            if let Some(param) = filter.query_param() {
                query.append_pair(param, "1");
            }
        }
        url
    }

    /// Lists every procedure for one airport
    ///
    /// Each filter in `options` is an independent sub-crawl; the results are
    /// concatenated in filter order, so a record matched by two filters appears
    /// twice. Transport failures abort the whole crawl.
    pub async fn list_one(
        &self,
        icao: &str,
        options: &ListOptions,
    ) -> Result<Vec<ProcedureRecord>, TppError> {
        let cycle = self.resolve_current_cycle_code().await?;
        if cycle.is_none() {
            tracing::warn!("No current cycle found, querying {} without a cycle", icao);
        }

        let mut procedures = Vec::new();
        for filter in options.passes() {
            let query = self.query_url(icao, cycle.as_deref(), filter);
            let records: Vec<ProcedureRecord> = self
                .pages(query)
                .map_ok(|page| page.records)
                .try_concat()
                .await?;

            tracing::info!("{} {:?}: {} procedures", icao, filter, records.len());
            procedures.extend(records);
        }

        Ok(procedures)
    }

    /// Pages of one filtered query, fetched one at a time
    ///
    /// Page 1 is the bare query. An empty first page ends the walk; otherwise
    /// pages continue up to the page count reported by the latest page that
    /// carried a results table. Pages without a table keep the previous bound.
    fn pages(&self, query: Url) -> impl Stream<Item = Result<PageResult, TppError>> + '_ {
        stream::try_unfold(Some(PageCursor::first()), move |next| {
            let query = query.clone();
            async move {
                let Some(cursor) = next else {
                    return Ok(None);
                };

                let url = page_url(&query, cursor.page);
                let result = self.fetch_page(url.as_str()).await?;
                let following = cursor.advance(&result);
                Ok(Some((result, following)))
            }
        })
    }
}

/// Position in a page walk: the page to fetch and the last known page count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageCursor {
    page: u32,
    bound: u32,
}

impl PageCursor {
    fn first() -> Self {
        Self { page: 1, bound: 0 }
    }

    /// Cursor for the page after this one, given what this page returned
    fn advance(self, result: &PageResult) -> Option<Self> {
        if self.page == 1 && result.records.is_empty() {
            return None;
        }

        let bound = match result.outcome {
            PageOutcome::Results => result.page_count,
            PageOutcome::NoResults | PageOutcome::MissingTable => self.bound,
        };

        (self.page < bound).then_some(Self {
            page: self.page + 1,
            bound,
        })
    }
}

/// URL of the given page of a query
fn page_url(query: &Url, page: u32) -> Url {
    let mut url = query.clone();
    if page > 1 {
        url.query_pairs_mut().append_pair("page", &page.to_string());
    }
    url
}
