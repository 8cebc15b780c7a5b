//! Drives the page-by-page search for each company and collects the results.
//!
//! Each company gets its own [`SearchState`]. A page is fetched, its links are
//! extracted and deduplicated, and the loop stops as soon as the cap is met,
//! a page brings nothing new, the pages run out, or a fetch fails. A failure
//! for one company never stops the others.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::{RunParams, SearchConfig};
use crate::delay_manager;
use crate::error::{ConfigError, FinderError};
use crate::extractor::{Extractor, ResultRecord};
use crate::pagination;
use crate::search_engine::{self, HttpFetcher, PageFetcher};

/// Links seen so far and records accepted so far for one company.
#[derive(Debug, Default)]
pub struct SearchState {
    seen_links: HashSet<String>,
    records: Vec<ResultRecord>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every candidate whose link has not been seen before, keeping
    /// their order. Returns the number of records appended.
    pub fn admit<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = ResultRecord>,
    {
        let before = self.records.len();
        for record in candidates {
            if self.seen_links.insert(record.link.clone()) {
                self.records.push(record);
            }
        }
        self.records.len() - before
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self, cap: usize) -> Vec<ResultRecord> {
        let mut records = self.records;
        records.truncate(cap);
        records
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    CapReached,
    NoNewResults,
    PagesExhausted,
    FetchFailed,
}

/// Decides whether to stop after a page. The cap wins over an empty page.
pub fn stop_condition(accumulated: usize, cap: usize, new_on_page: usize) -> Option<StopReason> {
    if accumulated >= cap {
        Some(StopReason::CapReached)
    } else if new_on_page == 0 {
        Some(StopReason::NoNewResults)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyResults {
    pub company: String,
    pub records: Vec<ResultRecord>,
    pub stop_reason: StopReason,
    pub pages_fetched: usize,
}

#[derive(Debug)]
pub enum CompanyOutcome {
    Found(CompanyResults),
    Failed { company: String, error: FinderError },
}

impl CompanyOutcome {
    pub fn company(&self) -> &str {
        match self {
            CompanyOutcome::Found(results) => &results.company,
            CompanyOutcome::Failed { company, .. } => company,
        }
    }

    pub fn records(&self) -> &[ResultRecord] {
        match self {
            CompanyOutcome::Found(results) => &results.records,
            CompanyOutcome::Failed { .. } => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CompanyOutcome::Failed { .. })
    }
}

/// Outcomes for every processed company, in input order.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub outcomes: Vec<CompanyOutcome>,
}

impl DiscoveryReport {
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.outcomes.iter().flat_map(|outcome| outcome.records().iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompanyOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }

    /// All records, company after company.
    pub fn into_records(self) -> Vec<ResultRecord> {
        self.outcomes
            .into_iter()
            .flat_map(|outcome| match outcome {
                CompanyOutcome::Found(results) => results.records,
                CompanyOutcome::Failed { .. } => Vec::new(),
            })
            .collect()
    }
}

pub struct CompanyFinder<F = HttpFetcher> {
    config: SearchConfig,
    fetcher: F,
    extractor: Extractor,
    pause: Box<dyn Fn(Duration)>,
}

impl CompanyFinder<HttpFetcher> {
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: PageFetcher> CompanyFinder<F> {
    pub fn with_fetcher(config: SearchConfig, fetcher: F) -> Self {
        CompanyFinder {
            config,
            fetcher,
            extractor: Extractor::new(),
            pause: Box::new(delay_manager::page_delay),
        }
    }

    /// Replaces the sleep run between two pages of the same company.
    pub fn with_pause<P>(mut self, pause: P) -> Self
    where
        P: Fn(Duration) + 'static,
    {
        self.pause = Box::new(pause);
        self
    }

    /// Pages through the search results for one (already trimmed) company.
    ///
    /// A failed fetch ends the loop and keeps whatever was collected before it;
    /// only non-transport problems are returned as errors.
    pub fn search_company(&self, company: &str, params: &RunParams) -> Result<CompanyResults, FinderError> {
        let page_size = pagination::clamp_positive(params.results_per_company);
        let cap = usize::try_from(page_size).unwrap_or(usize::MAX);

        info!("Searching LinkedIn URLs for '{}'", company);

        let mut state = SearchState::new();
        let mut stop_reason = StopReason::PagesExhausted;
        let mut pages_fetched = 0;
        let mut pages = pagination::page_sequence(params.start_page, params.max_pages).peekable();

        while let Some(page) = pages.next() {
            let url = search_engine::build_search_url(&self.config, company, page, page_size)?;

            let html = match self.fetcher.fetch(&url) {
                Ok(html) => html,
                Err(e) => {
                    warn!("Request failed for '{}' (page {}): {}", company, page, e);
                    stop_reason = StopReason::FetchFailed;
                    break;
                }
            };
            pages_fetched += 1;

            let candidates = self.extractor.extract(&html, company);
            let found = candidates.len();
            let new_on_page = state.admit(candidates);

            debug!(
                "Page {} for '{}': found {} LinkedIn results ({} new after dedupe)",
                page, company, found, new_on_page
            );

            if let Some(reason) = stop_condition(state.len(), cap, new_on_page) {
                match reason {
                    StopReason::CapReached => {
                        debug!("Reached requested limit ({}) for '{}'", cap, company)
                    }
                    _ => debug!("No new results found for '{}' on page {}; stopping.", company, page),
                }
                stop_reason = reason;
                break;
            }

            if pages.peek().is_some() {
                (self.pause)(self.config.request_delay);
            }
        }

        let records = state.into_records(cap);
        info!("Found {} LinkedIn URLs for '{}'", records.len(), company);

        Ok(CompanyResults {
            company: company.to_string(),
            records,
            stop_reason,
            pages_fetched,
        })
    }

    /// Searches every non-blank name in order. Each company's failure is
    /// recorded in the report and the run moves on to the next name.
    pub fn search_for_companies<I, S>(&self, companies: I, params: &RunParams) -> DiscoveryReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = DiscoveryReport::default();

        for company in companies {
            let company = company.as_ref().trim();
            if company.is_empty() {
                continue;
            }

            debug!("Starting search for company: {}", company);
            let outcome = match self.search_company(company, params) {
                Ok(results) => CompanyOutcome::Found(results),
                Err(e) => {
                    error!("Unexpected error while searching for '{}': {}", company, e);
                    CompanyOutcome::Failed {
                        company: company.to_string(),
                        error: e,
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        report
    }
}
