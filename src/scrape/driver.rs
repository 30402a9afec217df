//! Pagination driver
//!
//! Runs the round loop: acquire the initial hidden fields, then submit a
//! search per page, relaying the tokens returned by each response into the
//! next request until a stop condition. One logical thread of control; the
//! only suspension is the pacing delay between pages.

use crate::config::Config;
use crate::scrape::form::fetch_entry_fields;
use crate::scrape::requester::{submit_search, SearchRequest};
use crate::scrape::CompanyRecord;
use crate::Result;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;

/// Why the pagination loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A short page or the reported total told us all results are in
    Completed,
    /// A page came back with zero companies (natural end of results)
    NoMoreResults,
    /// A page request failed; earlier pages are kept
    PageFailed(String),
    /// The current fields lack the required tokens
    TokensUnavailable,
    /// The fixed page ceiling was reached with results still pending
    MaxPagesReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Completed => write!(f, "all results collected"),
            StopReason::NoMoreResults => write!(f, "no more results"),
            StopReason::PageFailed(e) => write!(f, "page request failed: {}", e),
            StopReason::TokensUnavailable => write!(f, "required tokens unavailable"),
            StopReason::MaxPagesReached => write!(f, "maximum page count reached"),
        }
    }
}

/// Accumulated output of a scrape run
#[derive(Debug)]
pub struct ScrapeOutcome {
    /// All collected companies, in collection order
    pub companies: Vec<CompanyRecord>,

    /// Total result count as last reported by the portal
    pub total_reported: Option<usize>,

    /// Number of successfully fetched pages
    pub pages_fetched: usize,

    /// Why the run stopped
    pub stop: StopReason,
}

/// Drives the full search flow against one portal
pub struct Scraper {
    client: Client,
    config: Config,
    keyword: String,
}

impl Scraper {
    pub fn new(client: Client, config: Config, keyword: String) -> Self {
        Self {
            client,
            config,
            keyword,
        }
    }

    /// Runs the scrape to completion
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeOutcome)` - Accumulated records plus the stop reason;
    ///   mid-run failures land here so partial results survive
    /// * `Err(ScoutError)` - Initial token extraction failed (nothing was
    ///   collected)
    pub async fn run(&self) -> Result<ScrapeOutcome> {
        let mut fields = fetch_entry_fields(&self.client, &self.config, &self.keyword).await?;

        let max_pages = self.config.search.max_pages;
        let page_size = self.config.search.page_size;

        let mut companies: Vec<CompanyRecord> = Vec::new();
        let mut total_reported: Option<usize> = None;
        let mut offset = 0usize;
        let mut page = 1usize;
        let mut pages_fetched = 0usize;

        let stop = loop {
            if page > max_pages {
                tracing::warn!("Maximum page count ({}) reached", max_pages);
                break StopReason::MaxPagesReached;
            }

            if !fields.has_tokens() {
                tracing::error!("Page {} has no usable CSRF/view-state tokens", page);
                break StopReason::TokensUnavailable;
            }

            // has_tokens verified both are present
            let csrf = fields.csrf().unwrap_or_default().to_string();
            let view_state = fields.view_state().unwrap_or_default().to_string();
            tracing::debug!(
                "Page {} tokens: csrf={}…, vs={}…",
                page,
                csrf.chars().take(10).collect::<String>(),
                view_state.chars().take(10).collect::<String>()
            );

            let request = SearchRequest {
                keyword: &self.keyword,
                filters: &self.config.filters,
                csrf: &csrf,
                view_state: &view_state,
                offset,
                fields: &fields,
            };

            let page_result = match submit_search(&self.client, &self.config, &request).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Page {} failed: {}", page, e);
                    break StopReason::PageFailed(e.to_string());
                }
            };

            pages_fetched += 1;

            if total_reported.is_none() {
                if let Some(total) = page_result.total {
                    tracing::info!("Portal reports {} total results", total);
                    total_reported = Some(total);
                }
            }

            let page_count = page_result.companies.len();
            fields = page_result.next_fields;

            if page_count == 0 {
                tracing::info!("Page {} returned no companies, stopping", page);
                break StopReason::NoMoreResults;
            }

            companies.extend(page_result.companies);
            tracing::info!(
                "Page {} done: {} companies added ({} accumulated)",
                page,
                page_count,
                companies.len()
            );

            if is_final_page(page_count, page_size, companies.len(), total_reported) {
                tracing::info!("Last page reached or all reported results collected");
                break StopReason::Completed;
            }

            offset += page_count;
            page += 1;
            self.pause().await;
        };

        Ok(ScrapeOutcome {
            companies,
            total_reported,
            pages_fetched,
            stop,
        })
    }

    /// Sleeps a randomized interval before the next page request
    async fn pause(&self) {
        let min = self.config.search.delay_min_secs;
        let max = self.config.search.delay_max_secs;

        let wait = if max > min {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        };

        if wait > 0.0 {
            tracing::info!("Waiting {:.1}s before next page", wait);
            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
        }
    }
}

/// True when the page just collected was the last one worth requesting
///
/// Either the page was short of a full page of results, or the accumulated
/// count reached the reported total (when one is known and positive).
fn is_final_page(
    page_count: usize,
    page_size: usize,
    accumulated: usize,
    total_reported: Option<usize>,
) -> bool {
    if page_count < page_size {
        return true;
    }
    matches!(total_reported, Some(total) if total > 0 && accumulated >= total)
}
