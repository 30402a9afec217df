//! Search request construction and submission
//!
//! Assembles the form-encoded search payload the way the portal's own
//! frontend does: keyword, filter codes, every hidden field from the prior
//! round, and the pagination cursor. Interprets the response body state and
//! carries a fresh set of hidden fields out for the next round.

use crate::config::{Config, FilterEntry};
use crate::output::snapshot::save_page_snapshot;
use crate::scrape::form::{collect_hidden_fields, HiddenFields, CSRF_FIELD, VIEW_STATE_FIELD};
use crate::scrape::results::{
    parse_results, CompanyRecord, BAD_REQUEST_MARKERS, SESSION_EXPIRED_MARKER,
};
use crate::{Result, ScoutError};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

/// Endpoint for a first-page search
const SEARCH_PATH: &str = "/26/pc/corpinfo/displayCorpSearch/doSearch";

/// Endpoint for subsequent pages
const PAGED_PATH: &str = "/26/pc/corpinfo/searchCorpListByGenCond/doSpecifiedPage";

/// Referer path preceding a first-page search
const ENTRY_REFERER: &str = "/26/pc/corpinfo/displayCorpSearch/index";

/// Pagination cursor field (absolute result offset, not a page number)
const OFFSET_FIELD: &str = "displaytop";

/// Action-mode field set only on paginated requests
const ACTION_MODE_FIELD: &str = "actionMode";
const ACTION_MODE_PAGED: &str = "searchFw";

/// Logical filter category → the portal's actual parameter name
const CATEGORY_PARAM_MAP: [(&str, &str); 1] = [("welfare", "corpWelfareArray")];

/// Radio-style fields the frontend always submits; applied only when the
/// copied hidden fields did not already carry them
const RADIO_DEFAULTS: [(&str, &str); 4] = [
    ("limitedIndMainRadio", "0"),
    ("hqRegionCorpsRadio", "3"),
    ("searchRangeOcc", "0"),
    ("welfareSearchMatchMethod", "0"),
];

/// An ordered form body with URLSearchParams-like semantics
///
/// Repeated keys are legal (filter codes rely on it); `set` replaces every
/// occurrence with a single pair.
#[derive(Debug, Clone, Default)]
pub struct FormBody {
    pairs: Vec<(String, String)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair, keeping any existing occurrences of the key
    pub fn append(&mut self, name: &str, value: &str) {
        self.pairs.push((name.to_string(), value.to_string()));
    }

    /// Replaces all occurrences of the key with a single pair
    pub fn set(&mut self, name: &str, value: &str) {
        self.pairs.retain(|(k, _)| k != name);
        self.pairs.push((name.to_string(), value.to_string()));
    }

    /// Removes every occurrence of the key
    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(k, _)| k != name);
    }

    pub fn has(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// All values recorded under the key, in insertion order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn pairs(&self) -> &Vec<(String, String)> {
        &self.pairs
    }
}

/// Inputs for one search round
#[derive(Debug)]
pub struct SearchRequest<'a> {
    /// Search keyword, may be empty
    pub keyword: &'a str,

    /// Active filters
    pub filters: &'a [FilterEntry],

    /// Current CSRF token; overrides any stale copy in `fields`
    pub csrf: &'a str,

    /// Current view-state token; overrides any stale copy in `fields`
    pub view_state: &'a str,

    /// Absolute result offset (0 for the first page)
    pub offset: usize,

    /// Hidden fields captured from the previous round
    pub fields: &'a HiddenFields,
}

/// Everything extracted from one results page
#[derive(Debug)]
pub struct PageResult {
    /// Companies in document order
    pub companies: Vec<CompanyRecord>,

    /// Total result count reported by the page, when the summary element
    /// was found
    pub total: Option<usize>,

    /// Hidden fields to use for the next round
    pub next_fields: HiddenFields,
}

/// Assembles the form body for a search request
pub fn build_search_form(req: &SearchRequest) -> FormBody {
    let mut body = FormBody::new();

    // Required search condition
    body.append("srchWord", req.keyword);
    body.append("srchWordTgt", "1");

    // Applied filters: repeated codes plus the companion "enabled" flag
    for filter in req.filters {
        let param = CATEGORY_PARAM_MAP
            .iter()
            .find(|(category, _)| *category == filter.category)
            .map(|(_, param)| *param)
            .unwrap_or(filter.category.as_str());

        for code in &filter.codes {
            body.append(param, code);
        }
        body.append(&format!("_{}", param), "on");
    }

    // Carry every prior hidden field forward; the cursor is recomputed below
    for (name, value) in req.fields.iter() {
        if name != OFFSET_FIELD {
            body.append(name, value);
        }
    }

    // The supplied tokens take precedence over any copied stale values
    body.set(CSRF_FIELD, req.csrf);
    body.set(VIEW_STATE_FIELD, req.view_state);

    body.set(OFFSET_FIELD, &req.offset.to_string());

    if req.offset > 0 {
        body.set(ACTION_MODE_FIELD, ACTION_MODE_PAGED);
    } else {
        body.remove(ACTION_MODE_FIELD);
    }

    for (name, value) in RADIO_DEFAULTS {
        if !body.has(name) {
            body.append(name, value);
        }
    }

    body
}

/// Submits a search request and interprets the response
///
/// All failure modes (bad status, error-marker body) surface as errors for
/// the driver to handle; a missing total count or a failed token refresh
/// are degradations, not failures.
///
/// # Arguments
///
/// * `client` - The session HTTP client
/// * `config` - The scraper configuration
/// * `req` - Inputs for this round
pub async fn submit_search(
    client: &Client,
    config: &Config,
    req: &SearchRequest<'_>,
) -> Result<PageResult> {
    let base = &config.http.base_url;
    let (path, referer) = if req.offset == 0 {
        (SEARCH_PATH, ENTRY_REFERER)
    } else {
        (PAGED_PATH, SEARCH_PATH)
    };
    let url = format!("{}{}", base, path);

    let body = build_search_form(req);
    tracing::info!(
        "Submitting search (keyword: \"{}\", offset: {})",
        req.keyword,
        req.offset
    );

    let response = client
        .post(&url)
        .header("Cache-Control", "max-age=0")
        .header("Origin", base.as_str())
        .header("Referer", format!("{}{}", base, referer))
        .form(body.pairs())
        .send()
        .await
        .map_err(|source| ScoutError::Http {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    tracing::debug!("Response status at offset {}: {}", req.offset, status);

    if status.as_u16() != 200 {
        return Err(ScoutError::BadStatus {
            url,
            status: status.as_u16(),
        });
    }

    let html = response.text().await?;

    if let Some(marker) = find_error_marker(&html) {
        return Err(ScoutError::ErrorMarker {
            marker: marker.to_string(),
        });
    }

    if config.output.save_snapshots {
        save_page_snapshot(&config.output.snapshot_dir, req.keyword, req.offset, &html);
    }

    let total = parse_total_count(&html);
    if req.offset == 0 {
        match total {
            Some(total) => tracing::info!("Page reports {} total results", total),
            None => tracing::warn!("Total result count element not found"),
        }
    }

    let next_fields = match collect_hidden_fields(&html, &config.search.form_selector) {
        Ok(fields) => {
            tracing::debug!("Refreshed tokens for next round (offset {})", req.offset);
            fields
        }
        Err(e) => {
            // Documented fallback: reuse the current tokens rather than fail
            tracing::warn!(
                "No refreshed tokens in response at offset {} ({}); reusing current tokens",
                req.offset,
                e
            );
            req.fields.with_tokens(req.csrf, req.view_state)
        }
    };

    let companies = parse_results(&html, base);

    Ok(PageResult {
        companies,
        total,
        next_fields,
    })
}

/// Finds the first known error marker in a response body
fn find_error_marker(html: &str) -> Option<&'static str> {
    if html.contains(SESSION_EXPIRED_MARKER) {
        return Some(SESSION_EXPIRED_MARKER);
    }
    BAD_REQUEST_MARKERS.iter().find(|m| html.contains(**m)).copied()
}

/// Best-effort read of the reported total from the summary heading
fn parse_total_count(html: &str) -> Option<usize> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("h2.hdg01.refinement span#searchResultkensuuRef").ok()?;
    let text: String = document.select(&sel).next()?.text().collect();

    let re = Regex::new(r"(\d+)").ok()?;
    re.captures(&text)?[1].parse().ok()
}
