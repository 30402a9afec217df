//! Hidden form field extraction
//!
//! The portal embeds anti-forgery state in hidden inputs of the search
//! form. Every request must echo those fields back, so each response is
//! mined for a fresh set.

use crate::config::Config;
use crate::output::snapshot::save_debug_page;
use crate::{Result, ScoutError};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Name of the CSRF token field
pub const CSRF_FIELD: &str = "_csrf";

/// Name of the view-state token field
pub const VIEW_STATE_FIELD: &str = "_vs";

/// Entry page that serves the search form
const ENTRY_PATH: &str = "/26/pc/corpinfo/searchCorpListByGenCond/index/";

/// Diagnostic dump written when the entry page yields no tokens
const DEBUG_PAGE_NAME: &str = "debug_entry_page.html";

/// An immutable snapshot of a form's hidden name/value pairs
///
/// Captured wholesale from one response and consumed as input to the next
/// request; a new snapshot replaces it each round rather than mutating it
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenFields {
    fields: BTreeMap<String, String>,
}

impl HiddenFields {
    /// Returns the value of a field, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns the CSRF token, if present
    pub fn csrf(&self) -> Option<&str> {
        self.get(CSRF_FIELD)
    }

    /// Returns the view-state token, if present
    pub fn view_state(&self) -> Option<&str> {
        self.get(VIEW_STATE_FIELD)
    }

    /// True when both required tokens are present and non-empty
    pub fn has_tokens(&self) -> bool {
        self.csrf().is_some_and(|v| !v.is_empty())
            && self.view_state().is_some_and(|v| !v.is_empty())
    }

    /// Returns a copy with the token fields replaced
    ///
    /// Used for the documented fallback: when a response omits refreshed
    /// tokens, the current ones are carried into the next round.
    pub fn with_tokens(&self, csrf: &str, view_state: &str) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(CSRF_FIELD.to_string(), csrf.to_string());
        fields.insert(VIEW_STATE_FIELD.to_string(), view_state.to_string());
        Self { fields }
    }

    /// Iterates over all name/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for HiddenFields {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Collects the hidden inputs of the target form into a `HiddenFields`
///
/// # Arguments
///
/// * `html` - The page body to scan
/// * `form_selector` - CSS selector identifying the form
///
/// # Returns
///
/// * `Ok(HiddenFields)` - Both required tokens present
/// * `Err(ScoutError::FormMissing)` - The form is absent from the page
/// * `Err(ScoutError::TokensMissing)` - The form lacks `_csrf` or `_vs`
pub fn collect_hidden_fields(html: &str, form_selector: &str) -> Result<HiddenFields> {
    let document = Html::parse_document(html);

    let form_sel = Selector::parse(form_selector).map_err(|_| ScoutError::FormMissing {
        selector: form_selector.to_string(),
    })?;

    let form = document
        .select(&form_sel)
        .next()
        .ok_or_else(|| ScoutError::FormMissing {
            selector: form_selector.to_string(),
        })?;

    let hidden_sel = Selector::parse(r#"input[type="hidden"]"#)
        .map_err(|_| ScoutError::TokensMissing)?;

    let fields: HiddenFields = form
        .select(&hidden_sel)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or("");
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    if !fields.has_tokens() {
        return Err(ScoutError::TokensMissing);
    }

    tracing::debug!("Collected {} hidden form fields", fields.len());
    Ok(fields)
}

/// Builds the entry URL carrying the keyword as a `cond=FW:` query value
pub fn entry_url(base_url: &str, keyword: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", base_url, ENTRY_PATH))?;
    url.query_pairs_mut()
        .append_pair("cond", &format!("FW:{}", keyword));
    Ok(url)
}

/// Fetches the entry page and extracts the initial hidden form fields
///
/// On token-absence failure the raw HTML is dumped to the snapshot
/// directory for offline inspection.
///
/// # Arguments
///
/// * `client` - The session HTTP client
/// * `config` - The scraper configuration
/// * `keyword` - Search keyword seeded into the entry URL
pub async fn fetch_entry_fields(
    client: &Client,
    config: &Config,
    keyword: &str,
) -> Result<HiddenFields> {
    let url = entry_url(&config.http.base_url, keyword)?;
    tracing::info!("Fetching hidden form fields from {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| ScoutError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScoutError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;

    match collect_hidden_fields(&body, &config.search.form_selector) {
        Ok(fields) => {
            tracing::info!("Extracted initial form fields ({} entries)", fields.len());
            Ok(fields)
        }
        Err(e) => {
            tracing::error!("Hidden field extraction failed: {}", e);
            save_debug_page(&config.output.snapshot_dir, DEBUG_PAGE_NAME, &body);
            Err(e)
        }
    }
}
