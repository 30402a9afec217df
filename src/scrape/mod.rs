//! Scraping pipeline for the corp-search portal
//!
//! The flow is strictly sequential: fetch the entry form, extract its
//! hidden fields, POST a search, parse the result cards, then repeat with
//! the tokens carried out of each response until a stop condition.

pub mod driver;
pub mod form;
pub mod requester;
pub mod results;

pub use driver::{ScrapeOutcome, Scraper, StopReason};
pub use form::{collect_hidden_fields, fetch_entry_fields, HiddenFields};
pub use requester::{submit_search, PageResult, SearchRequest};
pub use results::{parse_results, CompanyRecord};
