//! Session-scoped HTTP client construction
//!
//! The portal ties search continuity to cookies handed out on the entry
//! page, so one client with a shared cookie jar lives for the whole run.
//! Statuses under 500 are ordinary responses here; callers inspect them.

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Accept header a real browser sends when navigating
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
    image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Builds the HTTP client used for the entire scrape run
///
/// Cookies accumulate in the jar across every request for the process
/// lifetime; redirects are followed up to the configured hop count.
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    default_headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ko-KR,ko;q=0.9"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .default_headers(default_headers)
        .build()
}
