use serde::Deserialize;

/// Main configuration structure for Mynavi-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_filters", rename = "filter")]
    pub filters: Vec<FilterEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            search: SearchConfig::default(),
            output: OutputConfig::default(),
            filters: default_filters(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Origin of the portal, no trailing slash
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops before a request fails
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User agent sent on every request (the portal expects a browser)
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

/// Search and pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// CSS selector identifying the search form on the entry page
    #[serde(rename = "form-selector", default = "default_form_selector")]
    pub form_selector: String,

    /// Results per page as served by the portal
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: usize,

    /// Hard ceiling on pagination rounds
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Lower bound of the randomized inter-page delay, in seconds
    #[serde(rename = "delay-min-secs", default = "default_delay_min")]
    pub delay_min_secs: f64,

    /// Upper bound of the randomized inter-page delay, in seconds
    #[serde(rename = "delay-max-secs", default = "default_delay_max")]
    pub delay_max_secs: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            form_selector: default_form_selector(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            delay_min_secs: default_delay_min(),
            delay_max_secs: default_delay_max(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for the JSON results file
    #[serde(rename = "results-dir", default = "default_dir")]
    pub results_dir: String,

    /// Directory for diagnostic HTML snapshots
    #[serde(rename = "snapshot-dir", default = "default_dir")]
    pub snapshot_dir: String,

    /// Whether to save a snapshot of every fetched results page
    #[serde(rename = "save-snapshots", default)]
    pub save_snapshots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_dir(),
            snapshot_dir: default_dir(),
            save_snapshots: false,
        }
    }
}

/// One search filter: a logical category and the portal's codes for it
#[derive(Debug, Clone, Deserialize)]
pub struct FilterEntry {
    /// Logical category name (e.g. "welfare")
    pub category: String,

    /// Filter codes sent as repeated form values
    pub codes: Vec<String>,
}

fn default_base_url() -> String {
    "https://job.mynavi.jp".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/132.0.0.0 Whale/4.30.291.11 Safari/537.36"
        .to_string()
}

fn default_form_selector() -> String {
    "#displaySearchCorpListByGenCondDispForm".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_max_pages() -> usize {
    10
}

fn default_delay_min() -> f64 {
    1.5
}

fn default_delay_max() -> f64 {
    3.0
}

fn default_dir() -> String {
    ".".to_string()
}

fn default_filters() -> Vec<FilterEntry> {
    // The portal's "120+ days off per year" welfare filter
    vec![FilterEntry {
        category: "welfare".to_string(),
        codes: vec!["1830".to_string()],
    }]
}
