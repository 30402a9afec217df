//! JSON results file written at the end of a run

use crate::scrape::CompanyRecord;
use crate::Result;
use std::path::{Path, PathBuf};

/// Reduces a keyword to a filename-safe token
///
/// Anything outside ASCII alphanumerics becomes an underscore; an empty
/// keyword gets a placeholder so the filename stays meaningful.
pub fn sanitize_keyword(keyword: &str) -> String {
    if keyword.is_empty() {
        return "no_keyword".to_string();
    }

    keyword
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Path of the results file for a given keyword
pub fn results_path(dir: &str, keyword: &str) -> PathBuf {
    Path::new(dir).join(format!("mynavi_companies_{}.json", sanitize_keyword(keyword)))
}

/// Writes all accumulated records as a pretty-printed JSON array
///
/// # Arguments
///
/// * `dir` - Output directory
/// * `keyword` - Search keyword (sanitized into the filename)
/// * `companies` - The records to persist
///
/// # Returns
///
/// The path of the written file
pub fn save_companies(dir: &str, keyword: &str, companies: &[CompanyRecord]) -> Result<PathBuf> {
    let path = results_path(dir, keyword);
    let json = serde_json::to_string_pretty(companies)?;
    std::fs::write(&path, json)?;
    tracing::info!("Saved {} companies to {}", companies.len(), path.display());
    Ok(path)
}
