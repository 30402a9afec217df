//! Diagnostic HTML snapshots
//!
//! These are debugging aids, not output: a failed write is logged and
//! otherwise ignored so it never interrupts a run.

use crate::output::json::sanitize_keyword;
use std::path::{Path, PathBuf};

/// Path of the snapshot for one fetched results page
pub fn page_snapshot_path(dir: &str, keyword: &str, offset: usize) -> PathBuf {
    Path::new(dir).join(format!(
        "mynavi_result_{}_offset{}.html",
        sanitize_keyword(keyword),
        offset
    ))
}

/// Saves the raw body of a successfully fetched results page
pub fn save_page_snapshot(dir: &str, keyword: &str, offset: usize, html: &str) {
    let path = page_snapshot_path(dir, keyword, offset);
    match std::fs::write(&path, html) {
        Ok(()) => tracing::debug!("Saved page snapshot: {}", path.display()),
        Err(e) => tracing::warn!("Failed to save snapshot {}: {}", path.display(), e),
    }
}

/// Saves a one-off diagnostic page under a fixed name
pub fn save_debug_page(dir: &str, name: &str, html: &str) {
    let path = Path::new(dir).join(name);
    match std::fs::write(&path, html) {
        Ok(()) => tracing::info!("Saved diagnostic HTML: {}", path.display()),
        Err(e) => tracing::warn!("Failed to save diagnostic HTML {}: {}", path.display(), e),
    }
}
