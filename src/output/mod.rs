//! Output handling: the JSON results file and diagnostic HTML snapshots

pub mod json;
pub mod snapshot;

pub use json::{results_path, sanitize_keyword, save_companies};
pub use snapshot::{save_debug_page, save_page_snapshot};
