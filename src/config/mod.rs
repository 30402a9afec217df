//! Configuration loading and validation
//!
//! The scraper runs with built-in production defaults; a TOML file can
//! override any of them (mock servers in tests swap the base URL this way).

pub mod parser;
pub mod types;
pub mod validation;

pub use parser::load_config;
pub use types::{Config, FilterEntry, HttpConfig, OutputConfig, SearchConfig};
pub use validation::validate;
