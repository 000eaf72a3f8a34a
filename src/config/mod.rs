//! Configuration module for the terminal procedures client
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file section falls back to the defaults
//! that point at the public FAA d-TPP search.
//!
//! # Example
//!
//! ```no_run
//! use terminal_procedures::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tpp.toml")).unwrap();
//! println!("Searching {}", config.source.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, QueryConfig, SourceConfig, UserAgentConfig, DEFAULT_BASE_URL,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
