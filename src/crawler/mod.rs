//! Crawler module for the d-TPP search pages
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching with an explicit HTML `Accept` header
//! - Results page parsing and row extraction
//! - The sequential per-airport crawl over filters and pages
//! - Concurrent batch listing over several airports

mod batch;
mod coordinator;
mod fetcher;
mod parser;

pub use batch::{Icaos, Listing};
pub use coordinator::ProceduresClient;
pub use fetcher::{build_http_client, fetch_html};
pub use parser::{column_link, column_text, extract_row, parse_results_page, PageOutcome, PageResult};
