//! Procedure records and query options
//!
//! # Components
//!
//! - `ProcedureRecord`: One terminal procedure row from a results page
//! - `FlagMeaning`: The fixed change-flag table (`A`, `C`, `D`, blank)
//! - `QueryFilter` / `ListOptions`: Which change-flag sub-crawls to run

mod filter;
mod record;

// Re-export main types
pub use filter::{ListOptions, QueryFilter};
pub use record::{FlagMeaning, Link, ProcedureRecord};
