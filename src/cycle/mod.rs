//! Publication cycle handling
//!
//! The d-TPP is republished every 28 days. This module provides:
//! - `Cycle` and `CycleKind`, the cycle selected on the search landing page
//! - Extraction of a cycle from the landing page's cycle selector
//! - Parsing of the textual effective date range (`JAN 18 - FEB 14, 2018 [1801]`)

mod dates;
mod resolver;

pub use dates::{locate_date_range, normalize_label, parse_effective_dates, EffectiveDateRange};
pub use resolver::extract_cycle;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A publication cycle as listed on the search landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Display text of the selector option, whitespace-normalized
    pub label: String,

    /// Opaque cycle identifier sent as the `cycle` query parameter
    pub code: String,
}

/// Which of the published cycles to look up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CycleKind {
    #[default]
    Current,
    Next,
}

impl CycleKind {
    /// Text that marks the matching selector option
    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Next => "Next",
        }
    }
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CycleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "next" => Ok(Self::Next),
            other => Err(format!("unknown cycle '{}', expected current or next", other)),
        }
    }
}
