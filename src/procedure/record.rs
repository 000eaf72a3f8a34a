use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Meaning of a row's change flag relative to the previous cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlagMeaning {
    Unchanged,
    Added,
    Changed,
    Deleted,
    Unknown,
}

impl FlagMeaning {
    /// Maps the flag column text to its meaning
    ///
    /// | Flag | Meaning |
    /// |------|---------|
    /// | (blank) | Unchanged |
    /// | `A` | Added |
    /// | `C` | Changed |
    /// | `D` | Deleted |
    /// | anything else | Unknown |
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "" => Self::Unchanged,
            "A" => Self::Added,
            "C" => Self::Changed,
            "D" => Self::Deleted,
            _ => Self::Unknown,
        }
    }

    /// Human-readable description
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "Unchanged",
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Deleted => "Deleted",
            Self::Unknown => "Unknown edit state",
        }
    }
}

impl fmt::Display for FlagMeaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell text plus the target of the anchor inside it, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    pub url: Option<String>,
}

/// One terminal procedure listed for an airport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureRecord {
    pub state: String,
    pub city: String,
    pub airport: String,
    pub ident: String,
    pub volume: String,

    /// Raw flag column text (`""`, `A`, `C`, `D`, ...)
    pub flag: String,
    pub flag_meaning: FlagMeaning,

    /// Chart type, e.g. `IAP` or `APD`; never empty
    #[serde(rename = "type")]
    pub procedure_type: String,

    /// Chart name and PDF link
    pub procedure: Link,

    /// Change comparison document, when the cycle has one
    pub compare: Link,

    /// Start of the page's effective date range, if the page printed one
    pub effective_start_date: Option<DateTime<Utc>>,
    pub effective_end_date: Option<DateTime<Utc>>,
}
