use serde::Serialize;

/// Change-flag filter for one sub-crawl of the results pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryFilter {
    Added,
    Changed,
    Deleted,
    All,
}

impl QueryFilter {
    /// Maps a flag letter to its filter; unrecognized letters mean `All`
    pub fn from_flag(flag: char) -> Self {
        match flag {
            'A' => Self::Added,
            'C' => Self::Changed,
            'D' => Self::Deleted,
            _ => Self::All,
        }
    }

    /// Query parameter selecting this filter, `None` for `All`
    pub fn query_param(&self) -> Option<&'static str> {
        match self {
            Self::Added => Some("filterAdded"),
            Self::Changed => Some("filterChanged"),
            Self::Deleted => Some("filterDeleted"),
            Self::All => None,
        }
    }
}

/// Per-call listing options
///
/// Filters keep their first-seen order and are never repeated. An empty set
/// runs a single unfiltered pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    flags: Vec<QueryFilter>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from filters, dropping repeats
    pub fn with_filters<I>(filters: I) -> Self
    where
        I: IntoIterator<Item = QueryFilter>,
    {
        let mut flags = Vec::new();
        for filter in filters {
            if !flags.contains(&filter) {
                flags.push(filter);
            }
        }
        Self { flags }
    }

    /// Builds options from flag letters such as `["A", "C"]`
    ///
    /// Only the first character of each entry is considered; empty entries are skipped.
    pub fn from_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_filters(
            flags
                .into_iter()
                .filter_map(|flag| flag.as_ref().trim().chars().next())
                .map(QueryFilter::from_flag),
        )
    }

    /// Filters requested by the caller, possibly empty
    pub fn flags(&self) -> &[QueryFilter] {
        &self.flags
    }

    /// Sub-crawls to run: the requested filters, or one `All` pass when none
    pub fn passes(&self) -> Vec<QueryFilter> {
        if self.flags.is_empty() {
            vec![QueryFilter::All]
        } else {
            self.flags.clone()
        }
    }
}
