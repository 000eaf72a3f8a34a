//! Batch listing over several airports
//!
//! Each airport runs its own crawl, including its own cycle lookup, and the
//! crawls proceed concurrently. Results come back in input order; the first
//! failure fails the whole batch.

use crate::crawler::ProceduresClient;
use crate::procedure::{ListOptions, ProcedureRecord};
use crate::TppError;
use futures::future::try_join_all;
use serde::Serialize;

/// One airport code or several
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icaos {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Icaos {
    fn from(icao: &str) -> Self {
        Self::One(icao.to_string())
    }
}

impl From<String> for Icaos {
    fn from(icao: String) -> Self {
        Self::One(icao)
    }
}

impl From<Vec<String>> for Icaos {
    fn from(icaos: Vec<String>) -> Self {
        Self::Many(icaos)
    }
}

impl From<&[&str]> for Icaos {
    fn from(icaos: &[&str]) -> Self {
        Self::Many(icaos.iter().map(|icao| icao.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Icaos {
    fn from(icaos: [&str; N]) -> Self {
        Self::Many(icaos.iter().map(|icao| icao.to_string()).collect())
    }
}

/// Records for one airport, or one list per airport in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    One(Vec<ProcedureRecord>),
    Many(Vec<Vec<ProcedureRecord>>),
}

impl Listing {
    /// One list per airport, whichever shape was requested
    pub fn into_per_airport(self) -> Vec<Vec<ProcedureRecord>> {
        match self {
            Self::One(records) => vec![records],
            Self::Many(lists) => lists,
        }
    }
}

impl ProceduresClient {
    /// Lists procedures for one or several airports
    ///
    /// # Example
    ///
    /// ```no_run
    /// use terminal_procedures::{Config, ListOptions, Listing, ProceduresClient};
    ///
    /// # async fn example() -> Result<(), terminal_procedures::TppError> {
    /// let client = ProceduresClient::new(&Config::default())?;
    /// let listing = client.list(["PANC", "PAFA"], &ListOptions::from_flags(["A"])).await?;
    /// if let Listing::Many(per_airport) = listing {
    ///     println!("{} airports", per_airport.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(
        &self,
        icaos: impl Into<Icaos>,
        options: &ListOptions,
    ) -> Result<Listing, TppError> {
        match icaos.into() {
            Icaos::One(icao) => Ok(Listing::One(self.list_one(&icao, options).await?)),
            Icaos::Many(icaos) => {
                tracing::debug!("Listing {} airports concurrently", icaos.len());
                let crawls = icaos.iter().map(|icao| self.list_one(icao, options));
                Ok(Listing::Many(try_join_all(crawls).await?))
            }
        }
    }
}
