use serde::Deserialize;

/// Search root of the FAA digital Terminal Procedures Publication
pub const DEFAULT_BASE_URL: &str =
    "https://www.faa.gov/air_traffic/flight_info/aeronav/digital_products/dtpp/search/";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub http: HttpConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub query: QueryConfig,
}

/// Where the search pages live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Search root; the landing page is the root itself and results are
    /// served from `results/` beneath it
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// HTTP client behavior
///
/// No timeouts are imposed by default; callers that need one configure it here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection establishment timeout in seconds; unset leaves it to the OS
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: Option<u64>,

    /// Whole-request timeout in seconds; unset means requests may wait indefinitely
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

/// User agent identification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,

    /// Optional URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "terminal-procedures".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.name, self.version, url),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Default query options applied when the caller gives none
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Change-flag filters as single letters (`A`, `C`, `D`); empty means all
    pub flags: Vec<String>,
}
