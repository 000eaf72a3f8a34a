//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for search pages with an explicit `Accept: text/html`
//! - Classifying transport failures and non-2xx statuses as errors

use crate::config::Config;
use crate::TppError;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// Neither a connect nor a whole-request timeout is set unless configured
/// through `http.connect-timeout-secs` / `http.timeout-secs`.
///
/// # Example
///
/// ```no_run
/// use terminal_procedures::config::Config;
/// use terminal_procedures::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.header_value())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.http.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.http.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a page body as HTML text
///
/// The upstream server answers slowly or inconsistently without an
/// `Accept: text/html` header, so every request carries one.
///
/// # Returns
///
/// * `Ok(String)` - Body of a 2xx response
/// * `Err(TppError::Http)` - Connection, TLS, timeout or body read failure
/// * `Err(TppError::Status)` - Non-2xx status
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, TppError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .header(ACCEPT, "text/html")
        .send()
        .await
        .map_err(|source| TppError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} answered {}", url, status);
        return Err(TppError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|source| TppError::Http {
        url: url.to_string(),
        source,
    })
}
