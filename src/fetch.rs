use std::time::Duration;

use thiserror::Error;
use tracing::debug;

const TIMEOUT_SECS: u64 = 20;
const USER_AGENT: &str = concat!("pantry/", env!("CARGO_PKG_VERSION"));

/// Page retrieval failure. Callers treat every variant the same way:
/// ingestion is unavailable for this URL and the user may retry it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not retrieve page: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
}

/// Fetch raw page text with a single blocking request. No retries:
/// this runs on a user-initiated action, so retry policy stays with
/// the caller.
pub fn fetch_page(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()?;

    let response = client.get(url).send()?;
    let status = response.status();
    debug!("GET {} -> {}", url, status);

    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    Ok(response.text()?)
}
