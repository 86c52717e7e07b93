//! Transport boundary for prebuilt artifact retrieval.
//!
//! Provides a trait-based abstraction over the HTTP GET that fetches one
//! artifact as raw bytes, enabling dependency injection for testing. The
//! trait's error type is transport-agnostic: status-code inspection happens
//! here and nowhere else in the crate.

use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for prebuilt artifact fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors arising from fetching one prebuilt artifact.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The host has no artifact at this URL. Covers HTTP 404 and the 403
    /// that S3-style hosts answer for absent keys.
    #[error("no prebuilt artifact at {url}")]
    NotFound {
        /// The URL that was requested.
        url: String,
    },

    /// Any other transport failure: network error, unexpected status,
    /// truncated body.
    #[error("fetch failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// Trait for fetching one artifact URL as raw bytes.
///
/// The production implementation is [`HttpFetcher`]; tests inject mocks or
/// scripted stubs.
#[cfg_attr(test, mockall::automock)]
pub trait BinaryFetcher {
    /// Fetch the artifact at `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when the host reports the artifact
    /// absent, and [`FetchError::Http`] for every other failure.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP-based fetcher using `ureq`.
///
/// # Examples
///
/// ```
/// use packdock_prebuilt::fetch::HttpFetcher;
///
/// let fetcher = HttpFetcher;
/// // Use fetcher.fetch("https://cdn.example.com/sharp.tar.gz") in production
/// ```
pub struct HttpFetcher;

impl BinaryFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut data = Vec::new();
        response
            .into_body()
            .as_reader()
            .read_to_end(&mut data)
            .map_err(|e| FetchError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(data)
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(403 | 404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_found(404)]
    #[case::s3_forbidden(403)]
    fn map_ureq_error_treats_missing_artifact_statuses_as_not_found(#[case] status: u16) {
        let err = ureq::Error::StatusCode(status);
        let mapped = map_ureq_error("https://example.test/artifact.tar.gz", &err);
        assert!(matches!(mapped, FetchError::NotFound { .. }));
    }

    #[rstest]
    #[case::server_error(500)]
    #[case::rate_limited(429)]
    fn map_ureq_error_maps_other_statuses_to_http(#[case] status: u16) {
        let err = ureq::Error::StatusCode(status);
        let mapped = map_ureq_error("https://example.test/artifact.tar.gz", &err);
        assert!(matches!(mapped, FetchError::Http { .. }));
    }

    #[test]
    fn not_found_display_names_the_url() {
        let err = FetchError::NotFound {
            url: "https://example.test/missing.tar.gz".to_owned(),
        };
        assert!(err.to_string().contains("missing.tar.gz"));
    }
}
