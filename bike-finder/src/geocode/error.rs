//! Geocoding error types.

/// Errors from a geocoding provider.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The provider did not answer in time
    #[error("geocoding request timed out")]
    Timeout,

    /// HTTP request failed for a reason other than a timeout
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Provider returned an error status
    #[error("geocoding API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl GeocodeError {
    /// Whether the request is worth retrying.
    ///
    /// Only timeouts are retried; every other failure aborts the lookup.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GeocodeError::Timeout)
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodeError::Timeout
        } else {
            GeocodeError::Http(err)
        }
    }
}
