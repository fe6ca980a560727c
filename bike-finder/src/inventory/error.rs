//! Inventory feed error types.

/// Errors that can occur while fetching the station inventory.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned an error status
    #[error("feed error {status} from {url}")]
    Api { status: u16, url: String },

    /// Failed to parse a feed document
    #[error("JSON parse error in {url}: {message}")]
    Json { url: String, message: String },

    /// The discovery document has no feeds for the configured language
    #[error("discovery document has no feeds for language {0:?}")]
    MissingLanguage(String),

    /// The discovery document does not list a required feed
    #[error("discovery document does not list the {0} feed")]
    MissingFeed(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = InventoryError::MissingFeed("station_status");
        assert_eq!(
            err.to_string(),
            "discovery document does not list the station_status feed"
        );

        let err = InventoryError::Api {
            status: 503,
            url: "http://gbfs/gbfs.json".into(),
        };
        assert_eq!(err.to_string(), "feed error 503 from http://gbfs/gbfs.json");
    }
}
