use thiserror::Error;

/// Failure while fetching or decoding a remote document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("unsupported scheme for {url}")]
    UnsupportedScheme { url: String },

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of a query against the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("dataset not loaded")]
    NotLoaded,
}
