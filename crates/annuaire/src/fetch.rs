use std::collections::HashMap;

use crate::error::LoadError;

/// Transport used by the loaders. Each host brings its own: `window.fetch`
/// in the browser, the filesystem or an HTTP(S) GET on the command line.
///
/// Futures are not required to be `Send`; everything runs on one thread.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn get_text(&self, url: &str) -> Result<String, LoadError>;
}

/// Serves documents from memory, keyed by the exact URL requested.
#[derive(Debug, Default, Clone)]
pub struct MemoryFetcher {
    documents: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.documents.insert(url.into(), body.into());
    }
}

impl Fetch for MemoryFetcher {
    async fn get_text(&self, url: &str) -> Result<String, LoadError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| LoadError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
