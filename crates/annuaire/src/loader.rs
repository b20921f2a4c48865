use log::{error, info};

use crate::domain::{Dataset, RemoteRecord};
use crate::error::LoadError;
use crate::fetch::Fetch;
use crate::search::fold_key;

/// Location of the dataset document, relative to the page.
pub const DATASET_PATH: &str = "structures.json";

/// Fetches `source` and decodes it verbatim as a [`Dataset`].
pub async fn load_dataset<F: Fetch>(fetcher: &F, source: &str) -> Result<Dataset, LoadError> {
    let body = fetcher.get_text(source).await?;
    let dataset = Dataset::from_json(&body).map_err(|error| LoadError::Parse {
        url: source.to_string(),
        source: error,
    })?;

    info!(
        "Loaded {source}: {} regions, {} structures",
        dataset.regions.len(),
        dataset.structure_count()
    );
    Ok(dataset)
}

/// The spreadsheet-backed record list. Independent of the dataset store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDirectory {
    endpoint: String,
}

impl RemoteDirectory {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_records<F: Fetch>(&self, fetcher: &F) -> Result<Vec<RemoteRecord>, LoadError> {
        let body = fetcher.get_text(&self.endpoint).await?;
        serde_json::from_str(&body).map_err(|error| LoadError::Parse {
            url: self.endpoint.clone(),
            source: error,
        })
    }

    /// Records whose region matches `region_name`, or nothing if the
    /// request fails. Failures are logged, never returned.
    pub async fn records_for_region<F: Fetch>(
        &self,
        fetcher: &F,
        region_name: &str,
    ) -> Vec<RemoteRecord> {
        match self.fetch_records(fetcher).await {
            Ok(records) => filter_by_region(records, region_name),
            Err(e) => {
                error!("Failed to load remote records: {e}");
                Vec::new()
            }
        }
    }
}

/// Keeps records whose `Région` contains `region_name`, ignoring case and
/// accents. Input order is preserved.
pub fn filter_by_region(records: Vec<RemoteRecord>, region_name: &str) -> Vec<RemoteRecord> {
    let needle = fold_key(region_name);
    records
        .into_iter()
        .filter(|record| fold_key(&record.region).contains(&needle))
        .collect()
}
