use log::{debug, error};

use crate::domain::{Dataset, Region, SearchResult, Statistics, Structure};
use crate::error::{LoadError, StoreError};
use crate::fetch::Fetch;
use crate::loader::load_dataset;
use crate::search::fold_key;

#[derive(Debug, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded(Dataset),
}

/// Holds the loaded dataset and answers queries against it.
///
/// Queries made before a successful load degrade to empty results.
#[derive(Debug, Default)]
pub struct DatasetStore {
    state: LoadState,
}

impl DatasetStore {
    pub const fn new() -> Self {
        Self {
            state: LoadState::NotLoaded,
        }
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            state: LoadState::Loaded(dataset),
        }
    }

    /// Fetches and installs the dataset. On failure the store is left
    /// unloaded, the error is logged and `None` is returned.
    pub async fn load<F: Fetch>(&mut self, fetcher: &F, source: &str) -> Option<&Dataset> {
        let result = load_dataset(fetcher, source).await;
        self.publish(result)
    }

    /// Like [`Self::load`] but hands the error back to the caller. Read the
    /// installed dataset through [`Self::dataset`].
    pub async fn try_load<F: Fetch>(&mut self, fetcher: &F, source: &str) -> Result<(), LoadError> {
        match load_dataset(fetcher, source).await {
            Ok(dataset) => {
                self.replace(dataset);
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::NotLoaded;
                Err(e)
            }
        }
    }

    /// Installs the outcome of a load performed elsewhere.
    ///
    /// Lets callers await the fetch without holding a borrow on the store.
    pub fn publish(&mut self, result: Result<Dataset, LoadError>) -> Option<&Dataset> {
        match result {
            Ok(dataset) => self.replace(dataset),
            Err(e) => {
                error!("Failed to load dataset: {e}");
                self.state = LoadState::NotLoaded;
            }
        }
        self.dataset().ok()
    }

    pub fn replace(&mut self, dataset: Dataset) {
        self.state = LoadState::Loaded(dataset);
    }

    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    pub const fn dataset(&self) -> Result<&Dataset, StoreError> {
        match &self.state {
            LoadState::Loaded(dataset) => Ok(dataset),
            LoadState::NotLoaded => Err(StoreError::NotLoaded),
        }
    }

    fn loaded(&self, query: &str) -> Option<&Dataset> {
        match self.dataset() {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                debug!("{query}: {e}");
                None
            }
        }
    }

    pub fn get_regions(&self) -> &[Region] {
        self.loaded("get_regions")
            .map(|dataset| dataset.regions.as_slice())
            .unwrap_or_default()
    }

    /// First region whose id matches exactly.
    pub fn get_region(&self, id: &str) -> Option<&Region> {
        self.loaded("get_region")?
            .regions
            .iter()
            .find(|region| region.id == id)
    }

    pub fn get_structures_by_region(&self, id: &str) -> &[Structure] {
        self.get_region(id)
            .map(|region| region.structures.as_slice())
            .unwrap_or_default()
    }

    /// Every structure whose name contains `term`, ignoring case and accents.
    ///
    /// Results follow storage order: regions first, then structures within
    /// each region. An empty term matches everything.
    pub fn search_structure(&self, term: &str) -> Vec<SearchResult> {
        let Some(dataset) = self.loaded("search_structure") else {
            return Vec::new();
        };

        let needle = fold_key(term);
        dataset
            .regions
            .iter()
            .flat_map(|region| {
                region
                    .structures
                    .iter()
                    .map(move |structure| (region, structure))
            })
            .filter(|(_, structure)| fold_key(&structure.nom).contains(&needle))
            .map(|(region, structure)| SearchResult::project(structure, region))
            .collect()
    }

    pub fn get_stats(&self) -> Option<&Statistics> {
        self.loaded("get_stats").map(|dataset| &dataset.statistiques)
    }

    /// All structures, region by region.
    pub fn all_structures(&self) -> Vec<&Structure> {
        self.get_regions()
            .iter()
            .flat_map(|region| region.structures.iter())
            .collect()
    }
}
