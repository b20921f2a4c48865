//! Regional structure directory: dataset store, search and HTML rendering.
//!
//! The crate does no I/O of its own. Hosts supply a [`Fetch`] transport and
//! inject the rendered markup wherever they need it.

pub mod domain;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod render;
pub mod search;
pub mod store;

pub use domain::{Dataset, Region, RemoteRecord, SearchResult, Statistics, Structure};
pub use error::{LoadError, StoreError};
pub use fetch::{Fetch, MemoryFetcher};
pub use loader::{filter_by_region, load_dataset, RemoteDirectory, DATASET_PATH};
pub use search::{SearchAction, SearchOutcome, SearchPolicy, SearchSession};
pub use store::{DatasetStore, LoadState};
