use std::path::PathBuf;

use annuaire::{DatasetStore, Fetch, LoadError};
use annuaire_cli::fetcher::NativeFetcher;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[tokio::test]
async fn test_load_fixture_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = NativeFetcher::new(fixture_dir())?;
    let mut store = DatasetStore::new();

    store.try_load(&fetcher, "structures.json").await?;
    assert_eq!(store.dataset()?.regions.len(), 2);

    let ids: Vec<&str> = store.get_regions().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["idf", "bre"]);

    let results = store.search_structure("MED");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].nom, "Médecins Sans Frontières");
    assert_eq!(results[0].region, "Île-de-France");

    let total = store.get_stats().and_then(|stats| stats.get("total_structures"));
    assert_eq!(total, Some(&serde_json::Value::from(3)));

    Ok(())
}

#[tokio::test]
async fn test_file_scheme_resolves_against_base_dir() -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = NativeFetcher::new(fixture_dir())?;

    let text = fetcher.get_text("file://structures.json").await?;
    assert!(text.contains("\"regions\""));

    Ok(())
}

#[tokio::test]
async fn test_malformed_dataset_leaves_store_unloaded() -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = NativeFetcher::new(fixture_dir())?;
    let mut store = DatasetStore::new();

    assert!(store.load(&fetcher, "malformed.json").await.is_none());
    assert!(!store.is_loaded());

    let result = store.try_load(&fetcher, "malformed.json").await;
    assert!(matches!(result, Err(LoadError::Parse { .. })));

    Ok(())
}
