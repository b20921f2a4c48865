use std::env;
use std::path::PathBuf;
use std::time::Duration;

use annuaire::{SearchPolicy, DATASET_PATH};
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dataset: String,
    pub base_dir: PathBuf,
    pub remote_endpoint: Option<String>,
    pub policy: SearchPolicy,
    pub debug: bool,
}

/// Loads `.env`, then reads settings from the environment.
pub fn init_app_config() -> Result<Settings> {
    dotenv().ok();

    let current_dir = env::current_dir()?;
    Settings::from_lookup(current_dir, |key| env::var(key).ok())
}

impl Settings {
    /// Builds settings from any key lookup; `current_dir` is the fallback
    /// base directory for relative dataset paths.
    pub fn from_lookup<F>(current_dir: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dataset = lookup("ANNUAIRE_DATASET").unwrap_or_else(|| DATASET_PATH.to_string());
        let base_dir = lookup("ANNUAIRE_BASE_DIR").map_or(current_dir, PathBuf::from);
        let remote_endpoint = lookup("ANNUAIRE_REMOTE_URL").filter(|url| !url.trim().is_empty());

        let mut policy = SearchPolicy::default();
        if let Some(value) = lookup("ANNUAIRE_MIN_SEARCH") {
            policy.min_chars = value
                .trim()
                .parse()
                .map_err(|_| eyre!("ANNUAIRE_MIN_SEARCH must be a number, got {value:?}"))?;
        }
        if let Some(value) = lookup("ANNUAIRE_DEBOUNCE_MS") {
            let millis: u64 = value
                .trim()
                .parse()
                .map_err(|_| eyre!("ANNUAIRE_DEBOUNCE_MS must be a number, got {value:?}"))?;
            policy.debounce = (millis > 0).then(|| Duration::from_millis(millis));
        }

        let debug = lookup("DEBUG").is_some_and(|value| !matches!(value.as_str(), "" | "0"));

        Ok(Self {
            dataset,
            base_dir,
            remote_endpoint,
            policy,
            debug,
        })
    }

    pub fn remote_endpoint(&self) -> Result<&str> {
        self.remote_endpoint.as_deref().ok_or_else(|| {
            eyre!("No remote endpoint configured; set ANNUAIRE_REMOTE_URL or pass --endpoint")
        })
    }
}
