use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "annuaire", version, about = "Regional structure directory")]
pub struct CliArgs {
    /// Dataset location: a path relative to the base directory, or an http(s):// URL
    #[arg(long, value_name = "PATH|URL", global = true)]
    pub dataset: Option<String>,

    /// Print JSON instead of HTML
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Exit with an error when the data cannot be loaded
    #[arg(long, global = true)]
    pub strict: bool,

    /// Minimum search length in characters
    #[arg(long = "min-chars", value_name = "N", global = true)]
    pub min_chars: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Navigation links for every region
    Regions,
    /// Structures table for one region
    Region {
        /// Region identifier, e.g. `idf`
        id: String,
    },
    /// Search structures by name
    Search {
        term: String,
        /// Skip the minimum length check
        #[arg(long)]
        all: bool,
    },
    /// Summary statistics shipped with the dataset
    Stats,
    /// Every structure, region by region
    Structures,
    /// Page fragment: region table followed by the search box
    Page {
        #[arg(long, value_name = "ID")]
        region: Option<String>,
    },
    /// Read search terms from stdin, one per line
    Interactive,
    /// Records of one region from the remote record API
    Remote {
        /// Region name, matched ignoring case and accents
        region: String,
        /// Override the remote endpoint
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(dataset) = &self.dataset {
            std::env::set_var("ANNUAIRE_DATASET", dataset);
        }
        if let Some(min_chars) = self.min_chars {
            std::env::set_var("ANNUAIRE_MIN_SEARCH", min_chars.to_string());
        }
        if let Command::Remote {
            endpoint: Some(endpoint),
            ..
        } = &self.command
        {
            std::env::set_var("ANNUAIRE_REMOTE_URL", endpoint);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
