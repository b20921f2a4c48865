use std::io::{self, BufRead};

use annuaire::render::{
    render_nav, render_remote_rows, render_search_box, render_search_results,
    render_stats, render_structure_table,
};
use annuaire::{
    filter_by_region, DatasetStore, Fetch, RemoteDirectory, RemoteRecord, SearchAction,
    SearchOutcome, SearchPolicy, SearchSession, Structure,
};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use log::{debug, warn};

use crate::cli::{CliArgs, Command};
use crate::config::Settings;

/// Output flavour for every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

/// Run one command without a browser: load, query, print.
pub async fn run<F: Fetch>(args: &CliArgs, settings: &Settings, fetcher: &F) -> Result<()> {
    let format = if args.json { Format::Json } else { Format::Html };

    if let Command::Remote { region, .. } = &args.command {
        let output = render_remote(settings, fetcher, region, args.strict, format).await?;
        println!("{output}");
        return Ok(());
    }

    let mut store = DatasetStore::new();
    if args.strict {
        store.try_load(fetcher, &settings.dataset).await?;
    } else if store.load(fetcher, &settings.dataset).await.is_none() {
        warn!("Continuing without data from {}", settings.dataset);
    }

    if matches!(args.command, Command::Interactive) {
        let stdin = io::stdin();
        let lines = stdin.lock().lines().map_while(|line| line.ok());
        return run_interactive(&store, settings.policy, lines, format);
    }

    let output = render_command(&store, &args.command, settings.policy, format)?;
    println!("{output}");
    Ok(())
}

/// Renders the answer to a dataset command.
pub fn render_command(
    store: &DatasetStore,
    command: &Command,
    policy: SearchPolicy,
    format: Format,
) -> Result<String> {
    let output = match (command, format) {
        (Command::Regions, Format::Html) => render_nav(store.get_regions()),
        (Command::Regions, Format::Json) => {
            let regions: Vec<HeadlessRegion<'_>> = store
                .get_regions()
                .iter()
                .map(|region| HeadlessRegion {
                    id: &region.id,
                    nom: &region.nom,
                    page: &region.page,
                    structures: region.structures.len(),
                })
                .collect();
            serde_json::to_string_pretty(&regions)?
        }
        (Command::Region { id }, Format::Html) => {
            if store.is_loaded() && store.get_region(id).is_none() {
                debug!("Unknown region {id}");
            }
            render_structure_table(store.get_structures_by_region(id))
        }
        (Command::Region { id }, Format::Json) => {
            serde_json::to_string_pretty(&store.get_region(id))?
        }
        (Command::Search { term, all }, _) => {
            let term = if *all {
                term.trim().to_string()
            } else {
                match policy.gate(term) {
                    SearchAction::Query(term) => term,
                    SearchAction::Clear => {
                        return Err(eyre!(
                            "Search terms need at least {} characters (use --all to skip)",
                            policy.min_chars
                        ))
                    }
                }
            };
            let results = store.search_structure(&term);
            match format {
                Format::Html => render_search_results(&results),
                Format::Json => serde_json::to_string_pretty(&results)?,
            }
        }
        (Command::Stats, Format::Html) => store
            .get_stats()
            .map_or_else(|| render_stats(&Default::default()), render_stats),
        (Command::Stats, Format::Json) => serde_json::to_string_pretty(&store.get_stats())?,
        (Command::Structures, Format::Html) => {
            let structures: Vec<Structure> =
                store.all_structures().into_iter().cloned().collect();
            render_structure_table(&structures)
        }
        (Command::Structures, Format::Json) => {
            serde_json::to_string_pretty(&store.all_structures())?
        }
        (Command::Page { region }, format) => {
            let table = region
                .as_deref()
                .map(|id| render_structure_table(store.get_structures_by_region(id)));
            let search_box = render_search_box(&policy);
            match format {
                Format::Html => format!("{}{search_box}", table.unwrap_or_default()),
                Format::Json => serde_json::to_string_pretty(&HeadlessPage {
                    table,
                    search_box,
                })?,
            }
        }
        (Command::Interactive | Command::Remote { .. }, _) => {
            return Err(eyre!("{command:?} is not a dataset query"))
        }
    };

    Ok(output)
}

/// Feeds each input line to the search session and prints one render per line.
pub fn run_interactive<I>(
    store: &DatasetStore,
    policy: SearchPolicy,
    lines: I,
    format: Format,
) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    let mut session = SearchSession::new(policy);
    for outcome in session.outcomes(store, lines) {
        println!("{}", outcome_line(&outcome, format)?);
    }
    Ok(())
}

pub fn outcome_line(outcome: &SearchOutcome, format: Format) -> Result<String> {
    let line = match (outcome, format) {
        (SearchOutcome::Clear, Format::Html) => String::new(),
        (SearchOutcome::Results { html, .. }, Format::Html) => html.replace('\n', ""),
        (SearchOutcome::Clear, Format::Json) => serde_json::json!({ "cleared": true }).to_string(),
        (SearchOutcome::Results { term, count, .. }, Format::Json) => {
            serde_json::json!({ "term": term, "count": count }).to_string()
        }
    };
    Ok(line)
}

async fn render_remote<F: Fetch>(
    settings: &Settings,
    fetcher: &F,
    region: &str,
    strict: bool,
    format: Format,
) -> Result<String> {
    let remote = RemoteDirectory::new(settings.remote_endpoint()?);
    let records: Vec<RemoteRecord> = if strict {
        filter_by_region(remote.fetch_records(fetcher).await?, region)
    } else {
        remote.records_for_region(fetcher, region).await
    };

    let output = match format {
        Format::Html => format!(
            "<table>\n<tbody>\n{}</tbody>\n</table>",
            render_remote_rows(&records)
        ),
        Format::Json => serde_json::to_string_pretty(&records)?,
    };
    Ok(output)
}

#[derive(serde::Serialize)]
struct HeadlessRegion<'a> {
    id: &'a str,
    nom: &'a str,
    page: &'a str,
    structures: usize,
}

#[derive(serde::Serialize)]
struct HeadlessPage {
    table: Option<String>,
    search_box: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use annuaire::{Dataset, Region};

    fn store() -> DatasetStore {
        DatasetStore::with_dataset(Dataset {
            regions: vec![Region {
                id: "idf".to_string(),
                nom: "Île-de-France".to_string(),
                page: "idf.html".to_string(),
                structures: vec![Structure {
                    id: "1".to_string(),
                    nom: "Aide Paris".to_string(),
                    email: "a@x.org".to_string(),
                    contact: "01".to_string(),
                    ville: Some("Paris".to_string()),
                }],
            }],
            ..Dataset::default()
        })
    }

    #[test]
    fn test_search_respects_gate_unless_all() -> Result<()> {
        let store = store();
        let policy = SearchPolicy::default();
        let short = Command::Search {
            term: "a".to_string(),
            all: false,
        };
        let everything = Command::Search {
            term: String::new(),
            all: true,
        };

        assert!(render_command(&store, &short, policy, Format::Html).is_err());
        let html = render_command(&store, &everything, policy, Format::Html)?;
        assert!(html.contains("<strong>Aide Paris</strong> (Île-de-France)"));

        Ok(())
    }

    #[test]
    fn test_regions_json_summary() -> Result<()> {
        let json = render_command(&store(), &Command::Regions, SearchPolicy::default(), Format::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value[0]["id"], "idf");
        assert_eq!(value[0]["structures"], 1);

        Ok(())
    }

    #[test]
    fn test_page_fragment_contains_table_and_search_box() -> Result<()> {
        let command = Command::Page {
            region: Some("idf".to_string()),
        };

        let html = render_command(&store(), &command, SearchPolicy::default(), Format::Html)?;
        let table = html.find("<table").unwrap_or(usize::MAX);
        let search = html.find("searchInput").unwrap_or(usize::MAX);
        assert!(table < search && search < usize::MAX);

        Ok(())
    }

    #[test]
    fn test_unknown_region_renders_notice() -> Result<()> {
        let command = Command::Region {
            id: "nor".to_string(),
        };

        let html = render_command(&store(), &command, SearchPolicy::default(), Format::Html)?;
        assert!(html.starts_with("<p>Aucune structure"));

        let json = render_command(&store(), &command, SearchPolicy::default(), Format::Json)?;
        assert_eq!(json, "null");

        Ok(())
    }

    #[test]
    fn test_outcome_lines() -> Result<()> {
        let mut session = SearchSession::default();
        let store = store();
        let outcomes: Vec<SearchOutcome> = session.outcomes(&store, ["x", "aide"]).collect();

        assert_eq!(outcome_line(&outcomes[0], Format::Json)?, r#"{"cleared":true}"#);
        assert_eq!(
            outcome_line(&outcomes[1], Format::Json)?,
            r#"{"term":"aide","count":1}"#
        );
        assert!(!outcome_line(&outcomes[1], Format::Html)?.contains('\n'));

        Ok(())
    }
}
