use std::time::Duration;

use log::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::render::render_search_results;
use crate::store::DatasetStore;

pub const DEFAULT_MIN_CHARS: usize = 2;

/// Lower-cases `text` and strips diacritics, so `"Île"` folds to `"ile"`.
pub fn fold_key(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// When a search box input is worth querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Inputs shorter than this (after trimming, in characters) clear the
    /// results instead of searching.
    pub min_chars: usize,
    /// Quiet period before a keystroke is acted upon. `None` searches on
    /// every qualifying keystroke.
    pub debounce: Option<Duration>,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            debounce: None,
        }
    }
}

impl SearchPolicy {
    pub fn gate(&self, raw: &str) -> SearchAction {
        let term = raw.trim();
        if term.chars().count() < self.min_chars {
            debug!("Search input {term:?} below {} characters", self.min_chars);
            SearchAction::Clear
        } else {
            SearchAction::Query(term.to_string())
        }
    }

    /// How long to wait before applying `action`. Clearing is never delayed.
    pub fn delay_for(&self, action: &SearchAction) -> Option<Duration> {
        match action {
            SearchAction::Clear => None,
            SearchAction::Query(_) => self.debounce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Clear,
    Query(String),
}

/// Identifies one search request. Later requests carry larger values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: u64,
}

impl GenerationCounter {
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// Only the most recently issued generation may be applied.
    pub const fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Clear,
    Results {
        term: String,
        count: usize,
        html: String,
    },
}

impl SearchOutcome {
    /// Markup for the results container; empty when cleared.
    pub fn html(&self) -> &str {
        match self {
            Self::Clear => "",
            Self::Results { html, .. } => html,
        }
    }
}

/// Turns the stream of search box inputs into render outcomes.
#[derive(Debug, Default)]
pub struct SearchSession {
    policy: SearchPolicy,
    generations: GenerationCounter,
}

impl SearchSession {
    pub const fn new(policy: SearchPolicy) -> Self {
        Self {
            policy,
            generations: GenerationCounter::new(),
        }
    }

    pub const fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Registers a new input. Every input supersedes the previous ones,
    /// including inputs that only clear the results.
    pub fn begin(&mut self, input: &str) -> (Generation, SearchAction) {
        (self.generations.issue(), self.policy.gate(input))
    }

    /// Runs a registered request, unless a newer one was issued meanwhile.
    pub fn complete(
        &self,
        generation: Generation,
        store: &DatasetStore,
        action: &SearchAction,
    ) -> Option<SearchOutcome> {
        if !self.generations.is_current(generation) {
            debug!("Dropping stale search #{}", generation.value());
            return None;
        }
        Some(run(store, action))
    }

    pub fn handle(&mut self, store: &DatasetStore, input: &str) -> SearchOutcome {
        let (_, action) = self.begin(input);
        run(store, &action)
    }

    /// Lazily maps each input to its outcome. Calling again with a fresh
    /// iterator restarts the stream.
    pub fn outcomes<'a, I>(
        &'a mut self,
        store: &'a DatasetStore,
        inputs: I,
    ) -> impl Iterator<Item = SearchOutcome> + 'a
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: 'a,
    {
        inputs
            .into_iter()
            .map(move |input| self.handle(store, input.as_ref()))
    }
}

fn run(store: &DatasetStore, action: &SearchAction) -> SearchOutcome {
    match action {
        SearchAction::Clear => SearchOutcome::Clear,
        SearchAction::Query(term) => {
            let results = store.search_structure(term);
            SearchOutcome::Results {
                term: term.clone(),
                count: results.len(),
                html: render_search_results(&results),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, Region, Structure};

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
    fn test_fold_key() {
        assert_eq!(fold_key("Île-de-France"), "ile-de-france");
        assert_eq!(fold_key("MÉDECINS"), "medecins");
        assert_eq!(fold_key(""), "");
    }

    #[test]
    fn test_gate_counts_characters_after_trim() {
        let policy = SearchPolicy::default();

        assert_eq!(policy.gate(""), SearchAction::Clear);
        assert_eq!(policy.gate("  a  "), SearchAction::Clear);
        assert_eq!(policy.gate("é"), SearchAction::Clear);
        assert_eq!(policy.gate(" éa "), SearchAction::Query("éa".to_string()));
    }

    #[test]
    fn test_gate_zero_minimum_passes_empty_input() {
        let policy = SearchPolicy {
            min_chars: 0,
            debounce: None,
        };

        assert_eq!(policy.gate("   "), SearchAction::Query(String::new()));
    }

    #[test]
    fn test_only_queries_are_debounced() {
        let policy = SearchPolicy {
            min_chars: 2,
            debounce: Some(Duration::from_millis(250)),
        };

        assert_eq!(
            policy.delay_for(&policy.gate("aide")),
            Some(Duration::from_millis(250))
        );
        assert_eq!(policy.delay_for(&policy.gate("a")), None);
        assert_eq!(SearchPolicy::default().delay_for(&SearchAction::Query("aide".to_string())), None);
    }

    #[test]
    fn test_debounced_query_superseded_by_clear_is_dropped() {
        let store = store();
        let mut session = SearchSession::new(SearchPolicy {
            min_chars: 2,
            debounce: Some(Duration::from_millis(250)),
        });

        let (pending, query) = session.begin("aide");
        assert!(session.policy().delay_for(&query).is_some());
        let (latest, clear) = session.begin("a");
        assert_eq!(session.policy().delay_for(&clear), None);

        assert_eq!(session.complete(latest, &store, &clear), Some(SearchOutcome::Clear));
        assert_eq!(session.complete(pending, &store, &query), None);
    }

    #[test]
    fn test_only_latest_generation_is_current() {
        let mut counter = GenerationCounter::new();
        let first = counter.issue();
        let second = counter.issue();

        assert!(first < second);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn test_stale_request_is_dropped() {
        let store = store();
        let mut session = SearchSession::default();

        let (old, old_action) = session.begin("aide");
        let (new, new_action) = session.begin("zz");

        assert_eq!(session.complete(old, &store, &old_action), None);
        let outcome = session.complete(new, &store, &new_action);
        assert!(matches!(outcome, Some(SearchOutcome::Results { count: 0, .. })));
    }

    #[test]
    fn test_outcomes_follow_input_stream() {
        let store = store();
        let mut session = SearchSession::default();

        let outcomes: Vec<SearchOutcome> =
            session.outcomes(&store, ["a", "ai", "aide", ""]).collect();

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0], SearchOutcome::Clear);
        assert!(matches!(&outcomes[1], SearchOutcome::Results { count: 1, .. }));
        assert!(outcomes[2].html().contains("Aide Paris"));
        assert_eq!(outcomes[3].html(), "");
    }
}
