//! # Episode Title Lookup
//!
//! Names that carry no episode title can be completed from an external
//! metadata service. The service itself sits behind [`MetadataLookup`]; the
//! `nafuda-lookup` crate provides an HTTP implementation.
//!
//! [`EpisodeLookup`] decides which series a name refers to. A single search
//! hit is taken as is; several hits go to a [`SeriesChooser`] once per series
//! name and the answer is remembered in a [`SelectionCache`].

pub mod selection;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use selection::SelectionCache;

use crate::config::RenameConfig;

/// Failures reported by a metadata adapter. They are logged and never
/// propagated out of [`EpisodeLookup`].
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// A series returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCandidate {
    /// External id, never `0`.
    pub id: u64,
    /// Human-readable name shown to a chooser.
    pub display_name: String,
}

/// Metadata for one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    pub title: String,
}

/// An external metadata service.
pub trait MetadataLookup: Send + Sync {
    /// Series matching `series`, best match first.
    fn search(&self, series: &str) -> Result<Vec<SeriesCandidate>, LookupError>;

    /// The episode `season`x`episode` of series `id`, `None` if unknown.
    fn lookup_episode(
        &self,
        id: u64,
        season: u32,
        episode: u32,
    ) -> Result<Option<EpisodeInfo>, LookupError>;
}

/// Picks a series among several candidates; `0` means none of them.
pub trait SeriesChooser: Send + Sync {
    fn choose_series(&self, series: &str, candidates: &[SeriesCandidate]) -> u64;
}

impl<F> SeriesChooser for F
where
    F: Fn(&str, &[SeriesCandidate]) -> u64 + Send + Sync,
{
    fn choose_series(&self, series: &str, candidates: &[SeriesCandidate]) -> u64 {
        self(series, candidates)
    }
}

/// Non-interactive chooser: trusts the adapter's ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl SeriesChooser for FirstCandidate {
    fn choose_series(&self, _series: &str, candidates: &[SeriesCandidate]) -> u64 {
        candidates.first().map_or(0, |c| c.id)
    }
}

/// Resolves missing episode titles through a [`MetadataLookup`].
pub struct EpisodeLookup {
    adapter: Box<dyn MetadataLookup>,
    chooser: Box<dyn SeriesChooser>,
    selections: SelectionCache,
    enabled: bool,
    always_confirm: bool,
}

impl EpisodeLookup {
    /// Enabled lookup over `adapter` that takes the first candidate when a
    /// search is ambiguous.
    pub fn new(adapter: impl MetadataLookup + 'static) -> Self {
        Self {
            adapter: Box::new(adapter),
            chooser: Box::new(FirstCandidate),
            selections: SelectionCache::new(),
            enabled: true,
            always_confirm: false,
        }
    }

    /// Lookup with the switches taken from `config`.
    pub fn from_config(adapter: impl MetadataLookup + 'static, config: &RenameConfig) -> Self {
        Self::new(adapter)
            .with_enabled(config.lookup_enabled)
            .with_always_confirm(config.always_confirm)
    }

    pub fn with_chooser(mut self, chooser: impl SeriesChooser + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Ask the chooser even when a search returns a single candidate.
    pub fn with_always_confirm(mut self, always_confirm: bool) -> Self {
        self.always_confirm = always_confirm;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Selections made so far.
    pub fn selections(&self) -> &SelectionCache {
        &self.selections
    }

    /// Title of `episodes` in `season` of `series`, joined with `" & "`.
    ///
    /// Returns `None` when disabled, when no series was selected, when no
    /// episode is known to the service, or when the adapter failed.
    pub fn resolve_title(&self, series: &str, season: u32, episodes: &[u32]) -> Option<String> {
        if !self.enabled || episodes.is_empty() {
            return None;
        }
        let id = self.select_series(series)?;

        let mut titles = Vec::with_capacity(episodes.len());
        for &episode in episodes {
            match self.adapter.lookup_episode(id, season, episode) {
                Ok(Some(info)) if !info.title.trim().is_empty() => titles.push(info.title),
                Ok(_) => debug!(series, season, episode, "episode not found"),
                Err(e) => {
                    warn!(series, season, episode, error = %e, "episode lookup failed");
                    return None;
                }
            }
        }

        if titles.is_empty() {
            None
        } else {
            Some(titles.join(" & "))
        }
    }

    fn select_series(&self, series: &str) -> Option<u64> {
        if let Some(id) = self.selections.get(series) {
            return (id != 0).then_some(id);
        }

        let candidates = match self.adapter.search(series) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(series, error = %e, "series search failed");
                return None;
            }
        };
        // search failures are not cached; an empty result is
        let chosen = match candidates.as_slice() {
            [] => {
                debug!(series, "no series candidates");
                0
            }
            [only] if !self.always_confirm => only.id,
            _ => self.chooser.choose_series(series, &candidates),
        };
        let id = self.selections.insert_if_absent(series, chosen);
        debug!(series, id, "series selected");
        (id != 0).then_some(id)
    }
}

impl std::fmt::Debug for EpisodeLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpisodeLookup")
            .field("selections", &self.selections)
            .field("enabled", &self.enabled)
            .field("always_confirm", &self.always_confirm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Adapter with two series named "Show" and a failing "Broken" series.
    #[derive(Default)]
    struct FakeAdapter {
        searches: Arc<AtomicUsize>,
    }

    impl MetadataLookup for FakeAdapter {
        fn search(&self, series: &str) -> Result<Vec<SeriesCandidate>, LookupError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            match series.to_lowercase().as_str() {
                "show" => Ok(vec![
                    SeriesCandidate {
                        id: 1,
                        display_name: "Show (2001)".into(),
                    },
                    SeriesCandidate {
                        id: 2,
                        display_name: "Show (2015)".into(),
                    },
                ]),
                "solo" => Ok(vec![SeriesCandidate {
                    id: 3,
                    display_name: "Solo".into(),
                }]),
                "broken" => Err(LookupError::Transport("connection refused".into())),
                _ => Ok(Vec::new()),
            }
        }

        fn lookup_episode(
            &self,
            id: u64,
            season: u32,
            episode: u32,
        ) -> Result<Option<EpisodeInfo>, LookupError> {
            if id == 2 && season == 1 && episode == 500 {
                return Err(LookupError::Status(500));
            }
            Ok((episode < 10).then(|| EpisodeInfo {
                title: format!("Title {id}-{season}-{episode}"),
            }))
        }
    }

    fn counting_chooser(pick: u64) -> (Arc<AtomicUsize>, impl SeriesChooser) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let chooser = move |_: &str, _: &[SeriesCandidate]| {
            counter.fetch_add(1, Ordering::SeqCst);
            pick
        };
        (calls, chooser)
    }

    #[test]
    fn chooser_fires_once_per_normalized_name() {
        let (calls, chooser) = counting_chooser(2);
        let lookup = EpisodeLookup::new(FakeAdapter::default()).with_chooser(chooser);

        assert_eq!(lookup.resolve_title("Show", 1, &[1]).as_deref(), Some("Title 2-1-1"));
        assert_eq!(lookup.resolve_title("show ", 1, &[2]).as_deref(), Some("Title 2-1-2"));
        assert_eq!(lookup.resolve_title("SHOW", 1, &[3]).as_deref(), Some("Title 2-1-3"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cached_selection_skips_search() {
        let adapter = FakeAdapter::default();
        let searches = Arc::clone(&adapter.searches);
        let lookup = EpisodeLookup::new(adapter);

        lookup.resolve_title("Show", 1, &[1]);
        lookup.resolve_title("Show", 1, &[2]);
        assert_eq!(searches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn declined_selection_yields_no_title_and_is_remembered() {
        let (calls, chooser) = counting_chooser(0);
        let lookup = EpisodeLookup::new(FakeAdapter::default()).with_chooser(chooser);

        assert_eq!(lookup.resolve_title("Show", 1, &[1]), None);
        assert_eq!(lookup.resolve_title("Show", 1, &[2]), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(lookup.selections().get("show"), Some(0));
    }

    #[test]
    fn single_candidate_is_used_directly() {
        let (calls, chooser) = counting_chooser(99);
        let lookup = EpisodeLookup::new(FakeAdapter::default()).with_chooser(chooser);

        assert_eq!(lookup.resolve_title("Solo", 2, &[4]).as_deref(), Some("Title 3-2-4"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn single_and_empty_searches_are_remembered() {
        let adapter = FakeAdapter::default();
        let searches = Arc::clone(&adapter.searches);
        let lookup = EpisodeLookup::new(adapter);

        lookup.resolve_title("Solo", 2, &[4]);
        assert_eq!(lookup.resolve_title("solo", 2, &[5]).as_deref(), Some("Title 3-2-5"));
        assert_eq!(lookup.selections().get("solo"), Some(3));

        assert_eq!(lookup.resolve_title("Nothing", 1, &[1]), None);
        assert_eq!(lookup.resolve_title("Nothing", 1, &[2]), None);
        assert_eq!(lookup.selections().get("nothing"), Some(0));
        assert_eq!(searches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_search_is_retried() {
        let adapter = FakeAdapter::default();
        let searches = Arc::clone(&adapter.searches);
        let lookup = EpisodeLookup::new(adapter);

        lookup.resolve_title("Broken", 1, &[1]);
        lookup.resolve_title("Broken", 1, &[2]);
        assert_eq!(lookup.selections().get("broken"), None);
        assert_eq!(searches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn always_confirm_asks_even_for_one_candidate() {
        let (calls, chooser) = counting_chooser(3);
        let lookup = EpisodeLookup::new(FakeAdapter::default())
            .with_chooser(chooser)
            .with_always_confirm(true);

        assert_eq!(lookup.resolve_title("Solo", 2, &[4]).as_deref(), Some("Title 3-2-4"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multi_episode_titles_are_joined() {
        let lookup = EpisodeLookup::new(FakeAdapter::default());
        assert_eq!(
            lookup.resolve_title("Solo", 1, &[1, 2]).as_deref(),
            Some("Title 3-1-1 & Title 3-1-2")
        );
    }

    #[test]
    fn adapter_errors_yield_no_title() {
        let lookup = EpisodeLookup::new(FakeAdapter::default());
        assert_eq!(lookup.resolve_title("Broken", 1, &[1]), None);

        let lookup = EpisodeLookup::new(FakeAdapter::default()).with_chooser(
            |_: &str, _: &[SeriesCandidate]| 2,
        );
        assert_eq!(lookup.resolve_title("Show", 1, &[500]), None);
    }

    #[test]
    fn unknown_episode_yields_no_title() {
        let lookup = EpisodeLookup::new(FakeAdapter::default());
        assert_eq!(lookup.resolve_title("Solo", 1, &[42]), None);
        assert_eq!(lookup.resolve_title("Nothing", 1, &[1]), None);
    }

    #[test]
    fn disabled_lookup_does_nothing() {
        let adapter = FakeAdapter::default();
        let searches = Arc::clone(&adapter.searches);
        let lookup = EpisodeLookup::new(adapter).with_enabled(false);

        assert_eq!(lookup.resolve_title("Solo", 1, &[1]), None);
        assert_eq!(searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn config_switches_are_applied() {
        let config = RenameConfig::default().with_lookup_enabled(true).with_always_confirm(true);
        let lookup = EpisodeLookup::from_config(FakeAdapter::default(), &config);
        assert!(lookup.is_enabled());
        assert!(lookup.always_confirm);
    }
}
