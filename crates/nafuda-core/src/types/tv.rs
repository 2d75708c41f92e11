use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::media::MediaFile;
use crate::lookup::EpisodeLookup;
use crate::parser::{EpisodeParts, UNKNOWN_SERIES};
use crate::template::{FieldSource, ValidityCheck};

/// A TV episode: the shared media fields plus season and episode evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvFile {
    media: MediaFile,
    series_name: String,
    episode_title: String,
    season_in_name: Option<u32>,
    episodes: Vec<u32>,
    block: Option<(usize, usize)>,
    #[serde(skip)]
    folder_season: OnceCell<u32>,
    #[serde(skip)]
    resolved_title: OnceCell<String>,
}

impl TvFile {
    pub(crate) fn new(media: MediaFile, parts: EpisodeParts) -> Self {
        Self {
            media,
            series_name: parts.series_name,
            episode_title: parts.episode_title,
            season_in_name: parts.season,
            episodes: parts.episodes,
            block: parts.block,
            folder_season: OnceCell::new(),
            resolved_title: OnceCell::new(),
        }
    }

    /// The shared media fields.
    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    pub fn series_name(&self) -> &str {
        &self.series_name
    }

    /// The title as written in the name, possibly empty.
    pub fn episode_title(&self) -> &str {
        &self.episode_title
    }

    pub fn episodes(&self) -> &[u32] {
        &self.episodes
    }

    /// Inclusive sector span that held the season/episode evidence.
    pub fn block(&self) -> Option<(usize, usize)> {
        self.block
    }

    /// Season from the name, else from the enclosing folder; `0` if unknown.
    pub fn season(&self) -> u32 {
        if let Some(season) = self.season_in_name {
            return season;
        }
        *self
            .folder_season
            .get_or_init(|| season_from_folder(self.media.location()))
    }

    /// The title from the name, or one resolved through `lookup`.
    ///
    /// A lookup only happens for a known series with at least one episode,
    /// and its outcome is kept for later calls.
    pub fn lookup_title(&self, lookup: &EpisodeLookup) -> &str {
        if !self.episode_title.is_empty() {
            return &self.episode_title;
        }
        if let Some(resolved) = self.resolved_title.get() {
            return resolved;
        }
        if self.series_name == UNKNOWN_SERIES || self.episodes.is_empty() || !lookup.is_enabled()
        {
            return "";
        }
        self.resolved_title.get_or_init(|| {
            lookup
                .resolve_title(&self.series_name, self.season(), &self.episodes)
                .unwrap_or_default()
        })
    }

    /// Self-consistency check: the `Name - SSxEE` rendering must be well formed.
    pub fn is_valid(&self, check: &ValidityCheck) -> bool {
        check.tv(self)
    }

    fn title_field(&self) -> String {
        match self.resolved_title.get() {
            Some(resolved) if self.episode_title.is_empty() => resolved.clone(),
            _ => self.episode_title.clone(),
        }
    }
}

impl PartialEq for TvFile {
    fn eq(&self, other: &Self) -> bool {
        self.media == other.media
            && self.series_name == other.series_name
            && self.episode_title == other.episode_title
            && self.season_in_name == other.season_in_name
            && self.episodes == other.episodes
            && self.block == other.block
    }
}

impl Eq for TvFile {}

impl FieldSource for TvFile {
    fn field(&self, directive: char) -> Option<String> {
        match directive {
            'N' => Some(self.series_name.clone()),
            'T' => Some(self.title_field()),
            'S' => Some(match self.season() {
                0 => String::new(),
                season => format!("{season:02}"),
            }),
            'e' => Some(
                self.episodes
                    .iter()
                    .map(|e| format!("{e:02}"))
                    .collect::<Vec<_>>()
                    .join("-"),
            ),
            _ => self.media.field(directive),
        }
    }
}

/// `Season 2` and `Series 2` give 2; `Specials` and anything else give 0.
fn season_from_folder(location: &str) -> u32 {
    let folder = location
        .rsplit(std::path::is_separator)
        .find(|part| !part.is_empty())
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    ["season", "series"]
        .iter()
        .find_map(|prefix| folder.strip_prefix(*prefix))
        .map(|rest| rest.trim_start_matches([' ', '.', '_', '-']))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
