//! # Junk Classification
//!
//! Decides where the meaningful part of a file name ends. Release names carry
//! quality, source, codec and group tags after the title; the first such tag
//! marks everything from its position onward as junk.

use std::collections::HashSet;

use tracing::debug;

use crate::types::Quality;

/// Resolution tags. These also record a [`Quality`].
const RESOLUTION_TAGS: &[&str] = &[
    "480p", "480i", "576p", "576i", "720p", "1080p", "1080i", "2160p", "4k", "uhd",
];

/// Source, codec, audio and release-flag tags.
const RELEASE_TAGS: &[&str] = &[
    // sources
    "bluray", "blu-ray", "bdrip", "brrip", "bdremux", "remux", "dvdrip", "dvd", "dvdscr", "hdtv",
    "pdtv", "sdtv", "webrip", "webdl", "web-dl", "hdrip", "hdcam", "telesync",
    // video codecs
    "x264", "x265", "h264", "h265", "hevc", "avc", "xvid", "divx", "av1", "10bit", "hdr",
    // audio
    "aac", "ac3", "dts", "flac", "mp3", "dd5", "ddp5", "truehd", "atmos",
    // release flags
    "proper", "repack", "internal", "limited", "unrated", "dubbed", "subbed", "multi", "retail",
];

/// Running state of one refinement pass, mutated only through the
/// narrow methods below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    remove_start: Option<usize>,
    year: Option<i32>,
    quality: Option<Quality>,
}

impl ScanState {
    /// Marks `index` as the start of trailing junk. Only ever moves the
    /// boundary towards the front.
    pub fn mark_junk(&mut self, index: usize) {
        if self.remove_start.is_none_or(|start| index < start) {
            debug!(index, "junk boundary");
            self.remove_start = Some(index);
        }
    }

    /// Records a year; the last recorded year wins.
    pub fn record_year(&mut self, year: i32) {
        self.year = Some(year);
    }

    /// Records the quality implied by a resolution tag; the first one wins.
    pub fn record_quality(&mut self, quality: Quality) {
        self.quality.get_or_insert(quality);
    }

    /// Index from which sectors are discarded, if any junk was found.
    #[must_use]
    pub fn remove_start(&self) -> Option<usize> {
        self.remove_start
    }

    /// The committed year, `None` if no plausible year was seen.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// The recorded quality, if a resolution tag was seen.
    #[must_use]
    pub fn quality(&self) -> Option<Quality> {
        self.quality
    }
}

/// A pluggable rule set deciding which sectors are junk and which carry a
/// year.
///
/// Implementations look at `sectors[index]` (and may peek at neighbours) and
/// report through `state`. They must not reorder or delete sectors.
pub trait JunkClassifier: Send + Sync {
    /// Classifies the sector at `index`.
    fn classify(&self, sectors: &[String], index: usize, state: &mut ScanState);
}

/// The default tag lexicon for release-style names.
#[derive(Debug, Clone)]
pub struct TagLexicon {
    tags: HashSet<String>,
    truncate_at_year: bool,
}

impl TagLexicon {
    /// Lexicon for movies: a year that is not the first sector also ends the
    /// title (`Movie.2001.DVDRip` → `Movie`).
    #[must_use]
    pub fn movies() -> Self {
        Self::with_year_truncation(true)
    }

    /// Lexicon for episodes: years are recorded but stay in place, because
    /// they commonly precede the season marker (`Doctor.Who.2005.S01E01`).
    #[must_use]
    pub fn episodes() -> Self {
        Self::with_year_truncation(false)
    }

    fn with_year_truncation(truncate_at_year: bool) -> Self {
        let tags = RESOLUTION_TAGS
            .iter()
            .chain(RELEASE_TAGS)
            .map(|t| (*t).to_string())
            .collect();
        Self {
            tags,
            truncate_at_year,
        }
    }

    /// Adds extra tags (matched case-insensitively).
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags
            .extend(tags.into_iter().map(|t| t.as_ref().to_lowercase()));
        self
    }

    /// Returns `true` if the lowercase token is a known tag.
    fn is_tag(&self, token: &str) -> bool {
        if self.tags.contains(token) {
            return true;
        }
        // "x264-GROUP" style: a known tag glued to a release group
        token
            .split_once('-')
            .is_some_and(|(head, _)| self.tags.contains(head))
    }
}

impl Default for TagLexicon {
    fn default() -> Self {
        Self::movies()
    }
}

impl JunkClassifier for TagLexicon {
    fn classify(&self, sectors: &[String], index: usize, state: &mut ScanState) {
        let Some(sector) = sectors.get(index) else {
            return;
        };
        let lower = sector.to_lowercase();
        let bracketed = lower.starts_with(['[', '{']);
        let core = lower.trim_matches(['(', ')', '[', ']', '{', '}']);

        if let Some(year) = parse_year(core) {
            state.record_year(year);
            if self.truncate_at_year && index > 0 {
                state.mark_junk(index);
            }
            return;
        }

        if let Some(quality) = Quality::from_tag(core) {
            state.record_quality(quality);
        }

        // A leading bracket is usually the release group of fansub names;
        // anywhere else it trails the title.
        if self.is_tag(core) || (bracketed && index > 0) {
            state.mark_junk(index);
        }
    }
}

/// Parses a plausible 4-digit release year.
fn parse_year(token: &str) -> Option<i32> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = token.parse().ok()?;
    (1900..=2099).contains(&year).then_some(year)
}
