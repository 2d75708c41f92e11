//! # Episode Extractor
//!
//! Reads season and episode evidence out of refined sectors and splits the
//! rest into a series name and an episode title.
//!
//! Heuristics run per sector, left to right, first match wins:
//!
//! 1. `S01` sets the season and falls through to 2 in the same sector.
//! 2. `E05`, `E05-06`, `E05E06` add episodes.
//! 3. `2x05(-06)` is rewritten to `S2E05(-06)` and the sector is re-scanned.
//! 4. `Season` followed by a number.
//! 5. `Episode` followed by a number, replacing earlier episodes.
//!
//! After the scan, two fallbacks apply when no episode was found: a short
//! number in the first sector (`01 Pilot`), then a single bare number of up to
//! three digits anywhere (`Show.101`).

use regex::Regex;
use tracing::debug;

use crate::error::{NafudaError, Result};

/// Series name used when none can be inferred.
pub const UNKNOWN_SERIES: &str = "Unknown";

/// Everything the extractor learned about one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeParts {
    /// Season found in the name itself.
    pub season: Option<u32>,
    /// Episode numbers in order of appearance.
    pub episodes: Vec<u32>,
    /// Inclusive sector span consumed as season/episode evidence.
    pub block: Option<(usize, usize)>,
    /// Series name, [`UNKNOWN_SERIES`] if none.
    pub series_name: String,
    /// Episode title as written in the name, possibly empty.
    pub episode_title: String,
}

/// What the cursor does after one sector was examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Move past this many sectors.
    Advance(usize),
    /// The sector was rewritten; examine the same index again.
    Revisit,
}

/// Evidence collected during one scan.
struct Evidence<'a> {
    input: &'a str,
    season: Option<u32>,
    episodes: Vec<u32>,
    block: Option<(usize, usize)>,
}

impl Evidence<'_> {
    fn set_season(&mut self, season: u32) -> Result<()> {
        match self.season {
            Some(first) if first != season => Err(NafudaError::ConflictingSeason {
                first,
                second: season,
                input: self.input.to_string(),
            }),
            _ => {
                self.season = Some(season);
                Ok(())
            }
        }
    }

    fn extend_block(&mut self, index: usize) {
        self.block = Some(match self.block {
            Some((start, end)) => (start.min(index), end.max(index)),
            None => (index, index),
        });
    }
}

/// Season/episode heuristics with pre-compiled patterns.
#[derive(Debug, Clone)]
pub struct EpisodeExtractor {
    re_season: Regex,
    re_episode: Regex,
    re_cross: Regex,
    re_short_number: Regex,
    re_bare_number: Regex,
    re_digits: Regex,
}

impl EpisodeExtractor {
    /// Constructs a new `EpisodeExtractor` with pre-compiled regex patterns.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::RegexError` if any pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_season: Regex::new(r"(?i)s(\d+)")?,
            re_episode: Regex::new(r"(?i)e(\d+)(?:-(\d+))?")?,
            re_cross: Regex::new(r"(\d+)[xX](\d+)(?:-(\d+))?")?,
            re_short_number: Regex::new(r"^\d{1,2}$")?,
            re_bare_number: Regex::new(r"^\d{1,3}$")?,
            re_digits: Regex::new(r"\d+")?,
        })
    }

    /// Scans `sectors` (rewriting `NxNN` markers in place) and partitions
    /// them into name and title.
    ///
    /// `year` is the release year the tokenizer recorded (`-1` if none); its
    /// sector is left out of the name and title. `input` is only used for
    /// error reporting.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::ConflictingSeason` when two different seasons are
    /// asserted, and `NafudaError::AmbiguousSector` when one sector carries
    /// more than one season or `NxNN` marker.
    pub fn extract(
        &self,
        sectors: &mut [String],
        year: i32,
        input: &str,
    ) -> Result<EpisodeParts> {
        let mut evidence = Evidence {
            input,
            season: None,
            episodes: Vec::new(),
            block: None,
        };

        let mut i = 0;
        while i < sectors.len() {
            match self.scan_sector(sectors, i, &mut evidence)? {
                Step::Advance(n) => i += n,
                Step::Revisit => {}
            }
        }

        if evidence.episodes.is_empty() {
            self.leading_number(sectors, &mut evidence);
        }
        if evidence.episodes.is_empty() {
            self.lone_bare_number(sectors, &mut evidence)?;
        }

        let (series_name, episode_title) = partition(sectors, evidence.block, year);
        debug!(
            season = ?evidence.season,
            episodes = ?evidence.episodes,
            block = ?evidence.block,
            %series_name,
            "episode evidence"
        );

        Ok(EpisodeParts {
            season: evidence.season,
            episodes: evidence.episodes,
            block: evidence.block,
            series_name,
            episode_title,
        })
    }

    fn scan_sector(&self, sectors: &mut [String], i: usize, ev: &mut Evidence<'_>) -> Result<Step> {
        let seasons = self.season_marks(&sectors[i]);
        match seasons.as_slice() {
            [] => {}
            [season] => {
                ev.set_season(*season)?;
                ev.extend_block(i);
            }
            _ => {
                return Err(NafudaError::AmbiguousSector {
                    sector: sectors[i].clone(),
                });
            }
        }

        let episodes = self.episode_marks(&sectors[i]);
        if !episodes.is_empty() {
            ev.episodes.extend(episodes);
            ev.extend_block(i);
            return Ok(Step::Advance(1));
        }
        if !seasons.is_empty() {
            return Ok(Step::Advance(1));
        }

        if let Some(rewritten) = self.rewrite_cross(&sectors[i])? {
            debug!(from = %sectors[i], to = %rewritten, "cross marker");
            sectors[i] = rewritten;
            return Ok(Step::Revisit);
        }

        let next_number = sectors
            .get(i + 1)
            .filter(|s| self.re_short_number.is_match(s))
            .and_then(|s| s.parse::<u32>().ok());
        if let Some(n) = next_number {
            if sectors[i].eq_ignore_ascii_case("season") {
                ev.set_season(n)?;
                ev.extend_block(i);
                ev.extend_block(i + 1);
                return Ok(Step::Advance(2));
            }
            if sectors[i].eq_ignore_ascii_case("episode") {
                ev.episodes = vec![n];
                ev.extend_block(i);
                ev.extend_block(i + 1);
                return Ok(Step::Advance(2));
            }
        }

        Ok(Step::Advance(1))
    }

    /// `S` not preceded by a letter, followed by exactly one or two digits.
    fn season_marks(&self, sector: &str) -> Vec<u32> {
        self.re_season
            .captures_iter(sector)
            .filter(|caps| {
                let start = caps.get(0).map_or(0, |m| m.start());
                !preceded_by(sector, start, char::is_alphabetic) && caps[1].len() <= 2
            })
            .filter_map(|caps| caps[1].parse().ok())
            .collect()
    }

    /// `E05`, `E05-06` (two discrete episodes), `E05E06`.
    fn episode_marks(&self, sector: &str) -> Vec<u32> {
        let mut episodes = Vec::new();
        for caps in self.re_episode.captures_iter(sector) {
            let start = caps.get(0).map_or(0, |m| m.start());
            if preceded_by(sector, start, char::is_alphabetic) || caps[1].len() > 2 {
                continue;
            }
            episodes.extend(caps[1].parse::<u32>().ok());
            if let Some(end) = caps.get(2).filter(|m| m.as_str().len() <= 2) {
                episodes.extend(end.as_str().parse::<u32>().ok());
            }
        }
        episodes
    }

    /// Rewrites the single `2x05(-06)` marker of a sector to `S2E05(-06)`.
    fn rewrite_cross(&self, sector: &str) -> Result<Option<String>> {
        let marks: Vec<_> = self
            .re_cross
            .captures_iter(sector)
            .filter(|caps| {
                let start = caps.get(0).map_or(0, |m| m.start());
                !preceded_by(sector, start, char::is_alphanumeric)
                    && caps[1].len() <= 2
                    && caps[2].len() <= 2
                    && caps.get(3).is_none_or(|m| m.as_str().len() <= 2)
            })
            .collect();

        let caps = match marks.as_slice() {
            [] => return Ok(None),
            [caps] => caps,
            _ => {
                return Err(NafudaError::AmbiguousSector {
                    sector: sector.to_string(),
                });
            }
        };

        let mut marker = format!("S{}E{}", &caps[1], &caps[2]);
        if let Some(end) = caps.get(3) {
            marker.push('-');
            marker.push_str(end.as_str());
        }

        let mut rewritten = sector.to_string();
        if let Some(whole) = caps.get(0) {
            rewritten.replace_range(whole.range(), &marker);
        }
        Ok(Some(rewritten))
    }

    /// `01 Pilot`: a one or two digit run in the very first sector.
    fn leading_number(&self, sectors: &[String], ev: &mut Evidence<'_>) {
        let Some(first) = sectors.first() else {
            return;
        };
        let episode = self
            .re_digits
            .find_iter(first)
            .find(|m| m.as_str().len() <= 2)
            .and_then(|m| m.as_str().parse().ok());

        if let Some(episode) = episode {
            debug!(episode, "leading episode number");
            ev.episodes.push(episode);
            ev.block = Some((0, 0));
        }
    }

    /// `Show.101`: exactly one bare number of up to three digits outside the
    /// evidence block. With three digits the leading one is the season.
    fn lone_bare_number(&self, sectors: &[String], ev: &mut Evidence<'_>) -> Result<()> {
        let block = ev.block;
        let mut bare = sectors
            .iter()
            .enumerate()
            .filter(|(i, _)| block.is_none_or(|(start, end)| *i < start || *i > end))
            .filter(|(_, s)| self.re_bare_number.is_match(s));

        let (index, number) = match (bare.next(), bare.next()) {
            (Some(only), None) => only,
            _ => return Ok(()),
        };

        let (season, episode) = if number.len() >= 3 {
            let (season, episode) = number.split_at(number.len() - 2);
            (season.parse().ok(), episode.parse().ok())
        } else {
            (None, number.parse().ok())
        };

        let Some(episode) = episode else {
            return Ok(());
        };
        if let Some(season) = season {
            ev.set_season(season)?;
        }
        debug!(%number, ?season, episode, "bare episode number");
        ev.episodes.push(episode);
        ev.extend_block(index);
        Ok(())
    }
}

/// Returns `true` if the character before byte `index` satisfies `pred`.
fn preceded_by(text: &str, index: usize, pred: impl Fn(char) -> bool) -> bool {
    text[..index].chars().next_back().is_some_and(pred)
}

/// Joins a run of sectors and trims dangling separators.
fn join_run(run: &[String]) -> String {
    run.join(" ")
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}

/// Splits the sectors around the evidence block into `(name, title)`.
fn partition(sectors: &[String], block: Option<(usize, usize)>, year: i32) -> (String, String) {
    let (name, title) = match block {
        None => (join_without_year(sectors, year, true), String::new()),
        Some((0, end)) => {
            // evidence up front: what follows is "Name - Title" or just a title
            let candidate = join_run(sectors.get(end + 1..).unwrap_or_default());
            match split_name_title(&candidate) {
                Some((name, title)) => (name, title),
                None => (String::new(), candidate),
            }
        }
        Some((start, end)) => (
            join_without_year(&sectors[..start], year, true),
            join_without_year(sectors.get(end + 1..).unwrap_or_default(), year, false),
        ),
    };

    if name.is_empty() {
        (UNKNOWN_SERIES.to_string(), title)
    } else {
        (name, title)
    }
}

/// Like [`join_run`] but drops the sector holding the release year. A name
/// made of nothing else keeps it (`1923.S01E01` is the show "1923").
fn join_without_year(run: &[String], year: i32, keep_if_alone: bool) -> String {
    if year <= 0 {
        return join_run(run);
    }
    let year = year.to_string();
    let kept: Vec<String> = run
        .iter()
        .filter(|s| s.trim_matches(['(', ')', '[', ']', '{', '}']) != year)
        .cloned()
        .collect();
    match join_run(&kept) {
        joined if joined.is_empty() && keep_if_alone => join_run(run),
        joined => joined,
    }
}

/// `"Show - Title"` → `("Show", "Title")`. Exactly one `-`, with a space on
/// both sides of it.
fn split_name_title(candidate: &str) -> Option<(String, String)> {
    let (left, right) = candidate.split_once('-')?;
    if right.contains('-') || !left.ends_with(' ') || !right.starts_with(' ') {
        return None;
    }
    Some((left.trim().to_string(), right.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EpisodeExtractor {
        EpisodeExtractor::new().unwrap()
    }

    fn extract(parts: &[&str]) -> Result<EpisodeParts> {
        let mut sectors: Vec<String> = parts.iter().map(|s| (*s).to_string()).collect();
        extractor().extract(&mut sectors, -1, &parts.join("."))
    }

    #[test]
    fn season_episode_marker() {
        let parts = extract(&["Show", "Name", "S02E05"]).unwrap();
        assert_eq!(parts.season, Some(2));
        assert_eq!(parts.episodes, vec![5]);
        assert_eq!(parts.series_name, "Show Name");
        assert_eq!(parts.episode_title, "");
        assert_eq!(parts.block, Some((2, 2)));
    }

    #[test]
    fn name_and_title_around_block() {
        let parts = extract(&["The", "Office", "-", "S03E10", "-", "A", "Benihana", "Christmas"]).unwrap();
        assert_eq!(parts.series_name, "The Office");
        assert_eq!(parts.episode_title, "A Benihana Christmas");
    }

    #[test]
    fn release_year_is_left_out_of_name() {
        let mut sectors: Vec<String> = ["Doctor", "Who", "2005", "S01E01", "Rose"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parts = extractor()
            .extract(&mut sectors, 2005, "Doctor.Who.2005.S01E01.Rose")
            .unwrap();
        assert_eq!(parts.series_name, "Doctor Who");
        assert_eq!(parts.episode_title, "Rose");
    }

    #[test]
    fn year_only_name_is_kept() {
        let mut sectors: Vec<String> = ["1923", "S01E01"].iter().map(|s| s.to_string()).collect();
        let parts = extractor().extract(&mut sectors, 1923, "1923.S01E01").unwrap();
        assert_eq!(parts.series_name, "1923");

        let mut sectors: Vec<String> =
            ["Show", "S01E01", "Pilot", "(2005)"].iter().map(|s| s.to_string()).collect();
        let parts = extractor()
            .extract(&mut sectors, 2005, "Show.S01E01.Pilot.(2005)")
            .unwrap();
        assert_eq!(parts.series_name, "Show");
        assert_eq!(parts.episode_title, "Pilot");
    }

    #[test]
    fn multi_episode_forms() {
        assert_eq!(extract(&["Show", "S01E01E02"]).unwrap().episodes, vec![1, 2]);
        assert_eq!(extract(&["Show", "S01E01-E02"]).unwrap().episodes, vec![1, 2]);
        assert_eq!(extract(&["Show", "S01E01-02"]).unwrap().episodes, vec![1, 2]);
    }

    #[test]
    fn separate_season_and_episode_sectors() {
        let parts = extract(&["Show", "S01", "E03", "Title"]).unwrap();
        assert_eq!(parts.season, Some(1));
        assert_eq!(parts.episodes, vec![3]);
        assert_eq!(parts.block, Some((1, 2)));
        assert_eq!(parts.episode_title, "Title");
    }

    #[test]
    fn cross_marker_is_rewritten() {
        let mut sectors: Vec<String> = ["Show", "2x05-06"].iter().map(|s| (*s).to_string()).collect();
        let parts = extractor().extract(&mut sectors, -1, "Show.2x05-06").unwrap();
        assert_eq!(parts.season, Some(2));
        assert_eq!(parts.episodes, vec![5, 6]);
        assert_eq!(sectors[1], "S2E05-06");
    }

    #[test]
    fn resolution_is_not_a_cross_marker() {
        let parts = extract(&["Show", "1920x1080"]).unwrap();
        assert_eq!(parts.season, None);
        assert!(parts.episodes.is_empty());
    }

    #[test]
    fn season_and_episode_words() {
        let parts = extract(&["Show", "Season", "3", "Episode", "7", "Title"]).unwrap();
        assert_eq!(parts.season, Some(3));
        assert_eq!(parts.episodes, vec![7]);
        assert_eq!(parts.block, Some((1, 4)));
        assert_eq!(parts.series_name, "Show");
        assert_eq!(parts.episode_title, "Title");
    }

    #[test]
    fn episode_word_replaces_earlier_episodes() {
        let parts = extract(&["Show", "E01E02", "Episode", "9"]).unwrap();
        assert_eq!(parts.episodes, vec![9]);
    }

    #[test]
    fn conflicting_seasons() {
        let err = extract(&["Show", "S01", "S02E01"]).unwrap_err();
        assert!(matches!(
            err,
            NafudaError::ConflictingSeason {
                first: 1,
                second: 2,
                ..
            }
        ));

        let err = extract(&["Show", "S01E01", "Season", "2"]).unwrap_err();
        assert!(matches!(err, NafudaError::ConflictingSeason { .. }));
    }

    #[test]
    fn repeated_same_season_is_fine() {
        let parts = extract(&["Show", "S01", "S01E04"]).unwrap();
        assert_eq!(parts.season, Some(1));
        assert_eq!(parts.episodes, vec![4]);
    }

    #[test]
    fn two_season_marks_in_one_sector() {
        let err = extract(&["Show", "S01-S02"]).unwrap_err();
        assert!(matches!(err, NafudaError::AmbiguousSector { .. }));

        let err = extract(&["Show", "1x01+1x02"]).unwrap_err();
        assert!(matches!(err, NafudaError::AmbiguousSector { .. }));
    }

    #[test]
    fn letters_inside_words_are_not_markers() {
        let parts = extract(&["Mars2", "Se7en"]).unwrap();
        assert_eq!(parts.season, None);
        // falls back to the leading number
        assert_eq!(parts.episodes, vec![2]);
    }

    #[test]
    fn leading_episode_number() {
        let parts = extract(&["01", "Pilot"]).unwrap();
        assert_eq!(parts.episodes, vec![1]);
        assert_eq!(parts.block, Some((0, 0)));
        assert_eq!(parts.series_name, UNKNOWN_SERIES);
        assert_eq!(parts.episode_title, "Pilot");
    }

    #[test]
    fn leading_block_with_name_and_title() {
        let parts = extract(&["S01E01", "-", "Show", "-", "Pilot"]).unwrap();
        assert_eq!(parts.series_name, "Show");
        assert_eq!(parts.episode_title, "Pilot");
    }

    #[test]
    fn leading_block_with_hyphenated_words_is_a_title() {
        let parts = extract(&["S01E01", "Spider-Man", "Returns"]).unwrap();
        assert_eq!(parts.series_name, UNKNOWN_SERIES);
        assert_eq!(parts.episode_title, "Spider-Man Returns");
    }

    #[test]
    fn bare_three_digit_number() {
        let parts = extract(&["Show", "101"]).unwrap();
        assert_eq!(parts.season, Some(1));
        assert_eq!(parts.episodes, vec![1]);
        assert_eq!(parts.series_name, "Show");
    }

    #[test]
    fn bare_two_digit_number() {
        let parts = extract(&["Show", "S02", "07"]).unwrap();
        assert_eq!(parts.season, Some(2));
        assert_eq!(parts.episodes, vec![7]);
        assert_eq!(parts.block, Some((1, 2)));
    }

    #[test]
    fn numbers_inside_the_block_are_not_bare() {
        let parts = extract(&["Show", "Season", "3"]).unwrap();
        assert_eq!(parts.season, Some(3));
        assert!(parts.episodes.is_empty());
    }

    #[test]
    fn several_bare_numbers_do_nothing() {
        let parts = extract(&["Show", "101", "102"]).unwrap();
        assert_eq!(parts.season, None);
        assert!(parts.episodes.is_empty());
        assert_eq!(parts.series_name, "Show 101 102");
    }

    #[test]
    fn no_evidence_keeps_everything_as_name() {
        let parts = extract(&["Just", "A", "Name"]).unwrap();
        assert_eq!(parts.block, None);
        assert_eq!(parts.series_name, "Just A Name");
    }
}
