//! # Sector Tokenizer
//!
//! Splits a media file name into sectors and refines them in one
//! left-to-right pass. The pass works on an explicit index cursor: every
//! rule either leaves the sector in place (the cursor moves on) or rewrites
//! the sequence at the cursor and asks for the same index to be revisited.

use std::path::is_separator;

use regex::Regex;
use tracing::debug;

use super::junk::{JunkClassifier, ScanState};
use super::numbers::{NumberCandidate, number_candidate};
use crate::error::{NafudaError, Result};
use crate::types::{MediaFile, Quality};

/// Delimiter characters used for the raw split.
const DELIMITERS: &[char] = &[',', '.', '_', ' '];

/// The three path components of a raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitName {
    /// Directory part, empty if the input had no separator.
    pub location: String,
    /// File name without directory and extension.
    pub original_name: String,
    /// Extension without its leading dot.
    pub extension: String,
}

/// Output of one refinement pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refined {
    /// Surviving sectors, junk already truncated.
    pub sectors: Vec<String>,
    /// Committed year, `-1` if none.
    pub year: i32,
    /// Part number, `0` if none.
    pub part: u32,
    /// Quality from the first resolution tag.
    pub quality: Option<Quality>,
}

/// What the cursor does after a rule ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The sector at the cursor is final for this rule.
    Keep,
    /// The sequence changed at the cursor; look at the same index again.
    Revisit,
}

/// Tokenizer for release-style media file names.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    re_digit_letter: Regex,
    re_part: Regex,
}

impl Tokenizer {
    /// Create a new tokenizer with pre-compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::RegexError` if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_digit_letter: Regex::new(r"^(\d+)-(\p{Alphabetic}.*)$")?,
            re_part: Regex::new(r"(?i)^(?:part|cd|disk|disc)(\d+)?$")?,
        })
    }

    /// Tokenize a raw path or file name into a [`MediaFile`].
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::MalformedName` if the name has no extension.
    ///
    /// # Examples
    /// ```
    /// use nafuda_core::parser::{TagLexicon, Tokenizer};
    ///
    /// let tokenizer = Tokenizer::new().unwrap();
    /// let file = tokenizer
    ///     .tokenize("/films/The.Matrix.1999.720p.BluRay.mkv", &TagLexicon::movies())
    ///     .unwrap();
    /// assert_eq!(file.sectors(), ["The", "Matrix"]);
    /// assert_eq!(file.year(), 1999);
    /// ```
    pub fn tokenize(&self, input: &str, classifier: &dyn JunkClassifier) -> Result<MediaFile> {
        let split = Self::split_path(input)?;
        let refined = self.refine(Self::split_sectors(&split.original_name), classifier);

        Ok(MediaFile {
            original_name: split.original_name,
            extension: split.extension,
            location: split.location,
            year: refined.year,
            part: refined.part,
            quality: refined.quality,
            sectors: refined.sectors,
        })
    }

    /// Split the directory and the extension off a raw input.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::MalformedName` if there is no `.` after the last
    /// path separator.
    pub fn split_path(input: &str) -> Result<SplitName> {
        let (location, rest) = match input.rfind(is_separator) {
            // separators are single-byte ASCII
            Some(pos) => (&input[..pos], &input[pos + 1..]),
            None => ("", input),
        };

        let Some(dot) = rest.rfind('.') else {
            return Err(NafudaError::MalformedName {
                input: input.to_string(),
            });
        };

        Ok(SplitName {
            location: location.to_string(),
            original_name: rest[..dot].to_string(),
            extension: rest[dot + 1..].to_string(),
        })
    }

    /// Split a name on the delimiter set. Empty fragments are kept; the
    /// refinement pass drops them.
    #[must_use]
    pub fn split_sectors(name: &str) -> Vec<String> {
        name.split(DELIMITERS).map(str::to_string).collect()
    }

    /// Run the refinement pass over `sectors` and truncate trailing junk.
    ///
    /// Refinement is idempotent: refining an already refined sequence with
    /// the same classifier returns it unchanged.
    #[must_use]
    pub fn refine(&self, mut sectors: Vec<String>, classifier: &dyn JunkClassifier) -> Refined {
        let mut state = ScanState::default();
        let mut part = 0;
        let mut was_single = false;
        let mut i = 0;

        while i < sectors.len() {
            if sectors[i].is_empty() {
                sectors.remove(i);
                continue;
            }

            self.split_digit_letter(&mut sectors, i);
            capitalize(&mut sectors[i]);

            if self.detect_part(&mut sectors, i, &mut part) == Step::Revisit {
                continue;
            }
            if merge_acronym(&mut sectors, i, &mut was_single) == Step::Revisit {
                continue;
            }

            classifier.classify(&sectors, i, &mut state);
            i += 1;
        }

        if let Some(start) = state.remove_start() {
            sectors.truncate(start);
        }

        Refined {
            sectors,
            year: state.year().unwrap_or(-1),
            part,
            quality: state.quality(),
        }
    }

    /// `100-Special` becomes `100`, `Special`. A second hyphen in the tail
    /// (`100-year-old`) leaves the sector intact. The head stays at the
    /// cursor, so the scan continues with it.
    fn split_digit_letter(&self, sectors: &mut Vec<String>, i: usize) {
        let Some(caps) = self.re_digit_letter.captures(&sectors[i]) else {
            return;
        };
        if caps[2].contains('-') {
            return;
        }

        let (head, tail) = (caps[1].to_string(), caps[2].to_string());
        sectors[i] = head;
        sectors.insert(i + 1, tail);
    }

    /// Removes `Part 2`, `CD1`, `Part.Two`, `Disc.IV` style markers and
    /// records the number.
    fn detect_part(&self, sectors: &mut Vec<String>, i: usize, part: &mut u32) -> Step {
        let digits = match self.re_part.captures(&sectors[i]) {
            Some(caps) => caps.get(1).map(|m| m.as_str().to_string()),
            None => return Step::Keep,
        };

        if let Some(digits) = digits {
            if let Ok(n) = digits.parse() {
                *part = n;
            }
            debug!(marker = %sectors[i], part = *part, "part marker");
            sectors.remove(i);
            return Step::Revisit;
        }

        // empty fragments between marker and number (`Part..Two`) are not
        // sectors yet, so look past them
        let next = (i + 1..sectors.len()).find(|&j| !sectors[j].is_empty());
        let Some((next, candidate)) =
            next.and_then(|j| number_candidate(&sectors[j]).map(|c| (j, c)))
        else {
            // "Part" on its own is an ordinary word
            return Step::Keep;
        };
        if let NumberCandidate::Value(n) = candidate {
            *part = n;
        }
        debug!(marker = %sectors[i], number = %sectors[next], part = *part, "part marker");
        sectors.drain(i..=next);
        Step::Revisit
    }
}

/// Uppercases the first character; a no-op on already capitalized sectors.
fn capitalize(sector: &mut String) {
    let mut chars = sector.chars();
    if let Some(first) = chars.next() {
        if first.is_lowercase() {
            *sector = first.to_uppercase().chain(chars).collect();
        }
    }
}

fn is_single_upper(sector: &str) -> bool {
    let mut chars = sector.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// Merges a lone uppercase letter into the previous sector when that one was
/// also a lone letter: `A M Show` → `AM Show`, `A Big M` unchanged.
fn merge_acronym(sectors: &mut Vec<String>, i: usize, was_single: &mut bool) -> Step {
    if !is_single_upper(&sectors[i]) {
        *was_single = false;
        return Step::Keep;
    }
    if *was_single && i > 0 {
        let letter = sectors.remove(i);
        sectors[i - 1].push_str(&letter);
        return Step::Revisit;
    }
    *was_single = true;
    Step::Keep
}
