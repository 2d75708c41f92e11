use serde::{Deserialize, Serialize};

use super::quality::Quality;
use crate::template::{FieldSource, ValidityCheck};

/// Fields shared by every kind of media file, inferred from its raw name.
///
/// Built once by the [`Tokenizer`](crate::parser::Tokenizer) and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub(crate) original_name: String,
    pub(crate) extension: String,
    pub(crate) location: String,
    pub(crate) year: i32,
    pub(crate) part: u32,
    pub(crate) quality: Option<Quality>,
    pub(crate) sectors: Vec<String>,
}

impl MediaFile {
    /// The file name without directory and extension.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// The extension without its leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The enclosing directory, empty if the input had none.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Release year, `-1` when unknown.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Part or disc number, `0` when none.
    #[must_use]
    pub fn part(&self) -> u32 {
        self.part
    }

    /// Quality implied by a resolution tag.
    #[must_use]
    pub fn quality(&self) -> Option<Quality> {
        self.quality
    }

    /// The refined sectors that survived junk truncation.
    #[must_use]
    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    /// The sectors joined with single spaces.
    #[must_use]
    pub fn clean_name(&self) -> String {
        self.sectors.join(" ")
    }
}

impl FieldSource for MediaFile {
    fn field(&self, directive: char) -> Option<String> {
        let value = match directive {
            'L' => self.location.clone(),
            'O' => self.original_name.clone(),
            'C' => self.clean_name(),
            'E' => self.extension.clone(),
            'Y' if self.year > 0 => self.year.to_string(),
            'Y' => String::new(),
            'P' if self.part > 0 => self.part.to_string(),
            'P' => String::new(),
            'Q' => self.quality.map(|q| q.to_string()).unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}

/// A movie: the shared fields with no kind-specific additions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFile {
    media: MediaFile,
}

impl MovieFile {
    pub(crate) fn new(media: MediaFile) -> Self {
        Self { media }
    }

    /// The shared media fields.
    #[must_use]
    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    /// The movie title.
    #[must_use]
    pub fn title(&self) -> String {
        self.media.clean_name()
    }

    /// Self-consistency check: the `Name (Year)` rendering must be well formed.
    #[must_use]
    pub fn is_valid(&self, check: &ValidityCheck) -> bool {
        check.movie(self)
    }
}

impl FieldSource for MovieFile {
    fn field(&self, directive: char) -> Option<String> {
        self.media.field(directive)
    }
}
