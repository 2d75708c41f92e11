//! # Renamer
//!
//! One entry point that ties the pipeline together: tokenize a raw name,
//! extract episode evidence, optionally complete the title through a
//! metadata lookup, and render the canonical name from the configured
//! template.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::RenameConfig;
use crate::error::{NafudaError, Result};
use crate::lookup::EpisodeLookup;
use crate::parser::{EpisodeExtractor, JunkClassifier, TagLexicon, Tokenizer};
use crate::template::{FieldSource, TemplateRenderer, ValidityCheck};
use crate::types::{MovieFile, TvFile};

/// A file name a batch could not parse.
#[derive(Debug)]
pub struct SkippedFile {
    /// The raw input.
    pub input: String,
    /// Why it was rejected.
    pub error: NafudaError,
}

/// Outcome of [`Renamer::parse_tv_batch`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Episodes that parsed, in input order.
    pub parsed: Vec<TvFile>,
    /// Inputs that were rejected, in input order.
    pub skipped: Vec<SkippedFile>,
}

/// Parses and renames movies and TV episodes.
pub struct Renamer {
    config: RenameConfig,
    tokenizer: Tokenizer,
    extractor: EpisodeExtractor,
    movie_classifier: Box<dyn JunkClassifier>,
    episode_classifier: Box<dyn JunkClassifier>,
    renderer: TemplateRenderer,
    validity: ValidityCheck,
    lookup: Option<EpisodeLookup>,
}

impl Renamer {
    /// Create a renamer with the given configuration and the default tag
    /// lexicons. No lookup is attached.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::RegexError` if a pattern fails to compile.
    pub fn new(config: RenameConfig) -> Result<Self> {
        Ok(Self {
            config,
            tokenizer: Tokenizer::new()?,
            extractor: EpisodeExtractor::new()?,
            movie_classifier: Box::new(TagLexicon::movies()),
            episode_classifier: Box::new(TagLexicon::episodes()),
            renderer: TemplateRenderer::new(),
            validity: ValidityCheck::new()?,
            lookup: None,
        })
    }

    /// Create a renamer with the default configuration.
    pub fn with_default_config() -> Result<Self> {
        Self::new(RenameConfig::default())
    }

    /// Attach a title lookup used by [`Renamer::render_tv`].
    ///
    /// The configuration's `lookup_enabled` and `always_confirm` switches
    /// override the ones set on `lookup`.
    pub fn with_lookup(mut self, lookup: EpisodeLookup) -> Self {
        self.lookup = Some(
            lookup
                .with_enabled(self.config.lookup_enabled)
                .with_always_confirm(self.config.always_confirm),
        );
        self
    }

    /// Replace the junk classifier used for movie names.
    pub fn with_movie_classifier(mut self, classifier: impl JunkClassifier + 'static) -> Self {
        self.movie_classifier = Box::new(classifier);
        self
    }

    /// Replace the junk classifier used for episode names.
    pub fn with_episode_classifier(mut self, classifier: impl JunkClassifier + 'static) -> Self {
        self.episode_classifier = Box::new(classifier);
        self
    }

    /// Get the renamer configuration.
    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// The validity check for parsed files.
    pub fn validity(&self) -> &ValidityCheck {
        &self.validity
    }

    /// The attached lookup, if any.
    pub fn lookup(&self) -> Option<&EpisodeLookup> {
        self.lookup.as_ref()
    }

    /// Parse a raw path or file name as a movie.
    ///
    /// # Examples
    /// ```
    /// use nafuda_core::Renamer;
    ///
    /// let renamer = Renamer::with_default_config().unwrap();
    /// let movie = renamer.parse_movie("The.Matrix.1999.720p.BluRay.x264.mkv").unwrap();
    ///
    /// assert_eq!(movie.title(), "The Matrix");
    /// assert_eq!(renamer.render_movie(&movie).unwrap(), "The Matrix (1999)");
    /// ```
    pub fn parse_movie(&self, input: &str) -> Result<MovieFile> {
        let media = self.tokenizer.tokenize(input, self.movie_classifier.as_ref())?;
        Ok(MovieFile::new(media))
    }

    /// Parse a raw path or file name as a TV episode.
    ///
    /// # Errors
    ///
    /// Besides `MalformedName`, fails with `ConflictingSeason` or
    /// `AmbiguousSector` when the season/episode evidence contradicts itself.
    ///
    /// # Examples
    /// ```
    /// use nafuda_core::Renamer;
    ///
    /// let renamer = Renamer::with_default_config().unwrap();
    /// let episode = renamer.parse_tv("Show.Name.S02E05.Pilot.720p.mkv").unwrap();
    ///
    /// assert_eq!(episode.series_name(), "Show Name");
    /// assert_eq!(episode.season(), 2);
    /// assert_eq!(episode.episodes(), [5]);
    /// assert_eq!(renamer.render_tv(&episode).unwrap(), "Show Name - 02x05 - Pilot");
    /// ```
    pub fn parse_tv(&self, input: &str) -> Result<TvFile> {
        let mut media = self
            .tokenizer
            .tokenize(input, self.episode_classifier.as_ref())?;
        let parts = self
            .extractor
            .extract(&mut media.sectors, media.year, input)?;
        Ok(TvFile::new(media, parts))
    }

    /// Parse many episode names, skipping the ones that fail.
    ///
    /// # Errors
    ///
    /// Only errors that are not specific to one file abort the batch.
    pub fn parse_tv_batch<'a, I>(&self, inputs: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = BatchReport::default();
        for input in inputs {
            match self.parse_tv(input) {
                Ok(episode) => report.parsed.push(episode),
                Err(error) if error.is_fatal_for_file() => {
                    warn!(input, %error, "skipping file");
                    report.skipped.push(SkippedFile {
                        input: input.to_string(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        debug!(
            parsed = report.parsed.len(),
            skipped = report.skipped.len(),
            "batch parsed"
        );
        Ok(report)
    }

    /// Render the canonical movie name from the configured movie format.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::UnterminatedGroup` for a malformed format.
    pub fn render_movie(&self, movie: &MovieFile) -> Result<String> {
        self.renderer.render(&self.config.movie_format, movie)
    }

    /// Render the canonical episode name from the configured TV format.
    ///
    /// With a lookup attached and `lookup_enabled` set, a missing title is
    /// resolved first.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::UnterminatedGroup` for a malformed format.
    pub fn render_tv(&self, episode: &TvFile) -> Result<String> {
        if let Some(lookup) = &self.lookup {
            episode.lookup_title(lookup);
        }
        self.renderer.render(&self.config.tv_format, episode)
    }

    /// Where a movie would be moved: `location/movie_subdirectory/name.ext`.
    ///
    /// Only computes the path; nothing on disk is touched.
    pub fn movie_target_path(&self, movie: &MovieFile) -> Result<PathBuf> {
        let name = self.render_movie(movie)?;
        Ok(target_path(movie, &self.config.movie_subdirectory, &name))
    }

    /// Where an episode would be moved: `location/tv_subdirectory/name.ext`.
    pub fn tv_target_path(&self, episode: &TvFile) -> Result<PathBuf> {
        let name = self.render_tv(episode)?;
        Ok(target_path(episode, &self.config.tv_subdirectory, &name))
    }
}

impl std::fmt::Debug for Renamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renamer")
            .field("config", &self.config)
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

fn target_path(file: &dyn FieldSource, subdirectory: &str, name: &str) -> PathBuf {
    let location = file.field('L').unwrap_or_default();
    let extension = file.field('E').unwrap_or_default();
    let mut path = PathBuf::from(location);
    path.push(subdirectory);
    path.push(format!("{name}.{extension}"));
    path
}

/// Convenience function to parse a movie name with default settings.
pub fn parse_movie(input: &str) -> Result<MovieFile> {
    Renamer::with_default_config()?.parse_movie(input)
}

/// Convenience function to parse an episode name with default settings.
pub fn parse_tv(input: &str) -> Result<TvFile> {
    Renamer::with_default_config()?.parse_tv(input)
}
