//! # Nafuda Core
//!
//! Infers structured metadata from raw media file names and renders
//! canonical names from a small template language. Movies are reduced to a
//! title, year and part; TV episodes additionally get a series name, season,
//! episode numbers and an episode title, which can be completed through an
//! external metadata service.
//!
//! ## Quick Start
//!
//! ```rust
//! use nafuda_core::Renamer;
//!
//! let renamer = Renamer::with_default_config().unwrap();
//!
//! let episode = renamer.parse_tv("Show.Name.2x05-06.HDTV.mkv").unwrap();
//! assert_eq!(renamer.render_tv(&episode).unwrap(), "Show Name - 02x05-06");
//!
//! let movie = renamer.parse_movie("Movie.Part.Two.2001.DVDRip.avi").unwrap();
//! assert_eq!(renamer.render_movie(&movie).unwrap(), "Movie (2001) - part 2");
//! ```
pub mod config;
pub mod error;
pub mod lookup;
pub mod parser;
pub mod renamer;
pub mod template;
pub mod types;

// Re-export primary API
pub use config::RenameConfig;
pub use error::{NafudaError, Result};
pub use lookup::{
    EpisodeInfo, EpisodeLookup, LookupError, MetadataLookup, SelectionCache, SeriesCandidate,
    SeriesChooser,
};
pub use parser::{EpisodeExtractor, EpisodeParts, JunkClassifier, ScanState, TagLexicon, Tokenizer};
pub use renamer::{BatchReport, Renamer, SkippedFile, parse_movie, parse_tv};
pub use template::{FieldSource, Rendered, TemplateRenderer, ValidityCheck};
pub use types::{MediaFile, MovieFile, Quality, TvFile};
