//! # Nafuda
//!
//! Parses release-style media file names and renames them to a canonical
//! form. This crate re-exports the parsing engine from `nafuda-core` and the
//! TVmaze title lookup from `nafuda-lookup`.
//!
//! ```rust
//! let movie = nafuda::parse_movie("The.Matrix.1999.720p.BluRay.mkv").unwrap();
//! assert_eq!(movie.title(), "The Matrix");
//! assert_eq!(movie.media().year(), 1999);
//! ```

pub use nafuda_core::*;
pub use nafuda_lookup::TvMazeClient;
