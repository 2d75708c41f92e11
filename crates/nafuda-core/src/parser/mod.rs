pub mod episode;
pub mod junk;
pub mod numbers;
pub mod tokenizer;

pub use episode::{EpisodeExtractor, EpisodeParts, UNKNOWN_SERIES};
pub use junk::{JunkClassifier, ScanState, TagLexicon};
pub use tokenizer::{Refined, SplitName, Tokenizer};
