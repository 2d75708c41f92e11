use thiserror::Error;

/// Errors that can occur while parsing file names or rendering templates.
#[derive(Debug, Error)]
pub enum NafudaError {
    /// The raw name has no `.` after its last path separator, so no extension
    /// can be split off.
    #[error("file name has no extension: {input:?}")]
    MalformedName {
        /// The input that could not be split.
        input: String,
    },

    /// Two heuristics asserted different season numbers for the same name.
    #[error("conflicting seasons {first} and {second} in {input:?}")]
    ConflictingSeason {
        /// The season recorded first.
        first: u32,
        /// The season that disagreed with it.
        second: u32,
        /// The name being parsed.
        input: String,
    },

    /// A single sector carried more than one season or `NxNN` marker.
    #[error("sector {sector:?} carries more than one season/episode marker")]
    AmbiguousSector {
        /// The offending sector text.
        sector: String,
    },

    /// A `?(` group in a format template is never closed.
    #[error("unterminated group at index {index} in template {template:?}")]
    UnterminatedGroup {
        /// The template being rendered.
        template: String,
        /// Byte index of the opening bracket.
        index: usize,
    },

    /// A configuration document could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

impl NafudaError {
    /// Returns `true` for errors that reject one file name but should not stop
    /// a batch: the caller skips the file and reports it.
    #[must_use]
    pub fn is_fatal_for_file(&self) -> bool {
        matches!(
            self,
            Self::MalformedName { .. } | Self::ConflictingSeason { .. } | Self::AmbiguousSector { .. }
        )
    }
}

/// Result type alias for nafuda operations.
pub type Result<T> = std::result::Result<T, NafudaError>;
