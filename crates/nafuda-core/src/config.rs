//! Naming formats and lookup switches.

use serde::{Deserialize, Serialize};

use crate::error::{NafudaError, Result};

/// Default episode format: `Show - 01x02 - Title (2005)`.
pub const DEFAULT_TV_FORMAT: &str = "N - Sxe?( - T)?( (Y))";

/// Default movie format: `Movie (1999) - part 2`.
pub const DEFAULT_MOVIE_FORMAT: &str = "C?( (Y))?( - part P)";

/// Renaming configuration.
///
/// Formats are only checked when rendered, where an unterminated `?(` group
/// is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Template for episode names.
    pub tv_format: String,
    /// Template for movie names.
    pub movie_format: String,
    /// Directory under the file's location that receives episodes.
    pub tv_subdirectory: String,
    /// Directory under the file's location that receives movies.
    pub movie_subdirectory: String,
    /// Whether missing episode titles are looked up.
    pub lookup_enabled: bool,
    /// Ask the chooser even for a single search hit.
    pub always_confirm: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            tv_format: DEFAULT_TV_FORMAT.to_string(),
            movie_format: DEFAULT_MOVIE_FORMAT.to_string(),
            tv_subdirectory: "TV Shows".to_string(),
            movie_subdirectory: "Movies".to_string(),
            lookup_enabled: false,
            always_confirm: false,
        }
    }
}

impl RenameConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a configuration from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| NafudaError::InvalidConfig(e.to_string()))
    }

    /// Set the episode template.
    pub fn with_tv_format(mut self, format: impl Into<String>) -> Self {
        self.tv_format = format.into();
        self
    }

    /// Set the movie template.
    pub fn with_movie_format(mut self, format: impl Into<String>) -> Self {
        self.movie_format = format.into();
        self
    }

    pub fn with_tv_subdirectory(mut self, dir: impl Into<String>) -> Self {
        self.tv_subdirectory = dir.into();
        self
    }

    pub fn with_movie_subdirectory(mut self, dir: impl Into<String>) -> Self {
        self.movie_subdirectory = dir.into();
        self
    }

    /// Enable or disable episode title lookups.
    pub fn with_lookup_enabled(mut self, enabled: bool) -> Self {
        self.lookup_enabled = enabled;
        self
    }

    pub fn with_always_confirm(mut self, always_confirm: bool) -> Self {
        self.always_confirm = always_confirm;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenameConfig::default();
        assert_eq!(config.tv_format, "N - Sxe?( - T)?( (Y))");
        assert_eq!(config.movie_format, "C?( (Y))?( - part P)");
        assert_eq!(config.tv_subdirectory, "TV Shows");
        assert_eq!(config.movie_subdirectory, "Movies");
        assert!(!config.lookup_enabled);
        assert!(!config.always_confirm);
    }

    #[test]
    fn builder_methods() {
        let config = RenameConfig::new()
            .with_tv_format("N Sxe")
            .with_movie_subdirectory("Films")
            .with_lookup_enabled(true);
        assert_eq!(config.tv_format, "N Sxe");
        assert_eq!(config.movie_subdirectory, "Films");
        assert!(config.lookup_enabled);
        assert_eq!(config.movie_format, DEFAULT_MOVIE_FORMAT);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RenameConfig::from_json(r#"{"movie_format": "C", "always_confirm": true}"#)
            .unwrap();
        assert_eq!(config.movie_format, "C");
        assert!(config.always_confirm);
        assert_eq!(config.tv_format, DEFAULT_TV_FORMAT);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let err = RenameConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, NafudaError::InvalidConfig(_)));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = RenameConfig::default().with_tv_subdirectory("Series");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RenameConfig::from_json(&json).unwrap(), config);
    }
}
