use regex::Regex;

use super::fields::FieldSource;
use super::renderer::TemplateRenderer;
use crate::error::Result;
use crate::types::{MovieFile, TvFile};

/// Rendering checked for movies.
pub const MOVIE_VALIDITY_TEMPLATE: &str = "C (Y)";

/// Rendering checked for episodes.
pub const TV_VALIDITY_TEMPLATE: &str = "N - Sxe?( - T)?( (Y))";

const MOVIE_VALIDITY_PATTERN: &str = r"^\S.* \(\d{4}\)$";

const TV_VALIDITY_PATTERN: &str = r"^.+ - \d{2}x\d{2}(-\d{2})*( - .+)?( \(\d{4}\))?$";

/// Self-consistency check: a file is valid when its fixed validity rendering
/// matches the expected shape.
#[derive(Debug)]
pub struct ValidityCheck {
    renderer: TemplateRenderer,
    re_movie: Regex,
    re_tv: Regex,
}

impl ValidityCheck {
    /// Compiles the validity patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            renderer: TemplateRenderer::new(),
            re_movie: Regex::new(MOVIE_VALIDITY_PATTERN)?,
            re_tv: Regex::new(TV_VALIDITY_PATTERN)?,
        })
    }

    /// `true` if the movie renders as `Name (Year)`.
    pub fn movie(&self, movie: &MovieFile) -> bool {
        self.matches(MOVIE_VALIDITY_TEMPLATE, movie, &self.re_movie)
    }

    /// `true` if the episode renders as `Name - SSxEE[-EE...][ - Title][ (Year)]`.
    pub fn tv(&self, episode: &TvFile) -> bool {
        self.matches(TV_VALIDITY_TEMPLATE, episode, &self.re_tv)
    }

    fn matches(&self, template: &str, fields: &dyn FieldSource, pattern: &Regex) -> bool {
        self.renderer
            .render(template, fields)
            .is_ok_and(|rendered| pattern.is_match(&rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        assert!(ValidityCheck::new().is_ok());
    }

    #[test]
    fn tv_pattern_shapes() {
        let re = Regex::new(TV_VALIDITY_PATTERN).unwrap();
        assert!(re.is_match("Show - 01x02"));
        assert!(re.is_match("Show - 01x02-03 - Pilot (2005)"));
        assert!(!re.is_match("Show - x02"));
        assert!(!re.is_match("Show - 01x"));
    }

    #[test]
    fn movie_pattern_shapes() {
        let re = Regex::new(MOVIE_VALIDITY_PATTERN).unwrap();
        assert!(re.is_match("The Matrix (1999)"));
        assert!(!re.is_match("The Matrix ()"));
        assert!(!re.is_match(" (1999)"));
    }
}
