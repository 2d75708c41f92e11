//! Recursive renderer for the naming mini-language.
//!
//! A template is read one directive at a time:
//!
//! | Directive | Output |
//! |-----------|--------|
//! | field letter | the field value from the [`FieldSource`] |
//! | `?(`...`)` | the rendered group, or nothing if it is suppressed |
//! | `?X` | the single directive `X`, or nothing if it is suppressed |
//! | `\X` | literal `X` |
//! | anything else | itself |

use tracing::trace;

use super::bracket::BracketCache;
use super::fields::FieldSource;
use crate::error::Result;

/// Output of one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Text to append, possibly empty.
    Text(String),
    /// A conditional that decided to emit nothing.
    Suppressed,
}

impl Rendered {
    /// The emitted text; suppressed output reads as empty.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Rendered::Text(text) => text,
            Rendered::Suppressed => "",
        }
    }
}

/// Renders templates against any [`FieldSource`].
///
/// The renderer owns its bracket cache, so one instance may be shared across
/// threads and reused for many files.
#[derive(Debug, Default)]
pub struct TemplateRenderer {
    brackets: BracketCache,
}

impl TemplateRenderer {
    /// Create a renderer with an empty bracket cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The memo of bracket groups seen so far.
    #[must_use]
    pub fn brackets(&self) -> &BracketCache {
        &self.brackets
    }

    /// Renders the whole template.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::UnterminatedGroup` for a `?(` without a matching
    /// `)`.
    ///
    /// # Example
    ///
    /// ```
    /// use nafuda_core::template::{FieldSource, TemplateRenderer};
    ///
    /// struct Year(i32);
    ///
    /// impl FieldSource for Year {
    ///     fn field(&self, directive: char) -> Option<String> {
    ///         (directive == 'Y').then(|| if self.0 > 0 { self.0.to_string() } else { String::new() })
    ///     }
    /// }
    ///
    /// let renderer = TemplateRenderer::new();
    /// assert_eq!(renderer.render("Movie?( (Y))", &Year(2001)).unwrap(), "Movie (2001)");
    /// assert_eq!(renderer.render("Movie?( (Y))", &Year(-1)).unwrap(), "Movie");
    /// ```
    pub fn render(&self, template: &str, fields: &dyn FieldSource) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut index = 0;
        while index < template.len() {
            let (rendered, next) = self.render_at(template, index, fields)?;
            out.push_str(rendered.as_str());
            index = next;
        }
        Ok(out)
    }

    /// Renders the directive starting at byte `index` and returns the index of
    /// the next one.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::UnterminatedGroup` for a `?(` without a matching
    /// `)`.
    pub fn render_at(
        &self,
        template: &str,
        index: usize,
        fields: &dyn FieldSource,
    ) -> Result<(Rendered, usize)> {
        let mut chars = match template.get(index..) {
            Some(rest) => rest.chars(),
            None => return Ok((Rendered::Text(String::new()), template.len())),
        };
        let Some(c) = chars.next() else {
            return Ok((Rendered::Text(String::new()), template.len()));
        };
        let after = index + c.len_utf8();

        match c {
            '\\' => Ok(match chars.next() {
                Some(lit) => (Rendered::Text(lit.to_string()), after + lit.len_utf8()),
                None => (Rendered::Text(String::new()), after),
            }),
            '?' => match chars.next() {
                Some('(') => {
                    let group = self.brackets.extract(template, after)?;
                    let text = self.render(&group.content, fields)?;
                    Ok((gate(text, &group.content), group.end))
                }
                Some(_) => {
                    let (inner, next) = self.render_at(template, after, fields)?;
                    let text = match inner {
                        Rendered::Text(text) => text,
                        Rendered::Suppressed => String::new(),
                    };
                    Ok((gate(text, &template[after..next]), next))
                }
                None => Ok((Rendered::Text(String::new()), after)),
            },
            _ => {
                let text = fields.field(c).unwrap_or_else(|| c.to_string());
                Ok((Rendered::Text(text), after))
            }
        }
    }
}

/// A conditional keeps its output only if some field actually contributed.
fn gate(text: String, raw: &str) -> Rendered {
    let suppressed = text.trim().is_empty()
        || text == raw
        || text.chars().count() < raw.chars().count();
    if suppressed {
        trace!(raw, "conditional suppressed");
        Rendered::Suppressed
    } else {
        Rendered::Text(text)
    }
}
