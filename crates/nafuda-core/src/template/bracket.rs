use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{NafudaError, Result};

/// The contents of one `(...)` group of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracketed {
    /// Text between the outer brackets.
    pub content: String,
    /// Byte index just past the closing bracket.
    pub end: usize,
}

/// Memo of bracket groups keyed by `(template, index of '(')`.
///
/// Entries are only ever inserted, never updated or evicted; the key space is
/// bounded by the configured format strings.
#[derive(Debug, Default)]
pub struct BracketCache {
    entries: Mutex<HashMap<(String, usize), Bracketed>>,
}

impl BracketCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balanced group opening at byte `open` of `template`.
    ///
    /// # Errors
    ///
    /// Returns `NafudaError::UnterminatedGroup` if the group never closes.
    /// Failures are not cached.
    pub fn extract(&self, template: &str, open: usize) -> Result<Bracketed> {
        let key = (template.to_string(), open);
        if let Some(hit) = self.entries.lock().get(&key) {
            return Ok(hit.clone());
        }

        let found = scan_balanced(template, open)?;
        debug!(template, open, content = %found.content, "bracket group");
        Ok(self.entries.lock().entry(key).or_insert(found).clone())
    }

    /// Number of memoized groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing was memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Finds the `)` matching the `(` at `open`. A `\` skips the character after
/// it, so escaped brackets do not count.
fn scan_balanced(template: &str, open: usize) -> Result<Bracketed> {
    let unterminated = || NafudaError::UnterminatedGroup {
        template: template.to_string(),
        index: open,
    };
    let tail = template.get(open..).ok_or_else(unterminated)?;

    let mut depth = 0usize;
    let mut escaped = false;
    for (offset, c) in tail.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let close = open + offset;
                    return Ok(Bracketed {
                        content: template[open + 1..close].to_string(),
                        end: close + 1,
                    });
                }
            }
            _ => {}
        }
    }
    Err(unterminated())
}
