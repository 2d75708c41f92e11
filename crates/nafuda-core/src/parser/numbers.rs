//! Spelled-out and roman part numbers (`Part.Two`, `CD.II`).

const WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

const ROMANS: &[&str] = &["i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x"];

/// A sector that may follow a bare part marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberCandidate {
    /// The sector converts to this number.
    Value(u32),
    /// The sector looks numeric but does not convert (e.g. overflows).
    Unconvertible,
}

/// Classifies `sector` as a numeric candidate: a digit run, a number word
/// `zero`..`ten` or a roman numeral `I`..`X`, all case-insensitive.
#[must_use]
pub fn number_candidate(sector: &str) -> Option<NumberCandidate> {
    if !sector.is_empty() && sector.bytes().all(|b| b.is_ascii_digit()) {
        return Some(
            sector
                .parse()
                .map_or(NumberCandidate::Unconvertible, NumberCandidate::Value),
        );
    }

    let lower = sector.to_lowercase();
    if let Some(n) = WORDS.iter().position(|w| *w == lower) {
        return Some(NumberCandidate::Value(n as u32));
    }
    ROMANS
        .iter()
        .position(|r| *r == lower)
        .map(|n| NumberCandidate::Value(n as u32 + 1))
}
