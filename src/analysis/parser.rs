//! Recovery of nuclide records from the "Identified Nuclides" table of a
//! Genie-2000 style report.
//!
//! The table is only semi-structured: a nuclide's first line carries its
//! name, later lines for the same nuclide start with the energy. Lines are
//! therefore folded with the last seen nuclide name as the only state.

use std::sync::LazyLock;

use regex::Regex;

use crate::data::model::NuclideRecord;

/// Decimal number, optional exponent, optional trailing `*` flag.
static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+\.[0-9]+(?:[Ee][+-]?[0-9]+)?\*?$").unwrap()
});

/// Strict scientific notation as printed in the activity column.
static SCIENTIFIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+\.[0-9]+E[+-][0-9]+$").unwrap());

/// Line terminators recognised in report text, including lone `\r`
/// (classic Mac) and the form-feed/separator controls some exporters emit.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Parse all nuclide records from one report, in order of appearance.
/// Duplicates are kept.
pub fn parse_identified(text: &str) -> Vec<NuclideRecord> {
    text.split(LINE_BREAKS)
        .fold(ParserState::default(), ParserState::feed)
        .records
}

#[derive(Debug, Default)]
struct ParserState {
    current_nuclide: Option<String>,
    records: Vec<NuclideRecord>,
}

impl ParserState {
    fn feed(mut self, line: &str) -> Self {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return self;
        };

        if first.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let nuclide = first.to_uppercase();
            let energy = tokens[1..]
                .iter()
                .filter(|t| DECIMAL_RE.is_match(t))
                .find_map(|t| parse_flagged(t));
            if let Some(energy) = energy {
                self.push(energy, &nuclide, &tokens);
            }
            self.current_nuclide = Some(nuclide);
        } else if let Some(nuclide) = self.current_nuclide.take() {
            if DECIMAL_RE.is_match(first) {
                if let Some(energy) = parse_flagged(first) {
                    self.push(energy, &nuclide, &tokens);
                }
            }
            self.current_nuclide = Some(nuclide);
        }
        self
    }

    /// Emit a record when the line ends in `<activity> <uncertainty>`.
    fn push(&mut self, energy_kev: f64, nuclide: &str, tokens: &[&str]) {
        let [.., activity, uncertainty] = tokens else {
            return;
        };
        if tokens.len() < 3 || !SCIENTIFIC_RE.is_match(activity) {
            return;
        }
        let (Ok(activity_bq), Some(uncertainty_bq)) =
            (activity.parse::<f64>(), parse_flagged(uncertainty))
        else {
            return;
        };
        self.records
            .push(NuclideRecord::new(energy_kev, nuclide, activity_bq, uncertainty_bq));
    }
}

/// Parse a numeric token, ignoring a trailing `*` flag.
fn parse_flagged(token: &str) -> Option<f64> {
    token.strip_suffix('*').unwrap_or(token).parse().ok()
}
