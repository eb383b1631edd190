//! Paired a/b replicate comparison.
//!
//! Samples named `<prefix>a<suffix>` and `<prefix>b<suffix>` (replicate
//! letter case-insensitive) form a pair. For every chain where both
//! replicates have a selected line the activities are compared with a
//! two-sided z-test on independent errors:
//!
//! ```text
//! se = sqrt(se_a² + se_b²)
//! z  = (A_a - A_b) / se
//! p  = 2 (1 - Φ(|z|))
//! ```

use std::collections::HashMap;
use std::f64::consts::SQRT_2;

use regex::Regex;
use statrs::function::erf::erfc;

use crate::data::model::{Chain, SampleRow, SelectedLine, SignificanceRow};
use crate::error::Result;

/// Standard normal CDF.
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// z statistic and two-sided p-value; `None` when the combined standard
/// error is zero or not a number.
pub fn z_test(
    activity_a: f64,
    se_a: f64,
    activity_b: f64,
    se_b: f64,
) -> Option<(f64, f64)> {
    let combined = se_a.hypot(se_b);
    if combined == 0.0 || combined.is_nan() {
        return None;
    }
    let z = (activity_a - activity_b) / combined;
    if z.is_nan() {
        return None;
    }
    Some((z, 2.0 * (1.0 - standard_normal_cdf(z.abs()))))
}

/// Splits sample names into (pair prefix, replicate letter).
#[derive(Debug, Clone)]
pub struct PairKey {
    pattern: Regex,
}

impl PairKey {
    /// `suffix` is matched literally at the end of the name.
    pub fn new(suffix: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"^(.+?)([abAB]){}$", regex::escape(suffix)))?;
        Ok(Self { pattern })
    }

    /// Prefix and lowercase replicate letter, or `None` if the name is not
    /// part of a replicate pair.
    pub fn split<'a>(&self, sample: &'a str) -> Option<(&'a str, char)> {
        let caps = self.pattern.captures(sample)?;
        let prefix = caps.get(1)?.as_str();
        let replicate = caps.get(2)?.as_str().chars().next()?.to_ascii_lowercase();
        Some((prefix, replicate))
    }
}

#[derive(Debug, Default)]
struct Replicates<'a> {
    a: HashMap<Chain, &'a SelectedLine>,
    b: HashMap<Chain, &'a SelectedLine>,
    seen_a: bool,
    seen_b: bool,
}

/// Build the significance table from the full sample table.
///
/// Pairs appear in order of first occurrence of their prefix, chains in
/// [`Chain::OUTPUT_ORDER`]. When a replicate name occurs more than once the
/// later row wins.
pub fn compute_significance(rows: &[SampleRow], key: &PairKey) -> Vec<SignificanceRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut pairs: HashMap<&str, Replicates<'_>> = HashMap::new();

    for row in rows {
        let Some((prefix, replicate)) = key.split(&row.sample) else {
            continue;
        };
        let entry = pairs.entry(prefix).or_insert_with(|| {
            order.push(prefix);
            Replicates::default()
        });
        let (seen, lines) = if replicate == 'a' {
            (&mut entry.seen_a, &mut entry.a)
        } else {
            (&mut entry.seen_b, &mut entry.b)
        };
        *seen = true;
        match &row.line {
            Some(line) => {
                lines.insert(row.chain, line);
            }
            None => {
                lines.remove(&row.chain);
            }
        }
    }

    let mut out = Vec::new();
    for prefix in order {
        let reps = &pairs[prefix];
        if !(reps.seen_a && reps.seen_b) {
            log::warn!("{prefix}: missing replicate, skipped");
            continue;
        }
        for chain in Chain::OUTPUT_ORDER {
            let (Some(a), Some(b)) = (reps.a.get(&chain), reps.b.get(&chain)) else {
                continue;
            };
            let test = z_test(a.activity_bq, a.uncertainty_bq, b.activity_bq, b.uncertainty_bq);
            if test.is_none() {
                log::debug!("{prefix} {chain}: zero combined uncertainty");
            }
            out.push(SignificanceRow {
                sample_pair: prefix.to_string(),
                chain,
                activity_a: a.activity_bq,
                uncertainty_a: a.uncertainty_bq,
                activity_b: b.activity_bq,
                uncertainty_b: b.uncertainty_bq,
                z_stat: test.map(|(z, _)| z),
                p_value: test.map(|(_, p)| p),
            });
        }
    }
    out
}
