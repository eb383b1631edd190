use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// NuclideRecord – one line of the "Identified Nuclides" table
// ---------------------------------------------------------------------------

/// A single identified gamma line recovered from a report.
#[derive(Debug, Clone, PartialEq)]
pub struct NuclideRecord {
    /// Line energy in keV.
    pub energy_kev: f64,
    /// Uppercased identifier, e.g. `RA-226`.
    pub nuclide: String,
    /// Activity in Bq.
    pub activity_bq: f64,
    /// One-sigma activity uncertainty in Bq.
    pub uncertainty_bq: f64,
}

impl NuclideRecord {
    pub fn new(
        energy_kev: f64,
        nuclide: impl Into<String>,
        activity_bq: f64,
        uncertainty_bq: f64,
    ) -> Self {
        Self {
            energy_kev,
            nuclide: nuclide.into(),
            activity_bq,
            uncertainty_bq,
        }
    }
}

// ---------------------------------------------------------------------------
// Chain – the tracked decay chains
// ---------------------------------------------------------------------------

/// Decay chain a nuclide is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Chain {
    #[serde(rename = "U-238")]
    U238,
    #[serde(rename = "Th-232")]
    Th232,
    #[serde(rename = "K-40")]
    K40,
}

impl Chain {
    /// Order in which per-sample rows are emitted.
    pub const OUTPUT_ORDER: [Chain; 3] = [Chain::Th232, Chain::U238, Chain::K40];

    pub fn label(self) -> &'static str {
        match self {
            Chain::U238 => "U-238",
            Chain::Th232 => "Th-232",
            Chain::K40 => "K-40",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SelectedLine / SampleRow – one representative line per (sample, chain)
// ---------------------------------------------------------------------------

/// The line chosen to represent a chain within one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedLine {
    pub energy_kev: f64,
    pub nuclide: String,
    pub activity_bq: f64,
    pub uncertainty_bq: f64,
}

impl From<&NuclideRecord> for SelectedLine {
    fn from(r: &NuclideRecord) -> Self {
        Self {
            energy_kev: r.energy_kev,
            nuclide: r.nuclide.clone(),
            activity_bq: r.activity_bq,
            uncertainty_bq: r.uncertainty_bq,
        }
    }
}

/// Result row for one (sample, chain) pair. `line` is `None` when no record
/// qualified; it is written out as null energy/nuclide and absent activity.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub sample: String,
    pub chain: Chain,
    pub line: Option<SelectedLine>,
}

impl SampleRow {
    /// Activity, NaN when nothing was selected.
    pub fn activity_bq(&self) -> f64 {
        self.line.as_ref().map_or(f64::NAN, |l| l.activity_bq)
    }

    /// Uncertainty, NaN when nothing was selected.
    pub fn uncertainty_bq(&self) -> f64 {
        self.line.as_ref().map_or(f64::NAN, |l| l.uncertainty_bq)
    }
}

// ---------------------------------------------------------------------------
// SignificanceRow – paired a/b replicate comparison
// ---------------------------------------------------------------------------

/// Comparison of replicate `a` against replicate `b` for one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceRow {
    /// File-name prefix shared by both replicates.
    pub sample_pair: String,
    pub chain: Chain,
    pub activity_a: f64,
    pub uncertainty_a: f64,
    pub activity_b: f64,
    pub uncertainty_b: f64,
    /// `None` when the combined standard error is zero (or not a number).
    pub z_stat: Option<f64>,
    /// Two-sided p-value; `None` exactly when `z_stat` is.
    pub p_value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Flat output records (column order is the on-disk column order)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SampleRecord<'a> {
    pub sample: &'a str,
    pub chain: Chain,
    #[serde(rename = "energy_keV")]
    pub energy_kev: Option<f64>,
    pub nuclide: Option<&'a str>,
    #[serde(rename = "activity_Bq")]
    pub activity_bq: Option<f64>,
    #[serde(rename = "uncertainty_Bq")]
    pub uncertainty_bq: Option<f64>,
}

impl<'a> From<&'a SampleRow> for SampleRecord<'a> {
    fn from(row: &'a SampleRow) -> Self {
        let line = row.line.as_ref();
        SampleRecord {
            sample: &row.sample,
            chain: row.chain,
            energy_kev: line.map(|l| l.energy_kev),
            nuclide: line.map(|l| l.nuclide.as_str()),
            activity_bq: line.map(|l| l.activity_bq),
            uncertainty_bq: line.map(|l| l.uncertainty_bq),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignificanceRecord<'a> {
    pub sample_pair: &'a str,
    pub chain: Chain,
    pub activity_a: f64,
    pub uncertainty_a: f64,
    pub activity_b: f64,
    pub uncertainty_b: f64,
    pub z_stat: Option<f64>,
    pub p_value: Option<f64>,
}

impl<'a> From<&'a SignificanceRow> for SignificanceRecord<'a> {
    fn from(row: &'a SignificanceRow) -> Self {
        SignificanceRecord {
            sample_pair: &row.sample_pair,
            chain: row.chain,
            activity_a: row.activity_a,
            uncertainty_a: row.uncertainty_a,
            activity_b: row.activity_b,
            uncertainty_b: row.uncertainty_b,
            z_stat: row.z_stat,
            p_value: row.p_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_labels() {
        let labels: Vec<String> = Chain::OUTPUT_ORDER.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["Th-232", "U-238", "K-40"]);
    }

    #[test]
    fn empty_row_reads_as_nan() {
        let row = SampleRow {
            sample: "S1a_NID.RPT".into(),
            chain: Chain::K40,
            line: None,
        };
        assert!(row.activity_bq().is_nan());
        assert!(row.uncertainty_bq().is_nan());

        let rec = SampleRecord::from(&row);
        assert_eq!(rec.energy_kev, None);
        assert_eq!(rec.nuclide, None);
    }
}
