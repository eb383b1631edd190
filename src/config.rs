use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Tunables for one run. Every field has a default, so a config file only
/// needs to name what it changes:
///
/// ```json
/// { "pair_suffix": "_nid.rpt", "target_tolerance_kev": 1.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Entries not ending with this suffix (case-insensitive) are not reports.
    pub report_suffix: String,
    /// Fixed file-name tail following the replicate letter, e.g. `S12a_NID.RPT`.
    pub pair_suffix: String,
    /// Half-width of the window around a chain's diagnostic line.
    pub target_tolerance_kev: f64,
    /// Fallback selection only considers lines strictly above this energy.
    pub fallback_min_energy_kev: f64,
    /// Literature energy reported for every K-40 selection.
    pub k40_energy_kev: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_suffix: ".rpt".to_string(),
            pair_suffix: "_NID.RPT".to_string(),
            target_tolerance_kev: 2.0,
            fallback_min_energy_kev: 100.0,
            k40_energy_kev: 1460.8,
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether an archive entry or file name looks like a report.
    pub fn is_report_name(&self, name: &str) -> bool {
        name.to_ascii_lowercase()
            .ends_with(&self.report_suffix.to_ascii_lowercase())
    }
}
