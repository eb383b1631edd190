use crate::config::Config;
use crate::data::model::{Chain, NuclideRecord, SelectedLine};

/// A chain's diagnostic gamma line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticLine {
    pub energy_kev: f64,
    pub nuclide: &'static str,
}

/// Ra-226 at 186.2 keV, read as the U-238 activity.
pub const RA226_186: DiagnosticLine = DiagnosticLine {
    energy_kev: 186.2,
    nuclide: "RA-226",
};

/// Ac-228 at 911.2 keV, read as the Th-232 activity.
pub const AC228_911: DiagnosticLine = DiagnosticLine {
    energy_kev: 911.2,
    nuclide: "AC-228",
};

/// Pick the one record representing `chain` in a sample.
///
/// `records` must already be restricted to the chain. Returns `None` when
/// nothing qualifies.
pub fn select_line(
    chain: Chain,
    records: &[NuclideRecord],
    config: &Config,
) -> Option<SelectedLine> {
    match chain {
        Chain::K40 => select_k40(records, config),
        Chain::U238 => select_diagnostic(records, RA226_186, config),
        Chain::Th232 => select_diagnostic(records, AC228_911, config),
    }
}

/// Highest activity wins. The reported energy is always the literature
/// 1460.8 keV line, whatever energy the report listed.
fn select_k40(records: &[NuclideRecord], config: &Config) -> Option<SelectedLine> {
    max_activity(records.iter()).map(|best| SelectedLine {
        energy_kev: config.k40_energy_kev,
        ..SelectedLine::from(best)
    })
}

/// First record on the diagnostic line (within tolerance) wins. Otherwise
/// the highest activity above the low-energy floor.
fn select_diagnostic(
    records: &[NuclideRecord],
    target: DiagnosticLine,
    config: &Config,
) -> Option<SelectedLine> {
    let on_target = records.iter().find(|r| {
        r.nuclide == target.nuclide
            && (r.energy_kev - target.energy_kev).abs() <= config.target_tolerance_kev
    });
    if let Some(hit) = on_target {
        return Some(hit.into());
    }

    max_activity(
        records
            .iter()
            .filter(|r| r.energy_kev > config.fallback_min_energy_kev),
    )
    .map(SelectedLine::from)
}

/// Record with the largest activity; the earliest one on ties.
fn max_activity<'a>(
    records: impl Iterator<Item = &'a NuclideRecord>,
) -> Option<&'a NuclideRecord> {
    records.reduce(|best, r| if r.activity_bq > best.activity_bq { r } else { best })
}
