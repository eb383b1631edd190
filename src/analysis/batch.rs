use std::collections::BTreeMap;

use super::classify::classify_chain;
use super::parser::parse_identified;
use super::select::select_line;
use crate::config::Config;
use crate::data::loader::Report;
use crate::data::model::{Chain, NuclideRecord, SampleRow};

/// Run every report through parse → classify → select.
///
/// Reports are processed in the order given; each yields exactly one row per
/// chain, in [`Chain::OUTPUT_ORDER`].
pub fn process_reports(reports: &[Report], config: &Config) -> Vec<SampleRow> {
    reports
        .iter()
        .flat_map(|report| process_report(&report.name, &report.text, config))
        .collect()
}

/// Rows for a single sample.
pub fn process_report(sample: &str, text: &str, config: &Config) -> Vec<SampleRow> {
    let records = parse_identified(text);
    let parsed = records.len();

    let mut by_chain: BTreeMap<Chain, Vec<NuclideRecord>> = BTreeMap::new();
    for record in records {
        if let Some(chain) = classify_chain(&record.nuclide) {
            by_chain.entry(chain).or_default().push(record);
        }
    }

    if by_chain.is_empty() {
        log::warn!("{sample}: none of {parsed} records belong to a tracked chain");
    }

    Chain::OUTPUT_ORDER
        .iter()
        .map(|&chain| {
            let candidates = by_chain.get(&chain).map_or(&[][..], Vec::as_slice);
            let line = select_line(chain, candidates, config);
            match &line {
                Some(l) => log::debug!(
                    "{sample} {chain}: {} @ {} keV from {} candidates",
                    l.nuclide,
                    l.energy_kev,
                    candidates.len()
                ),
                None => log::debug!("{sample} {chain}: no qualifying line"),
            }
            SampleRow {
                sample: sample.to_string(),
                chain,
                line,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const REPORT: &str = "\
*****  IDENTIFIED NUCLIDES  *****

  Nuclide    Energy    Yield   Activity    Uncertainty
  K-40       1460.83   10.66   4.512E-01   2.1E-02
  RA-226     186.21*    3.64   1.200E-01   3.0E-03
  PB-214     351.93    35.60   2.000E-01   4.0E-03
  CS-137     661.66    85.10   3.000E-02   1.0E-03
";

    #[test]
    fn one_row_per_chain_in_fixed_order() {
        let rows = process_report("S1a_NID.RPT", REPORT, &Config::default());
        let chains: Vec<Chain> = rows.iter().map(|r| r.chain).collect();
        assert_eq!(chains, Chain::OUTPUT_ORDER);

        assert_eq!(rows[0].line, None);
        let u = rows[1].line.as_ref().unwrap();
        assert_eq!((u.nuclide.as_str(), u.energy_kev), ("RA-226", 186.21));
        let k = rows[2].line.as_ref().unwrap();
        assert_eq!((k.energy_kev, k.activity_bq), (1460.8, 0.4512));
    }

    #[test]
    fn empty_report_still_yields_rows() {
        let rows = process_report("blank", "", &Config::default());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.line.is_none() && r.activity_bq().is_nan()));
    }

    #[test]
    fn reports_keep_input_order() {
        let reports = [
            Report {
                name: "B".into(),
                text: REPORT.into(),
            },
            Report {
                name: "A".into(),
                text: String::new(),
            },
        ];
        let rows = process_reports(&reports, &Config::default());
        let samples: Vec<&str> = rows.iter().map(|r| r.sample.as_str()).collect();
        assert_eq!(samples, ["B", "B", "B", "A", "A", "A"]);
    }

    proptest! {
        #[test]
        fn always_three_rows(text in "[ -~\n]{0,400}") {
            let rows = process_report("x", &text, &Config::default());
            prop_assert_eq!(rows.len(), 3);
        }
    }
}
