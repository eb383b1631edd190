use std::io::Write as _;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;

/// Seeded splitmix64 stream; enough for reproducible demo data.
struct Jitter(u64);

impl Jitter {
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        (z ^ (z >> 31)) as f64 / u64::MAX as f64
    }

    /// Multiplicative noise around 1 with the given relative spread
    /// (sum of twelve uniforms, a cheap near-normal).
    fn scale(&mut self, spread: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.unit()).sum();
        1.0 + spread * (sum - 6.0)
    }
}

/// Genie-2000 style scientific notation: `1.234E-01`.
fn sci(v: f64) -> String {
    let s = format!("{v:.3E}");
    match s.split_once('E') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or_default();
            format!("{mantissa}E{exp:+03}")
        }
        None => s,
    }
}

/// (nuclide, line energies in keV, relative activity per chain unit)
const LIBRARY: &[(&str, &[f64], f64)] = &[
    ("K-40", &[1460.83], 1.0),
    ("RA-226", &[186.21], 0.25),
    ("PB-214", &[295.22, 351.93], 0.22),
    ("BI-214", &[609.31, 1120.29, 1764.49], 0.21),
    ("AC-228", &[338.32, 911.20, 968.97], 0.18),
    ("PB-212", &[77.11, 238.63], 0.19),
    ("TL-208", &[583.19, 2614.51], 0.07),
    ("CS-137", &[661.66], 0.03),
];

const BANNER: &str = "\
*****************************************************
*****   N U C L I D E   I D E N T I F I C A T I O N
*****************************************************
";

const TABLE_HEAD: &str = "\
         IDENTIFIED NUCLIDES

  Nuclide      Energy    Yield    Activity    Activity
  Name         (keV)      (%)     (Bq)        Uncertainty

";

fn report(sample: &str, chain_level: f64, drop: Option<&str>, rng: &mut Jitter) -> String {
    let mut text = String::from(BANNER);
    text.push_str(&format!(
        "\n  Sample Title:  {sample}\n  Live Time:     3600 seconds\n\n"
    ));
    text.push_str(TABLE_HEAD);

    for &(nuclide, energies, weight) in LIBRARY {
        if drop == Some(nuclide) {
            continue;
        }
        for (i, &energy) in energies.iter().enumerate() {
            let activity = (chain_level * weight * rng.scale(0.05)).abs();
            let uncertainty = activity * (0.02 + 0.05 * rng.unit());
            let yield_pct = 5.0 + 60.0 * rng.unit();
            let flag = if rng.unit() < 0.2 { "*" } else { " " };
            let name = if i == 0 { nuclide } else { "" };
            text.push_str(&format!(
                "  {name:<10} {energy:>9.2}{flag} {yield_pct:>7.2}   {}   {}\n",
                sci(activity),
                sci(uncertainty)
            ));
        }
    }

    text.push_str("\n  * = energy tolerance exceeded\n");
    text
}

fn main() -> Result<()> {
    let mut rng = Jitter(42);

    // (site, chain activity level, nuclide missing from both replicates)
    let sites: [(&str, f64, Option<&str>); 4] = [
        ("SITE01", 0.8, None),
        ("SITE02", 1.5, None),
        ("SITE03", 0.4, Some("RA-226")),
        ("SITE04", 2.2, Some("K-40")),
    ];

    let output_path = "nids.zip";
    let file = std::fs::File::create(output_path).context("creating output archive")?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut written = 0;
    for &(site, level, drop) in &sites {
        for replicate in ['a', 'b'] {
            let name = format!("nids/{site}{replicate}_NID.RPT");
            zip.start_file(name.as_str(), options)
                .with_context(|| format!("starting {name}"))?;
            zip.write_all(report(site, level, drop, &mut rng).as_bytes())?;
            written += 1;
        }
    }

    // An unpaired replicate and a non-report entry.
    zip.start_file("nids/SITE05a_NID.RPT", options)?;
    zip.write_all(report("SITE05", 1.0, None, &mut rng).as_bytes())?;
    written += 1;
    zip.start_file("nids/README.txt", options)?;
    zip.write_all(b"Synthetic HPGe nuclide identification reports.\n")?;

    zip.finish().context("finishing archive")?;

    println!("Wrote {written} reports to {output_path}");
    Ok(())
}
