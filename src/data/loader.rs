use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};

/// One report file: the sample name and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Base name of the entry, e.g. `S12a_NID.RPT`.
    pub name: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every report under `path`, in lexicographic order of entry name.
///
/// Supported inputs:
/// * a directory – the regular files directly inside it
/// * `.zip`      – every file entry of the archive
/// * anything else – treated as a single report file
///
/// Entries whose name does not end with [`Config::report_suffix`] are skipped.
pub fn load_reports(path: &Path, config: &Config) -> Result<Vec<Report>> {
    if path.is_dir() {
        return load_dir(path, config);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "zip" => load_zip(path, config),
        _ => load_single(path, config),
    }
}

/// Final path component of an archive entry name.
fn base_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

/// UTF-8 decode that drops invalid byte sequences instead of replacing them.
fn decode(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

// ---------------------------------------------------------------------------
// Zip archive
// ---------------------------------------------------------------------------

fn load_zip(path: &Path, config: &Config) -> Result<Vec<Report>> {
    let archive_err = |source| Error::Archive {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_err)?;

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .filter(|name| config.is_report_name(name))
        .map(str::to_string)
        .collect();
    names.sort();

    let mut reports = Vec::with_capacity(names.len());
    for name in names {
        let mut entry = archive.by_name(&name).map_err(archive_err)?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io(path.join(&name), e))?;
        log::debug!("read {name} ({} bytes)", bytes.len());

        reports.push(Report {
            name: base_name(&name).to_string(),
            text: decode(&bytes),
        });
    }

    log::info!("loaded {} reports from {}", reports.len(), path.display());
    Ok(reports)
}

// ---------------------------------------------------------------------------
// Directory of report files
// ---------------------------------------------------------------------------

fn load_dir(path: &Path, config: &Config) -> Result<Vec<Report>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(|e| Error::io(path, e))? {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if config.is_report_name(&name) {
            files.push((name, entry.path()));
        }
    }
    files.sort();

    let reports = files
        .into_iter()
        .map(|(name, file)| {
            let bytes = std::fs::read(&file).map_err(|e| Error::io(&file, e))?;
            Ok(Report {
                name,
                text: decode(&bytes),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!("loaded {} reports from {}", reports.len(), path.display());
    Ok(reports)
}

// ---------------------------------------------------------------------------
// Single report file
// ---------------------------------------------------------------------------

fn load_single(path: &Path, config: &Config) -> Result<Vec<Report>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !config.is_report_name(&name) {
        log::warn!("{} is not a report file, nothing to do", path.display());
        return Ok(Vec::new());
    }

    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(vec![Report {
        name,
        text: decode(&bytes),
    }])
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::analysis::parse_identified;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, text) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(text.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn zip_entries_are_filtered_sorted_and_basenamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nids.zip");
        write_zip(
            &path,
            &[
                ("nids/S2a_NID.RPT", "two"),
                ("nids/notes.txt", "skip me"),
                ("nids/S1b_NID.rpt", "one"),
            ],
        );

        let reports = load_reports(&path, &Config::default()).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["S1b_NID.rpt", "S2a_NID.RPT"]);
        assert_eq!(reports[0].text, "one");
    }

    #[test]
    fn directory_is_read_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("B_NID.RPT"), "b").unwrap();
        std::fs::write(dir.path().join("A_NID.RPT"), "a").unwrap();
        std::fs::write(dir.path().join("readme.md"), "x").unwrap();

        let reports = load_reports(dir.path(), &Config::default()).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A_NID.RPT", "B_NID.RPT"]);
    }

    #[test]
    fn invalid_utf8_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("X_NID.RPT");
        std::fs::write(&path, b"RA-226 186.21\xb5 3.64 1.200E-01 3.000E-03").unwrap();

        let reports = load_reports(&path, &Config::default()).unwrap();
        assert_eq!(reports[0].text, "RA-226 186.21 3.64 1.200E-01 3.000E-03");

        let records = parse_identified(&reports[0].text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].energy_kev, 186.21);
    }

    #[test]
    fn missing_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_reports(&dir.path().join("absent.zip"), &Config::default());
        assert!(matches!(err, Err(Error::Io { .. })));
    }
}
