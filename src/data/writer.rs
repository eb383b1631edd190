use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::model::{SampleRecord, SampleRow, SignificanceRecord, SignificanceRow};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Write the per-sample activity table. Format follows the extension:
/// `.csv`, `.json` (array of records) or `.parquet`.
pub fn write_sample_rows(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let format = Format::from_path(path)?;
    let records: Vec<SampleRecord<'_>> = rows.iter().map(SampleRecord::from).collect();

    match format {
        Format::Csv => write_csv(path, &records)?,
        Format::Json => write_json(path, &records)?,
        Format::Parquet => write_parquet(path, &sample_batch(&records)?)?,
    }
    log::info!("wrote {} sample rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write the replicate significance table, same format rules as
/// [`write_sample_rows`].
pub fn write_significance(path: &Path, rows: &[SignificanceRow]) -> Result<()> {
    let format = Format::from_path(path)?;
    let records: Vec<SignificanceRecord<'_>> =
        rows.iter().map(SignificanceRecord::from).collect();

    match format {
        Format::Csv => write_csv(path, &records)?,
        Format::Json => write_json(path, &records)?,
        Format::Parquet => write_parquet(path, &significance_batch(&records)?)?,
    }
    log::info!("wrote {} significance rows to {}", rows.len(), path.display());
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<std::fs::File>> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    Ok(BufWriter::new(file))
}

// ---------------------------------------------------------------------------
// CSV / JSON
// ---------------------------------------------------------------------------

fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Non-finite numbers have no JSON form; serde_json writes them as `null`.
fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, records)?;
    out.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn utf8(name: &str, nullable: bool) -> Field {
    Field::new(name, DataType::Utf8, nullable)
}

fn float(name: &str, nullable: bool) -> Field {
    Field::new(name, DataType::Float64, nullable)
}

fn sample_batch(records: &[SampleRecord<'_>]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        utf8("sample", false),
        utf8("chain", false),
        float("energy_keV", true),
        utf8("nuclide", true),
        float("activity_Bq", true),
        float("uncertainty_Bq", true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.sample))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.chain.label()))),
        Arc::new(records.iter().map(|r| r.energy_kev).collect::<Float64Array>()),
        Arc::new(records.iter().map(|r| r.nuclide).collect::<StringArray>()),
        Arc::new(records.iter().map(|r| r.activity_bq).collect::<Float64Array>()),
        Arc::new(records.iter().map(|r| r.uncertainty_bq).collect::<Float64Array>()),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn significance_batch(records: &[SignificanceRecord<'_>]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        utf8("sample_pair", false),
        utf8("chain", false),
        float("activity_a", false),
        float("uncertainty_a", false),
        float("activity_b", false),
        float("uncertainty_b", false),
        float("z_stat", true),
        float("p_value", true),
    ]));

    let values = |f: fn(&SignificanceRecord<'_>) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(records.iter().map(f)))
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.sample_pair))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.chain.label()))),
        values(|r| r.activity_a),
        values(|r| r.uncertainty_a),
        values(|r| r.activity_b),
        values(|r| r.uncertainty_b),
        Arc::new(records.iter().map(|r| r.z_stat).collect::<Float64Array>()),
        Arc::new(records.iter().map(|r| r.p_value).collect::<Float64Array>()),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::data::model::{Chain, SelectedLine};

    fn rows() -> Vec<SampleRow> {
        vec![
            SampleRow {
                sample: "S1a_NID.RPT".into(),
                chain: Chain::Th232,
                line: None,
            },
            SampleRow {
                sample: "S1a_NID.RPT".into(),
                chain: Chain::U238,
                line: Some(SelectedLine {
                    energy_kev: 186.3,
                    nuclide: "RA-226".into(),
                    activity_bq: 0.12,
                    uncertainty_bq: 0.003,
                }),
            },
        ]
    }

    #[test]
    fn csv_header_and_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_sample_rows(&path, &rows()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "sample,chain,energy_keV,nuclide,activity_Bq,uncertainty_Bq",
                "S1a_NID.RPT,Th-232,,,,",
                "S1a_NID.RPT,U-238,186.3,RA-226,0.12,0.003",
            ]
        );
    }

    #[test]
    fn json_uses_null_for_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_sample_rows(&path, &rows()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["chain"], "Th-232");
        assert!(value[0]["activity_Bq"].is_null());
        assert_eq!(value[1]["nuclide"], "RA-226");
    }

    #[test]
    fn parquet_keeps_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.parquet");
        write_sample_rows(&path, &rows()).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.iter().map(RecordBatch::num_rows).sum::<usize>(), 2);

        let energy = batches[0]
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(energy.is_null(0));
        assert_eq!(energy.value(1), 186.3);
    }

    #[test]
    fn significance_csv_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sig.csv");
        let row = SignificanceRow {
            sample_pair: "S1".into(),
            chain: Chain::K40,
            activity_a: 1.0,
            uncertainty_a: 0.0,
            activity_b: 1.0,
            uncertainty_b: 0.0,
            z_stat: None,
            p_value: None,
        };
        write_significance(&path, &[row]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("sample_pair,chain,activity_a,uncertainty_a,activity_b,uncertainty_b,z_stat,p_value")
        );
        assert_eq!(lines.next(), Some("S1,K-40,1.0,0.0,1.0,0.0,,"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_sample_rows(&dir.path().join("out.xlsx"), &rows());
        assert!(matches!(err, Err(Error::UnsupportedFormat(ext)) if ext == "xlsx"));
    }
}
