//! Batch evaluation of CSV patient tables.
//!
//! Each input row is one set of raw form fields, keyed by the header line.
//! A row that fails validation is reported in its output row and does not
//! stop the batch.

use crate::engine::calculate;
use crate::validate::RawFields;
use crate::{ModelId, Result};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// One output row
///
/// Keys are camelCase, matching `DoseResult` and the input field names.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub model: ModelId,
    pub daily_dose: Option<f64>,
    pub weekly_dose: Option<f64>,
    pub bsa: Option<f64>,
    pub error: Option<String>,
}

impl BatchRow {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Evaluate every row of a CSV table with one model
///
/// Only CSV syntax errors abort; validation failures are recorded per row.
pub fn evaluate_csv<R: Read>(model: ModelId, reader: R) -> Result<Vec<BatchRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let raw: RawFields = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let row = match calculate(model, &raw) {
            Ok(result) => BatchRow {
                row: index + 1,
                model,
                daily_dose: Some(result.daily_dose),
                weekly_dose: Some(result.weekly_dose),
                bsa: result.bsa,
                error: None,
            },
            Err(e) => {
                tracing::warn!("Row {}: {}", index + 1, e);
                BatchRow {
                    row: index + 1,
                    model,
                    daily_dose: None,
                    weekly_dose: None,
                    bsa: None,
                    error: Some(e.to_string()),
                }
            }
        };
        rows.push(row);
    }

    tracing::info!(
        "Evaluated {} rows with {} ({} failed)",
        rows.len(),
        model,
        rows.iter().filter(|r| !r.is_ok()).count()
    );
    Ok(rows)
}

/// Write results as CSV to any writer
pub fn write_rows<W: Write>(writer: W, rows: &[BatchRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write results to a CSV file atomically
///
/// Rows go to a temp file in the destination directory, which is then
/// renamed over `path`; a failed write leaves any existing file intact.
pub fn write_csv(path: &Path, rows: &[BatchRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    write_rows(temp.as_file_mut(), rows)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    tracing::info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
age,height,weight,race,cyp2c9,vkorc1,amiodarone
65,170,70,white,*1/*1,GG,no
70,160,,asian,*1/*3,AG,yes
50, 180 ,90,black,*2/*3,AA,
";

    #[test]
    fn test_evaluate_rows_independently() {
        let rows = evaluate_csv(ModelId::Iwpc, TABLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert!(rows[0].is_ok());
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].weekly_dose, Some(533.9));
        assert_eq!(rows[0].daily_dose, Some(76.3));

        // Missing weight
        assert!(!rows[1].is_ok());
        assert!(rows[1].error.as_deref().unwrap().contains("weight"));
        assert_eq!(rows[1].daily_dose, None);

        // Trimmed height, blank optional flag falls back to default
        assert!(rows[2].is_ok());
    }

    #[test]
    fn test_bsa_carried_for_gage() {
        let rows = evaluate_csv(ModelId::Gage, TABLE.as_bytes()).unwrap();
        assert_eq!(rows[0].bsa, Some(1.82));
        assert_eq!(rows[0].daily_dose, Some(5.9));
    }

    #[test]
    fn test_write_csv_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("doses.csv");

        let rows = evaluate_csv(ModelId::Iwpc, TABLE.as_bytes()).unwrap();
        write_csv(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("row,model,dailyDose,weeklyDose,bsa,error")
        );
        assert!(lines.next().unwrap().starts_with("1,iwpc,76.3,533.9,,"));
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn test_json_keys_match_dose_result() {
        let rows = evaluate_csv(ModelId::Iwpc, TABLE.as_bytes()).unwrap();
        let row = serde_json::to_value(&rows[0]).unwrap();
        let result = serde_json::to_value(crate::DoseResult {
            daily_dose: 76.3,
            weekly_dose: 533.9,
            bsa: None,
        })
        .unwrap();

        assert_eq!(row["dailyDose"], result["dailyDose"]);
        assert_eq!(row["weeklyDose"], result["weeklyDose"]);
        assert!(row.get("daily_dose").is_none());
    }

    #[test]
    fn test_malformed_csv_is_an_error() {
        let table = "age,height\n65,170,extra\n";
        assert!(evaluate_csv(ModelId::Biss, table.as_bytes()).is_err());
    }
}
