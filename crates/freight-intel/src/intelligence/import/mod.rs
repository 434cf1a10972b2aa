//! Load-book hydration from TMS CSV exports. This covers seeding and batch
//! refresh only; the interactive import wizard lives outside the engine.

mod mapping;
mod parser;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::intelligence::domain::LoadRecord;

#[derive(Debug, thiserror::Error)]
pub enum LoadBookImportError {
    #[error("failed to read load book: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse load book csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("load book row {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

pub struct LoadBookImporter;

impl LoadBookImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LoadRecord>, LoadBookImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LoadRecord>, LoadBookImportError> {
        let rows = parser::parse_rows(reader)?;
        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            // Header occupies line 1; data rows start at line 2.
            records.push(mapping::map_row(row, index + 2)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::domain::{CarrierId, EquipmentType, LoadStatus};
    use chrono::NaiveDate;
    use std::io::Cursor;

    const HEADER: &str = "Load ID,Carrier ID,Shipper ID,CSR ID,Pickup City,Pickup State,Pickup Zip,Drop City,Drop State,Drop Zip,Equipment,Status,Booked On,Delivery Due,Delivered At,Margin,Disputed,Test\n";

    #[test]
    fn imports_a_complete_row() {
        let csv = format!(
            "{HEADER}1001,7,31,4,Davenport,IA,52806,Dallas,TX,75207,dry van,delivered,2026-05-01,2026-05-04,2026-05-03,412.50,no,no\n"
        );
        let records = LoadBookImporter::from_reader(Cursor::new(csv.into_bytes())).expect("imports");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, 1001);
        assert_eq!(record.carrier, Some(CarrierId(7)));
        assert_eq!(record.equipment, Some(EquipmentType::DryVan));
        assert_eq!(record.status, LoadStatus::Delivered);
        assert_eq!(
            record.delivered_at,
            NaiveDate::from_ymd_opt(2026, 5, 3)
        );
        assert!((record.margin - 412.5).abs() < 1e-9);
        assert!(!record.disputed);
        assert!(!record.is_test);
    }

    #[test]
    fn empty_cells_read_as_absent_not_zero() {
        let csv = format!(
            "{HEADER}1002,,,,Davenport,IA,52806,Dallas,TX,75207,,booked,2026-05-01,,,0,no,no\n"
        );
        let records = LoadBookImporter::from_reader(Cursor::new(csv.into_bytes())).expect("imports");
        let record = &records[0];
        assert_eq!(record.carrier, None);
        assert_eq!(record.shipper, None);
        assert_eq!(record.csr, None);
        assert_eq!(record.equipment, None);
        assert_eq!(record.delivery_due, None);
        assert_eq!(record.delivered_at, None);
    }

    #[test]
    fn bad_rows_report_their_line_number() {
        let csv = format!(
            "{HEADER}1003,7,31,4,Davenport,IA,52806,Dallas,TX,75207,dry van,delivered,not-a-date,,,100,no,no\n"
        );
        let err = LoadBookImporter::from_reader(Cursor::new(csv.into_bytes())).expect_err("bad booked date");
        match err {
            LoadBookImportError::InvalidRow { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("Booked On"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let csv = format!(
            "{HEADER}1004,7,31,4,Davenport,IA,52806,Dallas,TX,75207,dry van,vanished,2026-05-01,,,100,no,no\n"
        );
        let err = LoadBookImporter::from_reader(Cursor::new(csv.into_bytes())).expect_err("unknown status");
        assert!(matches!(err, LoadBookImportError::InvalidRow { .. }));
    }

    #[test]
    fn accepts_rfc3339_timestamps_for_dates() {
        let csv = format!(
            "{HEADER}1005,7,31,4,Davenport,IA,52806,Dallas,TX,75207,reefer,covered,2026-05-01T08:30:00Z,2026-05-04T00:00:00Z,2026-05-02T16:45:00Z,380,yes,no\n"
        );
        let records = LoadBookImporter::from_reader(Cursor::new(csv.into_bytes())).expect("imports");
        let record = &records[0];
        assert_eq!(record.booked_on, NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date"));
        assert_eq!(record.delivered_at, NaiveDate::from_ymd_opt(2026, 5, 2));
        assert!(record.disputed);
    }
}
