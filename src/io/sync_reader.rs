//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over operation records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<OperationRecord, BankError>` for each CSV row:
//!
//! ```no_run
//! use bank_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Applying operation: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in parse errors

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{BankError, OperationRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one record at a time, so memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open `path` for streaming iteration
    ///
    /// Fields are trimmed and short rows are allowed, so trailing optional
    /// columns can be left out.
    pub fn new(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|e| BankError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, BankError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let next = deserializer.next()?;
        self.line_num += 1;

        let line = Some(self.line_num);
        Some(match next {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|message| BankError::Parse { line, message })
            }
            Err(e) => Err(BankError::Parse {
                line,
                message: e.to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationType;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "op,account,counterparty,amount,credential,holder,description\n";

    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(rows.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));

        assert!(result.unwrap_err().to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_iterates_all_operations() {
        let file = create_temp_csv(
            "open,A1,,1000.00,pass1234,Alice,\n\
             deposit,A1,,250,pass1234,,Salary\n\
             withdraw,A1,,50,pass1234,,\n\
             transfer,A1,A2,300,pass1234,,\n",
        );

        let records: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].op, OperationType::Open);
        assert_eq!(records[0].holder.as_deref(), Some("Alice"));
        assert_eq!(records[1].description.as_deref(), Some("Salary"));
        assert_eq!(records[2].op, OperationType::Withdraw);
        assert_eq!(records[3].counterparty.as_deref(), Some("A2"));
        assert_eq!(records[3].amount, Some(Decimal::new(300, 0)));
    }

    #[test]
    fn test_sync_reader_accepts_short_rows() {
        let file = create_temp_csv("deposit,A1,,10,pass1234\n");

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.description, None);
        assert_eq!(record.holder, None);
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let file = create_temp_csv(
            "deposit,A1,,100.0,pass1234,,\n\
             deposit,A2,,invalid,pass1234,,\n\
             deposit,A3,,50.0,pass1234,,\n",
        );

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());
        match &records[1] {
            Err(BankError::Parse { line, message }) => {
                assert_eq!(*line, Some(3)); // header is line 1
                assert!(message.contains("Invalid amount"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let file = create_temp_csv("  deposit  ,  A1  ,,  100.0  ,  pass1234  ,,\n");

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.account, "A1");
        assert_eq!(record.credential, "pass1234");
        assert_eq!(record.amount, Some(Decimal::new(1000, 1)));
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("");

        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }
}
