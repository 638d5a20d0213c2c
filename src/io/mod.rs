//! I/O module
//!
//! Handles snapshot storage, CSV parsing and output.
//!
//! # Components
//!
//! - `json_store` - Durable JSON snapshot file with atomic replacement
//! - `memory_store` - In-process snapshot store
//! - `csv_format` - CSV format handling (record conversion, listing serialization)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod json_store;
pub mod memory_store;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_accounts_csv, CsvRecord};
pub use json_store::{JsonFileStore, DEFAULT_DATA_FILE};
pub use memory_store::MemoryStore;
pub use sync_reader::SyncReader;
