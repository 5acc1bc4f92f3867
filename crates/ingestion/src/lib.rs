//! # Operations Export Ingestion
//!
//! Reads a brokerage "operations" export and turns its data rows into typed
//! `RawOperation`s.
//!
//! - `read_sheet` decodes the file into rows of cells, from an Excel workbook's
//!   first worksheet or from delimited text.
//! - `OperationsImporter` finds the header sentinel, reads the configured columns
//!   and reports every data row it could not use.

pub mod error;
pub mod importer;
pub mod sheet;
pub mod values;
mod workbook;

pub use error::IngestionError;
pub use importer::{ImportedOperations, OperationsImporter, SkipReason, SkippedRow};
pub use sheet::{read_sheet, Sheet, SheetRow};
