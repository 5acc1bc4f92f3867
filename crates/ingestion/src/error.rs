use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Malformed operations export: no row starting with '{sentinel}' was found")]
    MalformedInputFormat { sentinel: String },

    #[error("The export has {found} data rows, the limit is {limit}")]
    RowLimitExceeded { found: usize, limit: usize },

    #[error("The export is empty")]
    EmptyInput,

    #[error("Failed to read the export: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read the workbook: {0}")]
    Workbook(#[from] calamine::Error),
}
