use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: '{0}' (expected .ods, .xlsx, .xls or .csv)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet parse failed: {0}")]
    Spreadsheet(String),

    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Worksheet '{0}' not found")]
    SheetNotFound(String),

    #[error("Worksheet has no header row")]
    EmptyWorksheet,

    #[error("Row {row}: missing required column '{column}'")]
    MissingColumn { row: usize, column: String },

    #[error("Row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: processing time must be positive, got {value}")]
    NonPositiveProcessingTime { row: usize, value: String },

    #[error("Row {row}: risk must be within 0-100%, got {value}")]
    RiskOutOfRange { row: usize, value: String },
}
