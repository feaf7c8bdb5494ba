//! Loads order tables from spreadsheets and CSV files.
//!
//! The first row holds the column names. Recognized columns are `order_id`,
//! `customer_id` (or `client_id`), `profit`, `costs`, `processing_time_hr` and
//! `Risk (in percent)` (or `risk_pct`); others are ignored.

use core_types::Order;
use std::path::Path;

pub mod convert;
pub mod error;
pub mod parser;

pub use convert::{to_order, to_orders};
pub use error::ReaderError;
pub use parser::{CsvParser, FileParser, RawRecord, SpreadsheetParser, parser_for};

/// Reads every order in `path`, picking the parser from the extension.
///
/// `sheet` selects a worksheet in spreadsheet files and is ignored for CSV.
pub fn read_orders(path: &Path, sheet: Option<&str>) -> Result<Vec<Order>, ReaderError> {
    if !path.exists() {
        return Err(ReaderError::FileNotFound(path.display().to_string()));
    }

    let parser = parser_for(path, sheet)?;
    let records = parser.parse_to_raw_records(path)?;
    let orders = to_orders(&records)?;

    tracing::info!(path = %path.display(), orders = orders.len(), "Orders loaded.");
    Ok(orders)
}
