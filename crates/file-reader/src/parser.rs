use crate::error::ReaderError;
use calamine::{Reader, open_workbook_auto};
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::path::Path;

/// One data row keyed by normalized header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based row number in the source file, header included.
    pub row: usize,
    pub fields: HashMap<String, String>,
}

pub trait FileParser {
    /// Reads every non-blank data row below the header row.
    fn parse_to_raw_records(&self, path: &Path) -> Result<Vec<RawRecord>, ReaderError>;
}

/// Headers are matched case-insensitively.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

fn to_record(row: usize, headers: &[String], values: Vec<String>) -> Option<RawRecord> {
    if values.iter().all(|v| v.is_empty()) {
        tracing::warn!(row, "Skipping blank row.");
        return None;
    }
    let fields = headers
        .iter()
        .zip(values)
        .filter(|(header, _)| !header.is_empty())
        .map(|(header, value)| (header.clone(), value))
        .collect();
    Some(RawRecord { row, fields })
}

/// Reads `.ods`, `.xlsx` and `.xls` workbooks.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetParser {
    sheet: Option<String>,
}

impl SpreadsheetParser {
    /// Without a sheet name the first worksheet is read.
    pub fn new(sheet: Option<String>) -> Self {
        Self { sheet }
    }
}

impl FileParser for SpreadsheetParser {
    fn parse_to_raw_records(&self, path: &Path) -> Result<Vec<RawRecord>, ReaderError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| ReaderError::Spreadsheet(e.to_string()))?;

        let names = workbook.sheet_names();
        let sheet = match &self.sheet {
            Some(name) if names.iter().any(|n| n == name) => name.clone(),
            Some(name) => return Err(ReaderError::SheetNotFound(name.clone())),
            None => names.first().cloned().ok_or(ReaderError::EmptyWorksheet)?,
        };
        tracing::debug!(sheet = %sheet, "Reading worksheet.");

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| ReaderError::Spreadsheet(e.to_string()))?;
        let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or(ReaderError::EmptyWorksheet)?
            .iter()
            .map(|cell| normalize_header(&cell.to_string()))
            .collect();

        let records = rows
            .enumerate()
            .filter_map(|(i, row)| {
                let values = row.iter().map(|cell| cell.to_string().trim().to_string());
                to_record(first_row + i + 2, &headers, values.collect())
            })
            .collect();
        Ok(records)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, path: &Path) -> Result<Vec<RawRecord>, ReaderError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ReaderError::EmptyWorksheet);
        }

        let mut records = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            // the reader skips empty lines, so prefer its own line count
            let row = record.position().map_or(i + 2, |p| p.line() as usize);
            let values = record.iter().map(str::to_string).collect();
            if let Some(raw) = to_record(row, &headers, values) {
                records.push(raw);
            }
        }
        Ok(records)
    }
}

/// Picks a parser from the file extension.
pub fn parser_for(path: &Path, sheet: Option<&str>) -> Result<Box<dyn FileParser>, ReaderError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Box::new(CsvParser)),
        "ods" | "xlsx" | "xlsm" | "xlsb" | "xls" => {
            Ok(Box::new(SpreadsheetParser::new(sheet.map(str::to_string))))
        }
        _ => Err(ReaderError::UnsupportedFormat(extension)),
    }
}
