//! Workbook reading and writing
//!
//! Uploads may be any format calamine opens (xlsx, xls, ods); only the first
//! sheet is read. Exports are single-sheet xlsx files.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use shared::import::{ImportError, SheetRow};
use shared::{Good, Party};

use crate::error::{AppError, AppResult};
use crate::services::expenses::ExpenseExportRow;

/// The first sheet of an uploaded workbook
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// Data rows keyed by the header row; rows with no values are dropped
    pub rows: Vec<SheetRow>,
}

fn unreadable(err: impl std::fmt::Display) -> AppError {
    AppError::validation("file", format!("Unreadable workbook: {}", err))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

/// Read the first sheet of a workbook
pub fn read_workbook(bytes: &[u8]) -> AppResult<Sheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(unreadable)?;

    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::from(ImportError::EmptySheet))?;
    let range = workbook.worksheet_range(&name).map_err(unreadable)?;

    let mut lines = range.rows();
    let headers: Vec<String> = match lines.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => Vec::new(),
    };

    let rows = lines
        .map(|line| {
            headers
                .iter()
                .zip(line.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), cell_text(cell)))
                .collect::<SheetRow>()
        })
        .filter(|row| row.values().any(|v| !v.is_empty()))
        .collect();

    Ok(Sheet { name, rows })
}

// ============================================================================
// Export
// ============================================================================

/// One exported cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: &Option<String>) -> Self {
        value.clone().map(Cell::Text).unwrap_or(Cell::Empty)
    }

    fn decimal(value: Decimal) -> Self {
        value
            .to_f64()
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(value.to_string()))
    }

    fn id(value: Option<i64>) -> Self {
        value.map(|v| Cell::Number(v as f64)).unwrap_or(Cell::Empty)
    }
}

/// A record that can be written as one worksheet row
pub trait SheetRecord {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

impl SheetRecord for Good {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "quantity",
        "unit_price",
        "category",
        "supplier_id",
        "low_stock_threshold",
        "high_stock_threshold",
        "created_at",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Number(self.id as f64),
            Cell::Text(self.name.clone()),
            Cell::Number(f64::from(self.quantity)),
            Cell::decimal(self.unit_price),
            Cell::Text(self.category.clone()),
            Cell::id(self.supplier_id),
            Cell::Number(f64::from(self.low_stock_threshold)),
            Cell::Number(f64::from(self.high_stock_threshold)),
            Cell::Text(self.created_at.to_rfc3339()),
        ]
    }
}

impl SheetRecord for Party {
    const HEADERS: &'static [&'static str] =
        &["id", "name", "contact", "email", "address", "created_at"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Number(self.id as f64),
            Cell::Text(self.name.clone()),
            Cell::text(&self.contact),
            Cell::text(&self.email),
            Cell::text(&self.address),
            Cell::Text(self.created_at.to_rfc3339()),
        ]
    }
}

impl SheetRecord for ExpenseExportRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "supplier_id",
        "supplier_name",
        "amount",
        "description",
        "date",
        "created_at",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Number(self.id as f64),
            Cell::Number(self.supplier_id as f64),
            Cell::text(&self.supplier_name),
            Cell::decimal(self.amount),
            Cell::text(&self.description),
            Cell::Text(self.date.format("%Y-%m-%d").to_string()),
            Cell::Text(self.created_at.to_rfc3339()),
        ]
    }
}

fn xlsx_error(err: XlsxError) -> AppError {
    AppError::Internal(format!("Workbook writer error: {}", err))
}

/// Write records to a single-sheet xlsx workbook with a bold header row
pub fn write_workbook<T: SheetRecord>(sheet_name: &str, records: &[T]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(xlsx_error)?;

    for (col, header) in (0u16..).zip(T::HEADERS.iter()) {
        worksheet
            .write_string_with_format(0, col, *header, &header_format)
            .map_err(xlsx_error)?;
    }

    for (row, record) in (1u32..).zip(records.iter()) {
        for (col, cell) in (0u16..).zip(record.cells()) {
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col, text).map_err(xlsx_error)?;
                }
                Cell::Number(number) => {
                    worksheet.write_number(row, col, number).map_err(xlsx_error)?;
                }
                Cell::Empty => {}
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn party(id: i64, name: &str, contact: Option<&str>) -> Party {
        Party {
            id,
            name: name.to_string(),
            contact: contact.map(str::to_string),
            email: None,
            address: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_written_workbook_reads_back() {
        let bytes = write_workbook(
            "suppliers",
            &[party(1, "Acme", Some("0700 000 000")), party(2, "Globex", None)],
        )
        .unwrap();

        let sheet = read_workbook(&bytes).unwrap();
        assert_eq!(sheet.name, "suppliers");
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("name").map(String::as_str), Some("Acme"));
        assert_eq!(sheet.rows[0].get("id").map(String::as_str), Some("1"));
        assert_eq!(
            sheet.rows[0].get("contact").map(String::as_str),
            Some("0700 000 000")
        );
        assert_eq!(sheet.rows[1].get("contact").map(String::as_str), Some(""));
    }

    #[test]
    fn test_garbage_is_unreadable() {
        match read_workbook(b"not a workbook").unwrap_err() {
            AppError::Validation { field, message } => {
                assert_eq!(field, "file");
                assert!(message.starts_with("Unreadable workbook"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decimal_cells() {
        assert_eq!(Cell::decimal(Decimal::new(450, 2)), Cell::Number(4.5));
        assert_eq!(Cell::id(None), Cell::Empty);
        assert_eq!(Cell::text(&None), Cell::Empty);
    }
}
