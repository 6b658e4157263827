//! Report file export: CSV and XLSX.
//!
//! Both formats carry the same columns in the same order, header first, even
//! when the range holds no sales.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use kiosk_core::report::{ExportRow, ReportRange, EXPORT_HEADERS};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::ApiError;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Sales";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX export failed: {0}")]
    Xlsx(#[from] XlsxError),
}

impl From<ExportError> for ApiError {
    fn from(error: ExportError) -> Self {
        ApiError::Persistence(error.to_string())
    }
}

/// Writes rows as UTF-8 CSV.
pub fn to_csv(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    // Header is written by hand so an empty export still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

/// Writes rows to a single-sheet workbook. Numeric columns stay numeric.
pub fn to_xlsx(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.invoice)?;
        sheet.write_string(r, 1, &row.date)?;
        sheet.write_string(r, 2, &row.item)?;
        sheet.write_number(r, 3, row.qty as f64)?;
        sheet.write_number(r, 4, row.price)?;
        sheet.write_string(r, 5, &row.gst_percent)?;
        sheet.write_number(r, 6, row.line_total)?;
        sheet.write_string(r, 7, &row.payment)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Wraps file bytes in a download response named `sales_<range>.<ext>`.
pub fn attachment(bytes: Vec<u8>, content_type: &'static str, range: ReportRange, ext: &str) -> Response {
    let disposition = format!("attachment; filename=\"sales_{}.{}\"", range, ext);
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::Cursor;

    fn row() -> ExportRow {
        ExportRow {
            invoice: "INV-00001".to_string(),
            date: "2024-03-10".to_string(),
            item: "Tea".to_string(),
            qty: 2,
            price: 45.0,
            gst_percent: "18%".to_string(),
            line_total: 106.2,
            payment: "CASH".to_string(),
        }
    }

    #[test]
    fn test_csv_with_rows() {
        let csv = String::from_utf8(to_csv(&[row()]).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Invoice,Date,Item,Qty,Price,GST%,Line Total,Payment");
        assert_eq!(lines[1], "INV-00001,2024-03-10,Tea,2,45.0,18%,106.2,CASH");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_csv_keeps_header() {
        let csv = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv, "Invoice,Date,Item,Qty,Price,GST%,Line Total,Payment\n");
    }

    #[test]
    fn test_xlsx_is_zip_container() {
        let bytes = to_xlsx(&[row()]).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let empty = to_xlsx(&[]).unwrap();
        assert!(empty.starts_with(b"PK"));
    }

    fn csv_records(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn sheet_cells(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn test_xlsx_cells_match_csv_fields() {
        let rows = vec![
            row(),
            ExportRow {
                invoice: "INV-00002".to_string(),
                date: "2024-03-11".to_string(),
                item: "Parle-G, 100g".to_string(),
                qty: 3,
                price: 10.5,
                gst_percent: "5%".to_string(),
                line_total: 33.08,
                payment: "UPI".to_string(),
            },
        ];

        let records = csv_records(&to_csv(&rows).unwrap());
        let cells = sheet_cells(to_xlsx(&rows).unwrap());
        assert_eq!(cells.len(), records.len());

        for (cells, fields) in cells.iter().zip(&records) {
            assert_eq!(cells.len(), fields.len());
            for (col, (cell, field)) in cells.iter().zip(fields).enumerate() {
                match cell {
                    Data::String(text) => assert_eq!(text, field, "column {}", col),
                    Data::Float(number) => {
                        assert_eq!(field.parse::<f64>().unwrap(), *number, "column {}", col)
                    }
                    other => panic!("unexpected cell {:?} in column {}", other, col),
                }
            }
        }

        // Qty, Price and Line Total stay numeric in the workbook
        for col in [3, 4, 6] {
            assert!(matches!(cells[1][col], Data::Float(_)), "column {}", col);
        }
    }

    #[test]
    fn test_attachment_headers() {
        let response = attachment(b"x".to_vec(), CSV_CONTENT_TYPE, ReportRange::Weekly, "csv");
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], CSV_CONTENT_TYPE);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sales_weekly.csv\""
        );
    }
}
