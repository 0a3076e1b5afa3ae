//! Spreadsheet export of the full record set.
//!
//! Produces an Office Open XML workbook in memory: one sheet, a header row
//! with the nine column names, then one row per record in store order.

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::{
    error::AppError,
    models::expense::{COLUMNS, ExpenseRecord},
};

/// Download filename.
pub const EXPORT_FILENAME: &str = "gastos_malharia.xlsx";

/// MIME type of the download.
pub const EXPORT_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Gastos";

/// Serialize records to `.xlsx` bytes.
///
/// # Errors
///
/// Returns `AppError::Export` if the writer rejects a cell or fails to
/// assemble the archive.
pub fn to_xlsx(records: &[ExpenseRecord]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let money_format = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        match excel_date(record) {
            Some(date) => sheet.write_datetime_with_format(row, 0, &date, &date_format)?,
            // Outside the spreadsheet calendar: keep the display text
            None => sheet.write_string(row, 0, record.formatted_date())?,
        };
        sheet.write_string(row, 1, record.category.label())?;
        sheet.write_string(row, 2, &record.description)?;
        sheet.write_number(row, 3, record.quantity)?;
        sheet.write_string(row, 4, record.unit.label())?;
        sheet.write_number_with_format(row, 5, record.unit_value, &money_format)?;
        sheet.write_number_with_format(row, 6, record.total_value, &money_format)?;
        sheet.write_string(row, 7, record.payment_method.label())?;
        sheet.write_string(row, 8, &record.notes)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(rows = records.len(), bytes = bytes.len(), "spreadsheet generated");

    Ok(bytes)
}

fn excel_date(record: &ExpenseRecord) -> Option<ExcelDateTime> {
    let year = u16::try_from(record.date.year()).ok()?;
    let month = u8::try_from(record.date.month()).ok()?;
    let day = u8::try_from(record.date.day()).ok()?;
    ExcelDateTime::from_ymd(year, month, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::{Category, PaymentMethod, Unit};
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn header_only_for_empty_set() {
        let rows = read_back(to_xlsx(&[]).unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), COLUMNS.len());
    }

    #[test]
    fn rows_and_columns_survive_read_back() {
        let records: Vec<_> = (1..=3)
            .map(|day| {
                ExpenseRecord::new(
                    NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                    Category::MachineMaintenance,
                    format!("peça {day}"),
                    day as f64,
                    Unit::Count,
                    40.0,
                    PaymentMethod::Card,
                    "urgente".to_string(),
                )
            })
            .collect();

        let rows = read_back(to_xlsx(&records).unwrap());
        assert_eq!(rows.len(), records.len() + 1);

        let header: Vec<_> = rows[0].iter().map(|cell| cell.to_string()).collect();
        assert_eq!(header, COLUMNS);

        for (row, record) in rows[1..].iter().zip(&records) {
            assert_eq!(row.len(), COLUMNS.len());
            assert_eq!(row[1], Data::String(record.category.label().to_string()));
            assert_eq!(row[2], Data::String(record.description.clone()));
            assert_eq!(row[3], Data::Float(record.quantity));
            assert_eq!(row[6], Data::Float(record.total_value));
            assert_eq!(row[7], Data::String("Cartão".to_string()));
        }
    }

    #[test]
    fn out_of_range_date_is_written_as_text() {
        let record = ExpenseRecord::new(
            NaiveDate::from_ymd_opt(500, 1, 1).unwrap(),
            Category::Transport,
            "frete".to_string(),
            1.0,
            Unit::Count,
            10.0,
            PaymentMethod::Cash,
            String::new(),
        );

        let rows = read_back(to_xlsx(&[record]).unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], Data::String("01/01/0500".to_string()));
        assert_eq!(rows[1][6], Data::Float(10.0));
    }
}
