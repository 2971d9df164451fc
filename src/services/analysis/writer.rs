use super::dataset::{Cell, Dataset};
use super::AnalysisError;
use rust_xlsxwriter::Workbook;

/// Largest integer a spreadsheet number cell stores exactly.
const MAX_EXACT_INT: u64 = 1 << 53;

/// Serialises the dataset as CSV with a header row. Missing values are
/// empty fields.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>, AnalysisError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(dataset.columns.iter().map(|c| c.name.as_str()))?;

    for row in 0..dataset.row_count() {
        let record: Vec<String> = dataset
            .columns
            .iter()
            .map(|c| c.cells[row].to_text().unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| AnalysisError::Io(e.into_error()))
}

/// Serialises the dataset as a single-sheet XLSX workbook. Numbers and
/// booleans keep their native cell type; missing values are blank cells.
/// Integers beyond 2^53 are written as text so no digits are lost.
pub fn to_xlsx(dataset: &Dataset) -> Result<Vec<u8>, AnalysisError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, column) in dataset.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, column.name.as_str())?;

        for (row, cell) in column.cells.iter().enumerate() {
            let row = row as u32 + 1;
            match cell {
                Cell::Null => {}
                Cell::Int(v) if v.unsigned_abs() <= MAX_EXACT_INT => {
                    worksheet.write_number(row, col, *v as f64)?;
                }
                Cell::Int(v) => {
                    worksheet.write_string(row, col, v.to_string())?;
                }
                Cell::Float(v) if v.is_finite() => {
                    worksheet.write_number(row, col, *v)?;
                }
                Cell::Float(_) => {}
                Cell::Bool(v) => {
                    worksheet.write_boolean(row, col, *v)?;
                }
                Cell::Text(v) => {
                    worksheet.write_string(row, col, v.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
