use super::dataset::{normalize_headers, Cell, Column, Dataset};
use super::AnalysisError;
use crate::models::analysis::FileKind;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;

/// Largest integer an f64 holds exactly; integral floats beyond it stay floats.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

pub fn read_dataset(kind: FileKind, bytes: &[u8]) -> Result<Dataset, AnalysisError> {
    match kind {
        FileKind::Csv => read_csv(bytes),
        FileKind::Excel => read_excel(bytes),
    }
}

/// Parses UTF-8 comma-separated text whose first record is the header.
pub fn read_csv(bytes: &[u8]) -> Result<Dataset, AnalysisError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(AnalysisError::EmptyFile);
    }
    let names = normalize_headers(headers);
    let width = names.len();

    let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for record in reader.records() {
        let record = record?;
        if record.len() > width {
            return Err(AnalysisError::RaggedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: width,
                found: record.len(),
            });
        }
        for (index, column) in fields.iter_mut().enumerate() {
            column.push(record.get(index).map(str::to_string));
        }
    }

    let columns = names
        .into_iter()
        .zip(fields)
        .map(|(name, raw)| Column::from_text(name, raw))
        .collect();

    Ok(Dataset::new(columns))
}

/// Parses the first worksheet of an `.xlsx` or `.xls` workbook; its first
/// row is the header.
pub fn read_excel(bytes: &[u8]) -> Result<Dataset, AnalysisError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AnalysisError::Excel(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(AnalysisError::NoWorksheet)?
        .map_err(|e| AnalysisError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = match rows.next() {
        Some(row) => row,
        None => return Err(AnalysisError::EmptyFile),
    };

    let names = normalize_headers(header_row.iter().map(header_text).collect());
    let width = names.len();

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); width];
    for row in rows {
        for (index, column) in cells.iter_mut().enumerate() {
            column.push(row.get(index).map(excel_cell).unwrap_or(Cell::Null));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| Column::from_cells(name, cells))
        .collect();

    Ok(Dataset::new(columns))
}

fn header_text(cell: &Data) -> String {
    match excel_cell(cell) {
        Cell::Null => String::new(),
        other => other.to_text().unwrap_or_default(),
    }
}

fn excel_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) if v.is_nan() => Cell::Null,
        Data::Float(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => Cell::Int(*v as i64),
        Data::Float(v) => Cell::Float(*v),
        Data::Bool(v) => Cell::Bool(*v),
        Data::String(s) if s.is_empty() => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        other => match other.as_datetime() {
            Some(dt) => Cell::Text(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => Cell::Text(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::ColumnType;
    use calamine::CellErrorType;

    #[test]
    fn reads_header_and_rows() {
        let ds = read_csv(b"a,b\n1,2\n3,\n").unwrap();

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.columns[0].dtype, ColumnType::Int64);
        assert_eq!(ds.columns[1].dtype, ColumnType::Float64);
        assert_eq!(ds.columns[1].null_count(), 1);
    }

    #[test]
    fn strips_byte_order_mark() {
        let ds = read_csv("\u{feff}name,age\nann,3\n".as_bytes()).unwrap();
        assert_eq!(ds.columns[0].name, "name");
    }

    #[test]
    fn pads_short_rows_with_nulls() {
        let ds = read_csv(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(ds.row_count(), 1);
        assert_eq!(ds.column("c").unwrap().null_count(), 1);
    }

    #[test]
    fn rejects_rows_longer_than_header() {
        let err = read_csv(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::RaggedRow {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_utf8() {
        let err = read_csv(&[0x61, 0x0a, 0xff, 0xfe, 0x0a]).unwrap_err();
        assert!(matches!(err, AnalysisError::Encoding(_)));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let ds = read_csv(b"a,b\n").unwrap();
        assert_eq!(ds.row_count(), 0);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.columns[0].dtype, ColumnType::Object);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let ds = read_csv(b"city,pop\n\"Paris, FR\",2\n").unwrap();
        assert_eq!(
            ds.columns[0].cells,
            vec![Cell::Text("Paris, FR".to_string())]
        );
    }

    #[test]
    fn garbage_is_not_a_workbook() {
        assert!(matches!(
            read_excel(b"definitely not a spreadsheet"),
            Err(AnalysisError::Excel(_))
        ));
    }

    #[test]
    fn integral_floats_from_sheets_are_ints() {
        assert_eq!(excel_cell(&Data::Float(3.0)), Cell::Int(3));
        assert_eq!(excel_cell(&Data::Float(3.5)), Cell::Float(3.5));
        assert_eq!(excel_cell(&Data::Empty), Cell::Null);
    }

    #[test]
    fn sheet_bools_errors_and_dates() {
        assert_eq!(excel_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(excel_cell(&Data::Error(CellErrorType::Div0)), Cell::Null);
        assert_eq!(excel_cell(&Data::String(String::new())), Cell::Null);
        assert_eq!(
            excel_cell(&Data::DateTimeIso("2024-03-01T12:30:00".to_string())),
            Cell::Text("2024-03-01T12:30:00".to_string())
        );
    }

    #[test]
    fn boolean_sheet_column_reads_back_as_bool() {
        let ds = read_csv(b"name,active\nann,true\nbob,false\n").unwrap();
        let bytes = crate::services::analysis::writer::to_xlsx(&ds).unwrap();

        let reread = read_excel(&bytes).unwrap();
        assert_eq!(reread.columns[1].dtype, ColumnType::Bool);
        assert_eq!(
            reread.columns[1].cells,
            vec![Cell::Bool(true), Cell::Bool(false)]
        );
    }
}
