//! In-memory table parsed from an upload, with dataframe-style column typing.

use crate::models::analysis::{CellValue, ColumnType, DataRow};

/// Tokens read as missing values in delimited text.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "#NA",
    "<NA>",
];

/// A typed cell after column inference.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Text rendering used for object columns and delimited output.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Int(v) => Some(v.to_string()),
            Cell::Float(v) if v.is_nan() => None,
            Cell::Float(v) => Some(format_float(*v)),
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
            Cell::Text(v) => Some(v.clone()),
        }
    }

    pub fn to_value(&self) -> CellValue {
        match self {
            Cell::Null => CellValue::Null,
            Cell::Int(v) => CellValue::Int(*v),
            Cell::Float(v) if v.is_finite() => CellValue::Float(*v),
            Cell::Float(_) => CellValue::Null,
            Cell::Bool(_) | Cell::Text(_) => {
                self.to_text().map(CellValue::Text).unwrap_or(CellValue::Null)
            }
        }
    }
}

/// Floats always carry a decimal point (`2.0`, not `2`).
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

pub fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub cells: Vec<Cell>,
}

impl Column {
    /// Types a column of raw delimited-text fields. `None` marks a field that
    /// was absent from a short row.
    pub fn from_text(name: String, raw: Vec<Option<String>>) -> Self {
        let fields: Vec<Option<String>> = raw
            .into_iter()
            .map(|f| f.filter(|s| !is_null_token(s)))
            .collect();

        let non_null: Vec<&str> = fields.iter().flatten().map(String::as_str).collect();
        let has_nulls = non_null.len() < fields.len();

        let all_int = non_null.iter().all(|s| s.trim().parse::<i64>().is_ok());
        let all_float = non_null.iter().all(|s| s.trim().parse::<f64>().is_ok());
        let all_bool = non_null.iter().all(|s| parse_bool(s.trim()).is_some());

        let (dtype, cells) = if fields.is_empty() {
            (ColumnType::Object, Vec::new())
        } else if non_null.is_empty() {
            (ColumnType::Float64, vec![Cell::Null; fields.len()])
        } else if all_int && !has_nulls {
            let cells = fields
                .iter()
                .map(|f| match f.as_deref().map(|s| s.trim().parse::<i64>()) {
                    Some(Ok(v)) => Cell::Int(v),
                    _ => Cell::Null,
                })
                .collect();
            (ColumnType::Int64, cells)
        } else if all_float {
            let cells = fields
                .iter()
                .map(|f| match f.as_deref().map(|s| s.trim().parse::<f64>()) {
                    Some(Ok(v)) => Cell::Float(v),
                    _ => Cell::Null,
                })
                .collect();
            (ColumnType::Float64, cells)
        } else if all_bool && !has_nulls {
            let cells = fields
                .iter()
                .map(|f| match f.as_deref().and_then(|s| parse_bool(s.trim())) {
                    Some(v) => Cell::Bool(v),
                    None => Cell::Null,
                })
                .collect();
            (ColumnType::Bool, cells)
        } else {
            let cells = fields
                .into_iter()
                .map(|f| f.map(Cell::Text).unwrap_or(Cell::Null))
                .collect();
            (ColumnType::Object, cells)
        };

        Self { name, dtype, cells }
    }

    /// Types a column of cells that already carry a native type (spreadsheet
    /// input). Text is never re-parsed as a number.
    pub fn from_cells(name: String, cells: Vec<Cell>) -> Self {
        let non_null: Vec<&Cell> = cells.iter().filter(|c| !c.is_null()).collect();
        let has_nulls = non_null.len() < cells.len();

        let all_int = non_null.iter().all(|c| matches!(c, Cell::Int(_)));
        let all_numeric = non_null
            .iter()
            .all(|c| matches!(c, Cell::Int(_) | Cell::Float(_)));
        let all_bool = non_null.iter().all(|c| matches!(c, Cell::Bool(_)));

        let (dtype, cells) = if cells.is_empty() {
            (ColumnType::Object, cells)
        } else if non_null.is_empty() {
            (ColumnType::Float64, vec![Cell::Null; cells.len()])
        } else if all_int && !has_nulls {
            (ColumnType::Int64, cells)
        } else if all_numeric {
            let cells = cells
                .into_iter()
                .map(|c| match c.as_f64() {
                    Some(v) => Cell::Float(v),
                    None => Cell::Null,
                })
                .collect();
            (ColumnType::Float64, cells)
        } else if all_bool && !has_nulls {
            (ColumnType::Bool, cells)
        } else {
            let cells = cells
                .into_iter()
                .map(|c| c.to_text().map(Cell::Text).unwrap_or(Cell::Null))
                .collect();
            (ColumnType::Object, cells)
        };

        Self { name, dtype, cells }
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Rows as ordered `column -> value` maps, at most `limit` of them.
    pub fn rows(&self, limit: Option<usize>) -> Vec<DataRow> {
        let count = limit
            .map(|l| l.min(self.row_count()))
            .unwrap_or_else(|| self.row_count());

        (0..count)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| (col.name.clone(), col.cells[row].to_value()))
                    .collect()
            })
            .collect()
    }
}

/// Gives every column a usable, unique name: blanks become `Unnamed: <i>`
/// and repeats get a numeric suffix (`a`, `a.1`, `a.2`).
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(raw.len());

    for (index, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {index}")
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.push(candidate);
    }

    seen
}
