//! Spreadsheet analysis: parse an uploaded CSV or Excel file, profile its
//! columns, and re-export it in another tabular format.

pub mod dataset;
pub mod reader;
pub mod stats;
pub mod writer;

use crate::models::analysis::{AnalysisReport, ColumnType, FileKind, FullDataset, OrderedMap};
use dataset::Dataset;
use std::str::FromStr;

pub const PREVIEW_ROWS: usize = 5;
pub const TOP_CATEGORIES: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("File must be CSV or Excel format")]
    UnsupportedFileType,
    #[error("Invalid output format '{0}'")]
    InvalidOutputFormat(String),
    #[error("File is empty")]
    EmptyFile,
    #[error("File is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Excel error: {0}")]
    Excel(String),
    #[error("Workbook has no worksheets")]
    NoWorksheet,
    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Excel,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Excel => "xlsx",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "excel" => Ok(OutputFormat::Excel),
            other => Err(AnalysisError::InvalidOutputFormat(other.to_string())),
        }
    }
}

/// An uploaded file held in memory for the duration of a request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn kind(&self) -> Result<FileKind, AnalysisError> {
        FileKind::from_filename(&self.filename).ok_or(AnalysisError::UnsupportedFileType)
    }

    /// Filename up to the last `.`, or the whole name when there is none.
    pub fn base_name(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((base, _)) => base,
            None => &self.filename,
        }
    }
}

/// A re-encoded file ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub filename: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DataAnalysisService {
    preview_rows: usize,
    top_categories: usize,
}

impl Default for DataAnalysisService {
    fn default() -> Self {
        Self {
            preview_rows: PREVIEW_ROWS,
            top_categories: TOP_CATEGORIES,
        }
    }
}

impl DataAnalysisService {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(&self, file: &UploadedFile) -> Result<(FileKind, Dataset), AnalysisError> {
        let kind = file.kind()?;
        let dataset = reader::read_dataset(kind, &file.bytes)?;
        tracing::debug!(
            filename = %file.filename,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Parsed uploaded file"
        );
        Ok((kind, dataset))
    }

    /// Profiles the upload: shape, column types, a preview (or every row
    /// when `full_data`), numeric summaries, category frequencies and
    /// missing-value ratios.
    pub fn analyze(
        &self,
        file: &UploadedFile,
        full_data: bool,
    ) -> Result<AnalysisReport, AnalysisError> {
        let (kind, dataset) = self.load(file)?;

        let limit = if full_data {
            None
        } else {
            Some(self.preview_rows)
        };

        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        let mut summary = OrderedMap::new();
        let mut categorical_data = OrderedMap::new();
        let mut missing_values = OrderedMap::new();

        for column in &dataset.columns {
            if column.dtype.is_numeric() {
                numeric_columns.push(column.name.clone());
                summary.insert(column.name.clone(), stats::describe(column));
            } else if column.dtype.is_categorical() {
                categorical_columns.push(column.name.clone());
                categorical_data.insert(
                    column.name.clone(),
                    stats::value_counts(column, self.top_categories),
                );
            }
            missing_values.insert(column.name.clone(), stats::missing_values(column, &dataset));
        }

        Ok(AnalysisReport {
            filename: file.filename.clone(),
            file_type: kind,
            shape: (dataset.row_count(), dataset.column_count()),
            columns: column_types(&dataset),
            preview: dataset.rows(limit),
            numeric_columns,
            categorical_columns,
            summary,
            categorical_data,
            missing_values,
            full_data,
        })
    }

    pub fn full_dataset(&self, file: &UploadedFile) -> Result<FullDataset, AnalysisError> {
        let (_, dataset) = self.load(file)?;

        Ok(FullDataset {
            data: dataset.rows(None),
            columns: column_types(&dataset),
            total_rows: dataset.row_count(),
        })
    }

    pub fn convert(
        &self,
        file: &UploadedFile,
        format: OutputFormat,
    ) -> Result<ConvertedFile, AnalysisError> {
        let (_, dataset) = self.load(file)?;

        let bytes = match format {
            OutputFormat::Csv => writer::to_csv(&dataset)?,
            OutputFormat::Excel => writer::to_xlsx(&dataset)?,
        };

        Ok(ConvertedFile {
            filename: format!("{}.{}", file.base_name(), format.extension()),
            media_type: format.media_type(),
            bytes,
        })
    }
}

fn column_types(dataset: &Dataset) -> OrderedMap<ColumnType> {
    dataset
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.dtype))
        .collect()
}
