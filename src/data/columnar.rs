use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::error::DataLoadError;

/// A CSV file held as a Polars DataFrame, with typed column accessors.
#[derive(Clone)]
pub struct ColumnarTable {
    pub path: PathBuf,
    pub df: DataFrame,
}

impl ColumnarTable {
    pub fn new(path: impl Into<PathBuf>, df: DataFrame) -> Self {
        Self { path: path.into(), df }
    }

    /// Read a headed CSV file. The whole file is scanned for schema
    /// inference so a late `Average` row does not break a numeric guess.
    pub fn read_csv(path: &Path) -> Result<Self, DataLoadError> {
        if !path.is_file() {
            return Err(DataLoadError::NotFound(path.to_path_buf()));
        }
        let csv_err = |source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let df = CsvReader::from_path(path)
            .map_err(csv_err)?
            .has_header(true)
            .infer_schema(None)
            .finish()
            .map_err(csv_err)?;
        Ok(Self::new(path, df))
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn column(&self, col: &str) -> Result<&Series, DataLoadError> {
        self.df
            .column(col)
            .map_err(|_| DataLoadError::MissingColumn {
                path: self.path.clone(),
                column: col.to_string(),
            })
    }

    fn cast(&self, col: &str, dtype: &DataType) -> Result<Series, DataLoadError> {
        self.column(col)?
            .cast(dtype)
            .map_err(|source| DataLoadError::Csv {
                path: self.path.clone(),
                source,
            })
    }

    pub(crate) fn invalid(&self, row: usize, col: &str, reason: impl Into<String>) -> DataLoadError {
        DataLoadError::InvalidValue {
            path: self.path.clone(),
            row,
            column: col.to_string(),
            reason: reason.into(),
        }
    }

    /// Column as `f64`. Nulls and unparsable cells are errors.
    pub fn column_f64(&self, col: &str) -> Result<Vec<f64>, DataLoadError> {
        let series = self.cast(col, &DataType::Float64)?;
        let ca = series.f64().map_err(|source| DataLoadError::Csv {
            path: self.path.clone(),
            source,
        })?;
        ca.into_iter()
            .enumerate()
            .map(|(row, v)| v.ok_or_else(|| self.invalid(row, col, "missing or non-numeric")))
            .collect()
    }

    /// Column as `i64`. Nulls and unparsable cells are errors.
    pub fn column_i64(&self, col: &str) -> Result<Vec<i64>, DataLoadError> {
        let series = self.cast(col, &DataType::Int64)?;
        let ca = series.i64().map_err(|source| DataLoadError::Csv {
            path: self.path.clone(),
            source,
        })?;
        ca.into_iter()
            .enumerate()
            .map(|(row, v)| v.ok_or_else(|| self.invalid(row, col, "missing or non-integer")))
            .collect()
    }

    /// Column rendered as text, whatever type the reader inferred for it.
    pub fn column_str(&self, col: &str) -> Result<Vec<String>, DataLoadError> {
        let series = self.cast(col, &DataType::Utf8)?;
        let ca = series.utf8().map_err(|source| DataLoadError::Csv {
            path: self.path.clone(),
            source,
        })?;
        ca.into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.map(str::to_string)
                    .ok_or_else(|| self.invalid(row, col, "missing"))
            })
            .collect()
    }
}
