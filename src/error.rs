use std::path::PathBuf;

use thiserror::Error;

use crate::data::record::Kth;

/// Input could not be turned into benchmark records. Fatal, raised before rendering.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("benchmark data not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to parse {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },
    #[error("{}: missing required column `{column}`", .path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("{}: row {row}: invalid value in column `{column}`: {reason}", .path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        reason: String,
    },
}

/// A figure could not be drawn or written. Fatal.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot create output directory {}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to draw {}: {message}", .path.display())]
    Draw { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Recoverable data-quality condition. Logged, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataQualityWarning {
    #[error("group (size={array_size}, kth={kth}) has only Average rows; skipped")]
    OnlyAverageRows { array_size: u64, kth: Kth },
    #[error("group (size={array_size}, kth={kth}) has non-uniform expected comparisons: kept {kept}, saw {other}")]
    NonUniformExpected {
        array_size: u64,
        kth: Kth,
        kept: f64,
        other: f64,
    },
    #[error("size {array_size} has conflicting expected comparisons across kth; kept {kept} from {source_kth}")]
    ConflictingExpected {
        array_size: u64,
        kept: f64,
        source_kth: Kth,
    },
    #[error("size {array_size}: stored expected comparisons {stored} differ from formula value {derived}")]
    FormulaMismatch {
        array_size: u64,
        stored: f64,
        derived: f64,
    },
    #[error("group (size={array_size}, kth={kth}): upstream average {upstream} drifts from recomputed mean {recomputed}")]
    AverageDrift {
        array_size: u64,
        kth: Kth,
        upstream: f64,
        recomputed: f64,
    },
}
