use std::path::Path;

use tracing::{debug, info};

use crate::data::columnar::ColumnarTable;
use crate::data::record::{Algorithm, BenchmarkRecord, Kth, Run};
use crate::error::DataLoadError;

pub const COL_ARRAY_SIZE: &str = "ArraySize";
pub const COL_KTH: &str = "Kth";
pub const COL_RUN: &str = "Run";
pub const COL_EMPIRICAL: &str = "EmpiricalComparisons";
pub const COL_RUNNING_TIME: &str = "RunningTime(us)";
pub const COL_EXPECTED: &str = "ExpectedComparisons";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_ARRAY_SIZE,
    COL_KTH,
    COL_RUN,
    COL_EMPIRICAL,
    COL_RUNNING_TIME,
    COL_EXPECTED,
];

/// Benchmark records of one algorithm, in input order. Read-only once loaded.
#[derive(Clone, Debug)]
pub struct RecordStore {
    algorithm: Algorithm,
    records: Vec<BenchmarkRecord>,
}

impl RecordStore {
    pub fn from_records(algorithm: Algorithm, records: Vec<BenchmarkRecord>) -> Self {
        Self { algorithm, records }
    }

    /// Load a benchmark CSV for `algorithm`.
    pub fn load(algorithm: Algorithm, path: &Path) -> Result<Self, DataLoadError> {
        let table = ColumnarTable::read_csv(path)?;
        let records = records_from_table(&table)?;
        info!(
            algorithm = %algorithm,
            path = %path.display(),
            records = records.len(),
            "loaded benchmark data"
        );
        Ok(Self::from_records(algorithm, records))
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that are real trials, skipping upstream `Average` rows.
    pub fn trials(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records.iter().filter(|r| !r.run.is_average())
    }
}

/// Project the six required columns into records, row by row.
pub fn records_from_table(table: &ColumnarTable) -> Result<Vec<BenchmarkRecord>, DataLoadError> {
    // Resolve every column up front so a missing one is reported before any cell.
    for col in REQUIRED_COLUMNS {
        if table.df.column(col).is_err() {
            return Err(DataLoadError::MissingColumn {
                path: table.path.clone(),
                column: col.to_string(),
            });
        }
    }

    let sizes = table.column_i64(COL_ARRAY_SIZE)?;
    let kths = table.column_str(COL_KTH)?;
    let runs = table.column_str(COL_RUN)?;
    let empirical = table.column_f64(COL_EMPIRICAL)?;
    let times = table.column_f64(COL_RUNNING_TIME)?;
    let expected = table.column_f64(COL_EXPECTED)?;

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let array_size = u64::try_from(sizes[row])
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| table.invalid(row, COL_ARRAY_SIZE, "array size must be positive"))?;
        let kth: Kth = kths[row]
            .parse()
            .map_err(|_| table.invalid(row, COL_KTH, format!("unknown kth `{}`", kths[row])))?;
        let run: Run = runs[row]
            .parse()
            .map_err(|_| table.invalid(row, COL_RUN, format!("unknown run `{}`", runs[row])))?;
        for (col, value) in [
            (COL_EMPIRICAL, empirical[row]),
            (COL_RUNNING_TIME, times[row]),
            (COL_EXPECTED, expected[row]),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(table.invalid(row, col, format!("expected a non-negative number, got {}", value)));
            }
        }
        records.push(BenchmarkRecord {
            array_size,
            kth,
            run,
            empirical_comparisons: empirical[row],
            running_time_micros: times[row],
            expected_comparisons: expected[row],
        });
    }
    debug!(rows = records.len(), "parsed benchmark rows");
    Ok(records)
}
