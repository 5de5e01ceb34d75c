use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::data::record::{BenchmarkRecord, Kth};
use crate::error::DataQualityWarning;

/// Per-(array size, kth) statistics recomputed from raw trials.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedRow {
    pub array_size: u64,
    pub kth: Kth,
    pub mean_empirical_comparisons: f64,
    pub mean_running_time_micros: f64,
    pub expected_comparisons: f64,
    pub trials: usize,
}

/// Mean that does not depend on the order the values arrive in.
fn stable_mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let sorted: Vec<f64> = values.into_iter().sorted_by(|a, b| a.total_cmp(b)).collect();
    sorted.iter().sum::<f64>() / sorted.len() as f64
}

/// Group trials by `(array_size, kth)` and average them, logging data-quality warnings.
pub fn aggregate(records: &[BenchmarkRecord]) -> Vec<AggregatedRow> {
    let (rows, warnings) = aggregate_with_warnings(records);
    for w in &warnings {
        warn!("{}", w);
    }
    rows
}

/// As [`aggregate`], returning the warnings instead of logging them.
///
/// `Average` rows are dropped before grouping. Output is sorted by kth
/// (plot order) and then by ascending array size.
pub fn aggregate_with_warnings(
    records: &[BenchmarkRecord],
) -> (Vec<AggregatedRow>, Vec<DataQualityWarning>) {
    let mut warnings = Vec::new();

    let groups: HashMap<(u64, Kth), Vec<&BenchmarkRecord>> = records
        .iter()
        .filter(|r| !r.run.is_average())
        .into_group_map_by(|r| r.key());

    let sentinel_only: BTreeSet<(u64, Kth)> = records
        .iter()
        .filter(|r| r.run.is_average())
        .map(|r| r.key())
        .filter(|key| !groups.contains_key(key))
        .collect();
    for (array_size, kth) in sentinel_only {
        warnings.push(DataQualityWarning::OnlyAverageRows { array_size, kth });
    }

    let rows: Vec<AggregatedRow> = groups
        .into_iter()
        .sorted_by_key(|((size, kth), _)| (*kth, *size))
        .map(|((array_size, kth), members)| {
            // First encountered wins; the rest should agree.
            let expected = members[0].expected_comparisons;
            if let Some(other) = members
                .iter()
                .map(|r| r.expected_comparisons)
                .find(|e| *e != expected)
            {
                warnings.push(DataQualityWarning::NonUniformExpected {
                    array_size,
                    kth,
                    kept: expected,
                    other,
                });
            }
            let row = AggregatedRow {
                array_size,
                kth,
                mean_empirical_comparisons: stable_mean(members.iter().map(|r| r.empirical_comparisons)),
                mean_running_time_micros: stable_mean(members.iter().map(|r| r.running_time_micros)),
                expected_comparisons: expected,
                trials: members.len(),
            };
            debug!(
                array_size,
                kth = %kth,
                trials = row.trials,
                mean_comparisons = row.mean_empirical_comparisons,
                "aggregated group"
            );
            row
        })
        .collect();

    (rows, warnings)
}

/// Compare recomputed means against the upstream `Average` rows.
///
/// Returns one [`DataQualityWarning::AverageDrift`] per group whose upstream
/// comparison average differs from the recomputed mean by more than
/// `tolerance` (relative). Each is also logged.
pub fn reconcile(
    records: &[BenchmarkRecord],
    rows: &[AggregatedRow],
    tolerance: f64,
) -> Vec<DataQualityWarning> {
    let upstream: HashMap<(u64, Kth), f64> = records
        .iter()
        .filter(|r| r.run.is_average())
        .map(|r| (r.key(), r.empirical_comparisons))
        .collect();

    let drifts: Vec<DataQualityWarning> = rows
        .iter()
        .filter_map(|row| {
            let upstream = *upstream.get(&(row.array_size, row.kth))?;
            let recomputed = row.mean_empirical_comparisons;
            let scale = recomputed.abs().max(f64::EPSILON);
            ((upstream - recomputed).abs() / scale > tolerance).then_some(
                DataQualityWarning::AverageDrift {
                    array_size: row.array_size,
                    kth: row.kth,
                    upstream,
                    recomputed,
                },
            )
        })
        .collect();
    for d in &drifts {
        warn!("{}", d);
    }
    drifts
}
