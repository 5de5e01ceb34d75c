use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::warn;

use crate::data::record::{Algorithm, BenchmarkRecord, Kth};
use crate::error::DataQualityWarning;
use crate::metrics::aggregate::AggregatedRow;

/// Relative tolerance when checking stored expected values against the formula.
/// The driver prints six significant digits, so stored values are off by up to 5e-6.
const FORMULA_TOLERANCE: f64 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Comparisons,
    RunningTime,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Comparisons, Metric::RunningTime];

    pub fn of_record(self, r: &BenchmarkRecord) -> f64 {
        match self {
            Metric::Comparisons => r.empirical_comparisons,
            Metric::RunningTime => r.running_time_micros,
        }
    }

    pub fn of_row(self, r: &AggregatedRow) -> f64 {
        match self {
            Metric::Comparisons => r.mean_empirical_comparisons,
            Metric::RunningTime => r.mean_running_time_micros,
        }
    }

    /// Only comparison counts have a closed-form prediction.
    pub fn has_theoretical_model(self) -> bool {
        matches!(self, Metric::Comparisons)
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Metric::Comparisons => "Number of Comparisons",
            Metric::RunningTime => "Running Time (us)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    /// Raw trials, drawn as an unconnected scatter.
    Instance,
    /// Per-size means, drawn as a connected line.
    Average,
    /// Theoretical prediction, drawn as a dashed line.
    Expected,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub kth: Option<Kth>,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Everything drawn in one panel: one algorithm, one metric.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSeries {
    pub algorithm: Algorithm,
    pub metric: Metric,
    pub instances: Vec<Series>,
    pub averages: Vec<Series>,
    pub expected: Option<Series>,
}

impl PanelSeries {
    /// Every point drawn in the panel, used for axis ranges.
    pub fn all_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.instances
            .iter()
            .chain(self.averages.iter())
            .chain(self.expected.iter())
            .flat_map(|s| s.points.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.all_points().next().is_none()
    }
}

/// Raw trials of one kth, in input order.
pub fn instance_series(records: &[BenchmarkRecord], kth: Kth, metric: Metric) -> Series {
    Series {
        name: format!("{} Instances", kth),
        kind: SeriesKind::Instance,
        kth: Some(kth),
        points: records
            .iter()
            .filter(|r| r.kth == kth && !r.run.is_average())
            .map(|r| (r.array_size as f64, metric.of_record(r)))
            .collect(),
    }
}

/// Aggregated means of one kth, sorted by array size so the line is monotone in x.
pub fn average_series(rows: &[AggregatedRow], kth: Kth, metric: Metric) -> Series {
    Series {
        name: format!("{} Average", kth),
        kind: SeriesKind::Average,
        kth: Some(kth),
        points: rows
            .iter()
            .filter(|r| r.kth == kth)
            .sorted_by_key(|r| r.array_size)
            .map(|r| (r.array_size as f64, metric.of_row(r)))
            .collect(),
    }
}

/// One expected value per distinct array size, sorted by size.
///
/// Plotted values come from the algorithm's formula. Stored values are only
/// checked: kth groups disagreeing for a size are reported against the
/// alphabetically smallest kth label, and that value is compared with the
/// formula.
pub fn expected_points(
    algorithm: Algorithm,
    rows: &[AggregatedRow],
) -> (Vec<(f64, f64)>, Vec<DataQualityWarning>) {
    let mut by_size: BTreeMap<u64, Vec<&AggregatedRow>> = BTreeMap::new();
    for row in rows {
        by_size.entry(row.array_size).or_default().push(row);
    }

    let mut warnings = Vec::new();
    let points = by_size
        .into_iter()
        .filter_map(|(size, group)| {
            let chosen = group.iter().min_by_key(|r| r.kth.label())?;
            let distinct: BTreeSet<OrderedFloat<f64>> = group
                .iter()
                .map(|r| OrderedFloat(r.expected_comparisons))
                .collect();
            if distinct.len() > 1 {
                warnings.push(DataQualityWarning::ConflictingExpected {
                    array_size: size,
                    kept: chosen.expected_comparisons,
                    source_kth: chosen.kth,
                });
            }
            let derived = algorithm.expected_comparisons(size);
            let stored = chosen.expected_comparisons;
            if (stored - derived).abs() > FORMULA_TOLERANCE * derived.abs().max(1.0) {
                warnings.push(DataQualityWarning::FormulaMismatch {
                    array_size: size,
                    stored,
                    derived,
                });
            }
            Some((size as f64, derived))
        })
        .collect();
    (points, warnings)
}

pub fn expected_series(algorithm: Algorithm, rows: &[AggregatedRow]) -> Series {
    let (points, warnings) = expected_points(algorithm, rows);
    for w in &warnings {
        warn!(algorithm = %algorithm, "{}", w);
    }
    Series {
        name: format!("Expected Comparisons ({})", algorithm.formula()),
        kind: SeriesKind::Expected,
        kth: None,
        points,
    }
}

/// Assemble the series for one panel, in kth plot order.
pub fn build_panel(
    algorithm: Algorithm,
    metric: Metric,
    records: &[BenchmarkRecord],
    rows: &[AggregatedRow],
) -> PanelSeries {
    PanelSeries {
        algorithm,
        metric,
        instances: Kth::ALL
            .iter()
            .map(|&k| instance_series(records, k, metric))
            .collect(),
        averages: Kth::ALL
            .iter()
            .map(|&k| average_series(rows, k, metric))
            .collect(),
        expected: metric
            .has_theoretical_model()
            .then(|| expected_series(algorithm, rows)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Run;
    use crate::metrics::aggregate::aggregate;

    fn rec(algorithm: Algorithm, size: u64, kth: Kth, run: Run, comps: f64) -> BenchmarkRecord {
        BenchmarkRecord {
            array_size: size,
            kth,
            run,
            empirical_comparisons: comps,
            running_time_micros: comps / 10.0,
            expected_comparisons: algorithm.expected_comparisons(size),
        }
    }

    fn sample(algorithm: Algorithm) -> Vec<BenchmarkRecord> {
        let mut out = Vec::new();
        for size in [100_000u64, 1000, 10_000] {
            for kth in [Kth::Median, Kth::First, Kth::P25] {
                out.push(rec(algorithm, size, kth, Run::Trial(1), size as f64 * 2.0));
                out.push(rec(algorithm, size, kth, Run::Trial(2), size as f64 * 3.0));
                out.push(rec(algorithm, size, kth, Run::Average, 0.0));
            }
        }
        out
    }

    #[test]
    fn instance_series_skips_sentinel_rows() {
        let records = sample(Algorithm::QuickSelect);
        let s = instance_series(&records, Kth::P25, Metric::Comparisons);
        assert_eq!(s.points.len(), 6);
        assert!(s.points.iter().all(|(_, y)| *y > 0.0));
        assert_eq!(s.name, "25% Instances");
    }

    #[test]
    fn average_series_is_sorted_by_size() {
        let rows = aggregate(&sample(Algorithm::LazySelect));
        let s = average_series(&rows, Kth::Median, Metric::RunningTime);
        let xs: Vec<f64> = s.points.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![1000.0, 10_000.0, 100_000.0]);
        assert_eq!(s.points[0].1, 250.0);
    }

    #[test]
    fn expected_series_matches_formula() {
        for (algorithm, at_1000) in [(Algorithm::QuickSelect, 3386.0), (Algorithm::LazySelect, 2000.0)] {
            let rows = aggregate(&sample(algorithm));
            let (points, warnings) = expected_points(algorithm, &rows);
            assert!(warnings.is_empty());
            assert_eq!(points.len(), 3);
            assert_eq!(points[0].0, 1000.0);
            assert!((points[0].1 - at_1000).abs() < 1e-6);
            for (x, y) in points {
                assert!((y - algorithm.comparison_constant() * x).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn conflicting_expected_picks_smallest_label() {
        let rows = vec![
            AggregatedRow {
                array_size: 10,
                kth: Kth::First,
                mean_empirical_comparisons: 1.0,
                mean_running_time_micros: 1.0,
                expected_comparisons: 20.0,
                trials: 1,
            },
            AggregatedRow {
                array_size: 10,
                kth: Kth::P25,
                mean_empirical_comparisons: 1.0,
                mean_running_time_micros: 1.0,
                expected_comparisons: 99.0,
                trials: 1,
            },
        ];
        let (points, warnings) = expected_points(Algorithm::LazySelect, &rows);
        assert_eq!(points, vec![(10.0, 20.0)]);
        assert!(warnings.contains(&DataQualityWarning::ConflictingExpected {
            array_size: 10,
            kept: 99.0,
            source_kth: Kth::P25,
        }));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, DataQualityWarning::FormulaMismatch { .. })));
    }

    #[test]
    fn printed_expected_values_plot_the_formula() {
        // 3.386 * 5120000 written with six significant digits.
        let rows = vec![AggregatedRow {
            array_size: 5_120_000,
            kth: Kth::First,
            mean_empirical_comparisons: 1.5e7,
            mean_running_time_micros: 900.0,
            expected_comparisons: 1.73363e7,
            trials: 1,
        }];
        let (points, warnings) = expected_points(Algorithm::QuickSelect, &rows);
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(
            points,
            vec![(5_120_000.0, Algorithm::QuickSelect.expected_comparisons(5_120_000))]
        );
        assert!((points[0].1 - 17_336_320.0).abs() < 1e-6);
    }

    #[test]
    fn running_time_panel_has_no_expected_line() {
        let records = sample(Algorithm::QuickSelect);
        let rows = aggregate(&records);
        let panel = build_panel(Algorithm::QuickSelect, Metric::RunningTime, &records, &rows);
        assert!(panel.expected.is_none());
        let panel = build_panel(Algorithm::QuickSelect, Metric::Comparisons, &records, &rows);
        let expected = panel.expected.unwrap();
        assert_eq!(expected.name, "Expected Comparisons (3.386 * n)");
        assert_eq!(panel.instances.len(), 3);
        assert_eq!(panel.averages[0].kth, Some(Kth::First));
    }

    #[test]
    fn empty_store_gives_empty_panel() {
        let panel = build_panel(Algorithm::LazySelect, Metric::Comparisons, &[], &[]);
        assert!(panel.is_empty());
        assert!(panel.instances.iter().all(Series::is_empty));
        assert!(panel.averages.iter().all(Series::is_empty));
    }
}
