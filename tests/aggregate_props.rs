use proptest::prelude::*;

use select_plots::data::record::{Algorithm, BenchmarkRecord, Kth, Run};
use select_plots::metrics::aggregate::aggregate;
use select_plots::plot::series::{average_series, expected_points, Metric};

fn kth_strategy() -> impl Strategy<Value = Kth> {
    prop_oneof![Just(Kth::First), Just(Kth::P25), Just(Kth::Median)]
}

fn record_strategy(algorithm: Algorithm) -> impl Strategy<Value = BenchmarkRecord> {
    (
        prop::sample::select(vec![10u64, 100, 1000, 10_000, 100_000]),
        kth_strategy(),
        prop_oneof![4 => (1u32..200).prop_map(Run::Trial), 1 => Just(Run::Average)],
        0.0f64..1e6,
        0.0f64..1e4,
    )
        .prop_map(move |(n, kth, run, comps, time)| BenchmarkRecord {
            array_size: n,
            kth,
            run,
            empirical_comparisons: comps,
            running_time_micros: time,
            expected_comparisons: algorithm.expected_comparisons(n),
        })
}

proptest! {
    #[test]
    fn shuffling_does_not_change_aggregation(
        (records, shuffled) in prop::collection::vec(record_strategy(Algorithm::QuickSelect), 0..80)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        prop_assert_eq!(aggregate(&records), aggregate(&shuffled));
    }

    #[test]
    fn means_only_cover_trials(records in prop::collection::vec(record_strategy(Algorithm::LazySelect), 0..60)) {
        for row in aggregate(&records) {
            let members: Vec<f64> = records
                .iter()
                .filter(|r| r.key() == (row.array_size, row.kth) && !r.run.is_average())
                .map(|r| r.empirical_comparisons)
                .collect();
            prop_assert_eq!(row.trials, members.len());
            let mean = members.iter().sum::<f64>() / members.len() as f64;
            prop_assert!((row.mean_empirical_comparisons - mean).abs() <= 1e-9 * mean.abs().max(1.0));
        }
    }

    #[test]
    fn average_series_monotone_and_expected_exact(records in prop::collection::vec(record_strategy(Algorithm::LazySelect), 0..60)) {
        let rows = aggregate(&records);
        for kth in Kth::ALL {
            let s = average_series(&rows, kth, Metric::Comparisons);
            prop_assert!(s.points.windows(2).all(|w| w[0].0 < w[1].0));
        }
        let (points, warnings) = expected_points(Algorithm::LazySelect, &rows);
        prop_assert!(warnings.is_empty());
        prop_assert!(points.windows(2).all(|w| w[0].0 < w[1].0));
        for (x, y) in points {
            prop_assert!((y - 2.0 * x).abs() < 1e-9);
        }
    }
}
