use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, Table};

use crate::data::loader::RecordStore;
use crate::metrics::aggregate::AggregatedRow;

/// Total measured running time over raw trials, in seconds.
pub fn total_running_time_secs(store: &RecordStore) -> f64 {
    store.trials().map(|r| r.running_time_micros).sum::<f64>() / 1_000_000.0
}

/// Console table of aggregated rows for each algorithm, with a totals line per algorithm.
pub fn summary_table(groups: &[(&RecordStore, &[AggregatedRow])]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            "Algorithm",
            "ArraySize",
            "Kth",
            "Trials",
            "Mean comparisons",
            "Expected",
            "Ratio",
            "Mean time (us)",
        ]);

    for (store, rows) in groups {
        for row in rows.iter() {
            let ratio = if row.expected_comparisons > 0.0 {
                format!("{:.3}", row.mean_empirical_comparisons / row.expected_comparisons)
            } else {
                "-".to_string()
            };
            table.add_row(vec![
                store.algorithm().to_string(),
                row.array_size.to_string(),
                row.kth.to_string(),
                row.trials.to_string(),
                format!("{:.1}", row.mean_empirical_comparisons),
                format!("{:.1}", row.expected_comparisons),
                ratio,
                format!("{:.1}", row.mean_running_time_micros),
            ]);
        }
        table.add_row(vec![
            format!("{} total", store.algorithm()),
            String::new(),
            String::new(),
            store.trials().count().to_string(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.3} s", total_running_time_secs(store)),
        ]);
    }

    for idx in 1..8 {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::{Algorithm, BenchmarkRecord, Kth, Run};
    use crate::metrics::aggregate::aggregate;

    fn store() -> RecordStore {
        let rec = |run, comps, time| BenchmarkRecord {
            array_size: 1000,
            kth: Kth::Median,
            run,
            empirical_comparisons: comps,
            running_time_micros: time,
            expected_comparisons: 2000.0,
        };
        RecordStore::from_records(
            Algorithm::LazySelect,
            vec![
                rec(Run::Trial(1), 1900.0, 400_000.0),
                rec(Run::Trial(2), 2100.0, 600_000.0),
                rec(Run::Average, 2000.0, 500_000.0),
            ],
        )
    }

    #[test]
    fn total_time_skips_sentinel_rows() {
        assert!((total_running_time_secs(&store()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn table_lists_rows_and_totals() {
        let store = store();
        let rows = aggregate(store.records());
        let rendered = summary_table(&[(&store, rows.as_slice())]).to_string();
        assert!(rendered.contains("LazySelect"));
        assert!(rendered.contains("2000.0"));
        assert!(rendered.contains("1.000"));
        assert!(rendered.contains("LazySelect total"));
        assert!(rendered.contains("1.000 s"));
    }
}
