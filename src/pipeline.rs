use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::data::loader::RecordStore;
use crate::data::record::Algorithm;
use crate::error::{PipelineError, RenderError};
use crate::metrics::aggregate::{aggregate, reconcile, AggregatedRow};
use crate::plot::render::{render_figure, Figure};
use crate::plot::series::{build_panel, Metric};
use crate::report::summary_table;

/// A loaded store together with its freshly aggregated rows.
pub struct Aggregated {
    pub store: RecordStore,
    pub rows: Vec<AggregatedRow>,
}

impl Aggregated {
    pub fn new(store: RecordStore, tolerance: f64) -> Self {
        let rows = aggregate(store.records());
        if store.is_empty() {
            warn!(algorithm = %store.algorithm(), "no benchmark records; panel will be empty");
        }
        reconcile(store.records(), &rows, tolerance);
        info!(
            algorithm = %store.algorithm(),
            groups = rows.len(),
            "aggregated benchmark data"
        );
        Self { store, rows }
    }
}

/// Load both algorithms' CSVs. Any failure aborts before rendering.
pub fn load_all(config: &PipelineConfig) -> Result<Vec<Aggregated>, PipelineError> {
    let sources = [
        (Algorithm::QuickSelect, &config.quick_select_csv),
        (Algorithm::LazySelect, &config.lazy_select_csv),
    ];
    let mut out = Vec::with_capacity(sources.len());
    for (algorithm, path) in sources {
        let store = RecordStore::load(algorithm, path)?;
        out.push(Aggregated::new(store, config.reconcile_tolerance));
    }
    Ok(out)
}

/// One figure per metric, one panel per algorithm in the order given.
pub fn build_figure(metric: Metric, data: &[Aggregated]) -> Figure {
    Figure {
        metric,
        panels: data
            .iter()
            .map(|d| build_panel(d.store.algorithm(), metric, d.store.records(), &d.rows))
            .collect(),
    }
}

/// Render both figures from already aggregated data. Returns the written paths.
pub fn render_all(config: &PipelineConfig, data: &[Aggregated]) -> Result<Vec<PathBuf>, PipelineError> {
    fs::create_dir_all(&config.output_dir).map_err(|source| RenderError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;
    let style = config.figure_style();
    let mut written = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let path = match metric {
            Metric::Comparisons => config.comparisons_path(),
            Metric::RunningTime => config.running_time_path(),
        };
        render_figure(&build_figure(metric, data), &path, &style)?;
        written.push(path);
    }
    Ok(written)
}

/// Load, aggregate and render both comparison figures.
pub fn run(config: &PipelineConfig) -> Result<Vec<PathBuf>, PipelineError> {
    config.validate()?;
    let data = load_all(config)?;
    render_all(config, &data)
}

/// Load and aggregate only, returning the summary as printable text.
pub fn summarize(config: &PipelineConfig) -> Result<String, PipelineError> {
    config.validate()?;
    let data = load_all(config)?;
    let groups: Vec<(&RecordStore, &[AggregatedRow])> =
        data.iter().map(|d| (&d.store, d.rows.as_slice())).collect();
    Ok(summary_table(&groups).to_string())
}
