use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::plot::style::FigureStyle;

fn default_quick_select_csv() -> PathBuf {
    PathBuf::from("quick_selection_data.csv")
}

fn default_lazy_select_csv() -> PathBuf {
    PathBuf::from("lazy_selection_data.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_comparisons_png() -> String {
    "comparison_plots.png".to_string()
}

fn default_running_time_png() -> String {
    "time_comparison_plots.png".to_string()
}

// 8x8 inch at 300 DPI
fn default_px() -> u32 {
    2400
}

fn default_instance_alpha() -> f64 {
    0.5
}

fn default_reconcile_tolerance() -> f64 {
    0.01
}

/// Input/output locations and rendering knobs. Every field has a default,
/// so an empty JSON object is a valid config.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_quick_select_csv")]
    pub quick_select_csv: PathBuf,
    #[serde(default = "default_lazy_select_csv")]
    pub lazy_select_csv: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_comparisons_png")]
    pub comparisons_png: String,
    #[serde(default = "default_running_time_png")]
    pub running_time_png: String,
    #[serde(default = "default_px")]
    pub width_px: u32,
    #[serde(default = "default_px")]
    pub height_px: u32,
    #[serde(default = "default_instance_alpha")]
    pub instance_alpha: f64,
    // relative drift allowed between an upstream Average row and the recomputed mean
    #[serde(default = "default_reconcile_tolerance")]
    pub reconcile_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quick_select_csv: default_quick_select_csv(),
            lazy_select_csv: default_lazy_select_csv(),
            output_dir: default_output_dir(),
            comparisons_png: default_comparisons_png(),
            running_time_png: default_running_time_png(),
            width_px: default_px(),
            height_px: default_px(),
            instance_alpha: default_instance_alpha(),
            reconcile_tolerance: default_reconcile_tolerance(),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(ConfigError::Invalid {
                field: "width_px/height_px",
                reason: "dimensions must be positive".into(),
            });
        }
        if !(self.instance_alpha > 0.0 && self.instance_alpha <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "instance_alpha",
                reason: format!("{} is outside (0, 1]", self.instance_alpha),
            });
        }
        if !(self.reconcile_tolerance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "reconcile_tolerance",
                reason: format!("{} is negative", self.reconcile_tolerance),
            });
        }
        if self.comparisons_png == self.running_time_png {
            return Err(ConfigError::Invalid {
                field: "running_time_png",
                reason: "must differ from comparisons_png".into(),
            });
        }
        Ok(())
    }

    pub fn comparisons_path(&self) -> PathBuf {
        self.output_dir.join(&self.comparisons_png)
    }

    pub fn running_time_path(&self) -> PathBuf {
        self.output_dir.join(&self.running_time_png)
    }

    pub fn figure_style(&self) -> FigureStyle {
        FigureStyle {
            width_px: self.width_px,
            height_px: self.height_px,
            instance_alpha: self.instance_alpha,
        }
    }
}
