pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub mod data {
    pub mod columnar;
    pub mod loader;
    pub mod record;
}

pub mod metrics {
    pub mod aggregate;
}

pub mod plot {
    pub mod render;
    pub mod series;
    pub mod style;
}
