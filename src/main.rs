use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use select_plots::config::PipelineConfig;
use select_plots::pipeline;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: select_plots [plot|summary] [CONFIG.json]";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&String>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::from_file(Path::new(p))
            .with_context(|| format!("loading config {}", p)),
        None => Ok(PipelineConfig::default()),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("plot");

    match command {
        "plot" => {
            let config = load_config(args.get(2))?;
            for path in pipeline::run(&config)? {
                println!("Wrote {}", path.display());
            }
        }
        "summary" => {
            let config = load_config(args.get(2))?;
            println!("{}", pipeline::summarize(&config)?);
        }
        "-h" | "--help" => println!("{}", USAGE),
        other => bail!("unknown command `{}`\n{}", other, USAGE),
    }

    Ok(())
}
