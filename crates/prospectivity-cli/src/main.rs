//! Synthesizes the demo survey layers, scores them and writes the 2x2 figure.
//!
//! Running with no arguments reproduces the reference run: seed 42, a 50x50
//! grid, and `prospectivity_demo.png` at 300 dpi in the working directory.

use anyhow::{Context, Result};
use clap::Parser;
use prospectivity_core::render::save_figure;
use prospectivity_core::summary::DemoSummary;
use prospectivity_core::{DemoConfig, Survey};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prospectivity-demo", about = "Synthetic mineral prospectivity demo")]
struct Args {
    /// Where to write the PNG figure.
    #[arg(long)]
    output: Option<String>,

    /// Seed for the layer generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Print a JSON summary of the run to stdout.
    #[arg(long)]
    summary: bool,
}

impl Args {
    fn into_config(self) -> (DemoConfig, bool) {
        let mut config = DemoConfig::default();
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        (config, self.summary)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (config, print_summary) = Args::parse().into_config();
    info!(
        seed = config.seed,
        shape = %config.shape,
        output = %config.output_path,
        "starting prospectivity demo"
    );

    let survey = Survey::generate(&config).context("failed to generate survey")?;
    save_figure(&survey, &config.render, &config.output_path)
        .with_context(|| format!("failed to save figure to {}", config.output_path))?;
    info!("interactive display is not supported; figure written to file only");

    if print_summary {
        let summary = DemoSummary::from_survey(&survey, &config);
        println!("{}", summary.to_json_pretty()?);
    }
    Ok(())
}
