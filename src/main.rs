use anyhow::{Context, Result};
use breakout::cli::{Cli, OutputFormat};
use breakout::regression::{assess_suite, RegressionConfig};
use breakout::series::{read_series, series_name};
use clap::Parser;
use std::collections::HashMap;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<RegressionConfig> {
    let mut config = match &cli.config {
        Some(path) => RegressionConfig::from_file(path)?,
        None => RegressionConfig::default(),
    };

    if let Some(delta) = cli.delta {
        config.min_segment = delta;
    }

    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = load_config(&cli)?;

    let mut histories = HashMap::new();
    for path in &cli.histories {
        let name = series_name(path);
        let samples = read_series(path)?;
        tracing::debug!(name = %name, samples = samples.len(), "loaded history");
        if histories.insert(name.clone(), samples).is_some() {
            anyhow::bail!("duplicate benchmark name {:?} ({})", name, path.display());
        }
    }

    let suite = assess_suite(&histories, &config)?;

    match cli.format {
        OutputFormat::Text => print!("{}", suite.to_report_string()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&suite).context("Failed to serialize assessment")?
        ),
    }

    Ok(if suite.has_regression() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
