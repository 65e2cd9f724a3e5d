use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use titanic_nn::config::{RunConfig, CONFIG_FILE};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = RunConfig::load_or_default(CONFIG_FILE)
        .with_context(|| format!("reading {CONFIG_FILE}"))?;
    info!(
        train = %config.train_path.display(),
        inference = %config.inference_path.display(),
        epochs = config.epochs,
        "starting run"
    );

    let summary = titanic_nn::run(&config).context("titanic run failed")?;

    println!("accuracyPerClass {}", serde_json::to_string_pretty(&summary.report)?);
    info!(
        rows = summary.submission_rows,
        output = %config.output_path.display(),
        "done"
    );
    Ok(())
}
