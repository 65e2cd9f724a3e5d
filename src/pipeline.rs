use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::config::RunConfig;
use crate::data::batch::batch_samples;
use crate::data::csv::load_labeled_csv;
use crate::data::passenger::columns;
use crate::error::Result;
use crate::eval::report::{evaluate, ClassAccuracyReport};
use crate::inference::driver::InferenceDriver;
use crate::inference::predictor::Classifier;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;

/// What a completed run produced besides the submission file.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub history: Vec<EpochStats>,
    pub report: ClassAccuracyReport,
    pub submission_rows: usize,
}

/// Trains a fresh network from `config.network` and runs the pipeline.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = Network::from_spec(&config.network, &mut rng)?;

    let summary = run_with(config, &mut network)?;

    if let Some(model_path) = &config.model_path {
        network.save_json(model_path)?;
        info!(path = %model_path.display(), "model saved");
    }
    Ok(summary)
}

/// Load → batch → fit → evaluate → predict, with any classifier.
pub fn run_with<C: Classifier + ?Sized>(config: &RunConfig, classifier: &mut C) -> Result<RunSummary> {
    let training = load_labeled_csv(&config.train_path, Some(columns::SURVIVED))?;
    let validation = match &config.validation_path {
        Some(path) => Some(load_labeled_csv(path, Some(columns::SURVIVED))?),
        None => None,
    };
    info!(
        training = training.len(),
        validation = validation.as_ref().map(|v| v.len()).unwrap_or(0),
        "datasets loaded"
    );

    let batches = batch_samples(&training, config.batch_size)?;
    info!(epochs = config.epochs, batches = batches.len(), "training");
    let history = classifier.fit(&batches, &config.train_config())?;
    if let Some(last) = history.last() {
        info!(
            epochs = history.len(),
            loss = last.train_loss,
            accuracy = last.train_accuracy,
            "training finished"
        );
    }

    let report = evaluate(&*classifier, &training, validation.as_deref(), config.accuracy_mode)?;
    for (class, acc) in report.iter() {
        info!(class, training = acc.training, validation = ?acc.validation, "class accuracy");
    }

    let submission_rows = InferenceDriver::new(&*classifier)
        .run(&config.inference_path, &config.output_path)?;

    Ok(RunSummary { history, report, submission_rows })
}
