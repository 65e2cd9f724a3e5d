use std::time::Instant;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use crate::data::batch::LabeledBatch;
use crate::error::{Result, TitanicError};
use crate::eval::accuracy::argmax;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` passes over `batches` and returns
/// the stats of every completed epoch.
///
/// Each batch is one optimizer step with gradients averaged over the batch.
///
/// # Errors
/// Fails before touching the weights if there are no batches, a batch width
/// differs from the network input, or a label is out of range.
pub fn train_loop(
    network: &mut Network,
    batches: &[LabeledBatch],
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    check_batches(network, batches)?;

    let mut optimizer = config.optimizer.build();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let total_samples: usize = batches.iter().map(|b| b.len()).sum();
    let mut order: Vec<usize> = (0..batches.len()).collect();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();
        if config.shuffle {
            order.shuffle(&mut rng);
        }

        let mut total_loss = 0.0;
        let mut correct = 0usize;

        for &b in &order {
            let batch = &batches[b];
            let n = batch.len() as f64;

            let output = network.forward(batch.inputs.clone());
            total_loss += network.loss.loss(&output, &batch.labels) * n;
            correct += output.iter_rows().zip(batch.labels.iter())
                .filter(|(row, &label)| argmax(row) == Some(label))
                .count();

            let delta = network.loss.derivative(&output, &batch.labels).scale(1.0 / n);
            let grads = network.backward(delta);
            for (i, (w_grad, b_grad)) in grads.iter().enumerate() {
                optimizer.step(i, &mut network.layers[i], w_grad, b_grad);
            }
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: total_loss / total_samples as f64,
            train_accuracy: correct as f64 / total_samples as f64,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(
            epoch = stats.epoch,
            total = stats.total_epochs,
            loss = stats.train_loss,
            accuracy = stats.train_accuracy,
            elapsed_ms = stats.elapsed_ms,
            "epoch complete"
        );
        history.push(stats);
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_batches(network: &Network, batches: &[LabeledBatch]) -> Result<()> {
    if batches.iter().all(|b| b.is_empty()) {
        return Err(TitanicError::Config("no training samples".into()));
    }
    let width = network.input_size();
    let classes = network.output_size();
    for batch in batches {
        if batch.inputs.cols != width {
            return Err(TitanicError::shape(
                format!("{width} feature columns"),
                format!("{} feature columns", batch.inputs.cols),
            ));
        }
        if let Some(&label) = batch.labels.iter().find(|&&l| l >= classes) {
            return Err(TitanicError::InvalidLabel { label, num_classes: classes });
        }
    }
    Ok(())
}
