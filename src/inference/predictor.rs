use crate::data::batch::LabeledBatch;
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::train::{epoch_stats::EpochStats, train_config::TrainConfig};

/// Anything that maps a batch of feature rows to class-probability rows.
pub trait Predictor {
    /// Width of every output row.
    fn num_classes(&self) -> usize;

    /// One probability row per input row.
    fn predict(&self, inputs: &Matrix) -> Result<Matrix>;
}

/// A predictor that can be trained on a dataset of labelled batches.
pub trait Classifier: Predictor {
    fn fit(&mut self, batches: &[LabeledBatch], config: &TrainConfig) -> Result<Vec<EpochStats>>;
}
