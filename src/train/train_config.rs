use crate::optim::OptimizerKind;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`   : total number of full passes over the batches
/// - `optimizer`: optimizer kind; fresh state is built per run
/// - `shuffle`  : visit batches in a new random order each epoch
/// - `seed`     : seeds the shuffle RNG; `None` draws from entropy
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub optimizer: OptimizerKind,
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the default optimizer and no shuffling.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            optimizer: OptimizerKind::default(),
            shuffle: false,
            seed: None,
        }
    }
}
