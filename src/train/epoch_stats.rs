use serde::{Serialize, Deserialize};

/// Per-epoch training statistics returned by `train_loop` and logged at
/// debug level as each epoch completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Fraction of samples whose arg-max output matched the label, measured
    /// on the forward passes of this epoch.
    pub train_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
