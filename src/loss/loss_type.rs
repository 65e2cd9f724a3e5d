use serde::{Serialize, Deserialize};

use crate::loss::{cross_entropy::CrossEntropyLoss, mse::MseLoss};
use crate::math::matrix::Matrix;

/// Selects which loss function the training loop uses.
///
/// - `CrossEntropy`: sparse categorical cross-entropy; pair with Softmax output.
/// - `Mse`         : mean-squared error against one-hot targets; any output but Softmax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    CrossEntropy,
    Mse,
}

impl LossType {
    pub fn loss(&self, predicted: &Matrix, labels: &[usize]) -> f64 {
        match self {
            LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, labels),
            LossType::Mse          => MseLoss::loss(predicted, labels),
        }
    }

    pub fn derivative(&self, predicted: &Matrix, labels: &[usize]) -> Matrix {
        match self {
            LossType::CrossEntropy => CrossEntropyLoss::derivative(predicted, labels),
            LossType::Mse          => MseLoss::derivative(predicted, labels),
        }
    }
}
