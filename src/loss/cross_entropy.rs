use crate::math::matrix::Matrix;

/// Sparse categorical cross-entropy for use with a Softmax output layer.
/// Targets are class indices rather than one-hot rows.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Mean over the batch of `-log(predicted[i][label_i] + eps)`.
    pub fn loss(predicted: &Matrix, labels: &[usize]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let total: f64 = labels.iter().enumerate()
            .map(|(i, &label)| -(predicted.get(i, label) + EPS).ln())
            .sum();
        total / labels.len() as f64
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the logits,
    /// per sample: `predicted - one_hot(label)`.
    ///
    /// Not divided by the batch size; the training loop averages.
    pub fn derivative(predicted: &Matrix, labels: &[usize]) -> Matrix {
        let mut grad = predicted.clone();
        for (i, &label) in labels.iter().enumerate() {
            let p = grad.get(i, label);
            grad.set(i, label, p - 1.0);
        }
        grad
    }
}
