use crate::math::matrix::Matrix;

/// Mean-squared error against one-hot targets built from class indices.
pub struct MseLoss;

impl MseLoss {
    /// Mean over the batch of mean((predicted - one_hot)²).
    pub fn loss(predicted: &Matrix, labels: &[usize]) -> f64 {
        if labels.is_empty() || predicted.cols == 0 {
            return 0.0;
        }
        let total: f64 = labels.iter().enumerate()
            .map(|(i, &label)| {
                predicted.row(i).iter().enumerate()
                    .map(|(c, p)| (p - one_hot(c, label)).powi(2))
                    .sum::<f64>() / predicted.cols as f64
            })
            .sum();
        total / labels.len() as f64
    }

    /// Per-sample gradient of the row mean: `2 * (predicted - one_hot) / cols`.
    ///
    /// Not divided by the batch size; the training loop averages.
    pub fn derivative(predicted: &Matrix, labels: &[usize]) -> Matrix {
        let mut grad = predicted.clone();
        let scale = 2.0 / predicted.cols.max(1) as f64;
        for (i, &label) in labels.iter().enumerate() {
            for (c, g) in grad.row_mut(i).iter_mut().enumerate() {
                *g = scale * (*g - one_hot(c, label));
            }
        }
        grad
    }
}

fn one_hot(class: usize, label: usize) -> f64 {
    if class == label { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_has_zero_loss() {
        let p = Matrix::row_vector(&[0.0, 1.0]);
        assert_eq!(MseLoss::loss(&p, &[1]), 0.0);
        assert_eq!(MseLoss::derivative(&p, &[1]).as_slice(), &[0.0, 0.0]);
        assert_eq!(MseLoss::loss(&p, &[0]), 1.0);
    }

    #[test]
    fn derivative_is_scaled_by_output_width() {
        let p = Matrix::row_vector(&[0.5, 0.25, 0.25, 0.0]);
        let g = MseLoss::derivative(&p, &[0]);
        assert_eq!(g.as_slice(), &[-0.25, 0.125, 0.125, 0.0]);
    }
}
