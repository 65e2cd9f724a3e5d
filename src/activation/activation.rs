use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "sigmoid")]
    Sigmoid,
    #[serde(rename = "tanh")]
    Tanh,
    #[serde(rename = "identity")]
    Identity,
    /// Vector-valued: normalizes each row of a batch into a probability
    /// distribution. Only meaningful on the output layer, paired with
    /// cross-entropy.
    #[serde(rename = "softmax")]
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` has no scalar form and returns
    /// `x`; use `apply` for whole batches.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Identity | ActivationFunction::Softmax => x,
        }
    }

    /// Element-wise derivative at the pre-activation `x`.
    ///
    /// For `Softmax` the loss already returns the combined softmax +
    /// cross-entropy gradient (`predicted - expected`), so the Jacobian is
    /// not applied a second time.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::Identity | ActivationFunction::Softmax => 1.0,
        }
    }

    /// Applies the activation to a batch of pre-activations.
    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Softmax => {
                let mut out = z.clone();
                for r in 0..out.rows {
                    softmax_in_place(out.row_mut(r));
                }
                out
            }
            _ => z.map(|x| self.function(x)),
        }
    }
}

/// Numerically stable softmax (max-shifted).
fn softmax_in_place(row: &mut [f64]) {
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for x in row.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    for x in row.iter_mut() {
        *x /= sum;
    }
}
