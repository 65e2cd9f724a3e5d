pub mod adam;
pub mod sgd;

use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, layers::dense::Layer};

pub use adam::Adam;
pub use sgd::Sgd;

/// Applies one update to a layer from its batch-averaged gradients.
/// `index` identifies the layer so stateful optimizers keep per-layer state.
pub trait Optimizer {
    fn step(&mut self, index: usize, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix);
}

/// Serializable optimizer choice; `build` creates fresh state for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd { learning_rate: f64 },
    Adam { learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64 },
}

impl OptimizerKind {
    pub fn build(&self) -> Box<dyn Optimizer> {
        match *self {
            OptimizerKind::Sgd { learning_rate } => Box::new(Sgd::new(learning_rate)),
            OptimizerKind::Adam { learning_rate, beta1, beta2, epsilon } => {
                Box::new(Adam::new(learning_rate, beta1, beta2, epsilon))
            }
        }
    }
}

impl Default for OptimizerKind {
    /// Adam with the usual defaults (lr 0.001, β1 0.9, β2 0.999, ε 1e-7).
    fn default() -> Self {
        OptimizerKind::Adam { learning_rate: 0.001, beta1: 0.9, beta2: 0.999, epsilon: 1e-7 }
    }
}
