use crate::{math::matrix::Matrix, layers::dense::Layer, optim::Optimizer};

/// Plain gradient descent.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, _index: usize, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix) {
        layer.apply_update(
            &weights_grad.scale(self.learning_rate),
            &biases_grad.scale(self.learning_rate),
        );
    }
}
