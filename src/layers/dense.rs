use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer operating on whole batches (one sample per row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    /// Shape `(input_size, size)`.
    pub weights: Matrix,
    /// Shape `(1, size)`.
    pub biases: Matrix,
    pub activator: ActivationFunction,
    // Forward caches for backprop; never persisted.
    #[serde(skip)]
    inputs: Matrix,
    #[serde(skip)]
    pre_neurons: Matrix,
}

impl Layer {
    /// He-initialized weights for ReLU, Xavier otherwise; zero biases.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(input_size, size, rng),
            _ => Matrix::xavier(input_size, size, rng),
        };

        Layer {
            size,
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation,
            inputs: Matrix::default(),
            pre_neurons: Matrix::default(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Inference-only forward pass; leaves the caches untouched.
    pub fn feed(&self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights).add_row(&self.biases);
        self.activator.apply(&z)
    }

    /// Training forward pass; caches input and z for `compute_gradients`.
    pub fn feed_from(&mut self, input: Matrix) -> Matrix {
        let z = (&input * &self.weights).add_row(&self.biases);
        let a = self.activator.apply(&z);
        self.inputs = input;
        self.pre_neurons = z;
        a
    }

    /// Backward step for the last batch seen by `feed_from`.
    ///
    /// `delta` is ∂L/∂a for this layer, one row per sample. Returns
    /// `(weights_grad, biases_grad, input_delta)` where the gradients are
    /// summed over the batch and `input_delta` is ∂L/∂a of the previous layer.
    pub fn compute_gradients(&self, delta: &Matrix) -> (Matrix, Matrix, Matrix) {
        // Derivative at z, not at a.
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        let layer_delta = delta.hadamard(&act_derivative);

        let weights_grad = &self.inputs.transpose() * &layer_delta;
        let biases_grad = layer_delta.sum_rows();
        let input_delta = &layer_delta * &self.weights.transpose();

        (weights_grad, biases_grad, input_delta)
    }

    /// Subtracts already-scaled update steps.
    pub fn apply_update(&mut self, weights_step: &Matrix, biases_step: &Matrix) {
        self.weights = &self.weights - weights_step;
        self.biases = &self.biases - biases_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn feed_matches_feed_from() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut layer = Layer::new(3, 2, ActivationFunction::ReLU, &mut rng);
        let batch = Matrix::from_rows(&[vec![0.5, -0.25], vec![1.0, 2.0]]).unwrap();
        let pure = layer.feed(&batch);
        let cached = layer.feed_from(batch);
        assert_eq!(pure, cached);
        assert_eq!((cached.rows, cached.cols), (2, 3));
    }

    #[test]
    fn gradients_have_parameter_shapes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut layer = Layer::new(4, 7, ActivationFunction::Sigmoid, &mut rng);
        layer.feed_from(Matrix::zeros(3, 7));
        let (w, b, d) = layer.compute_gradients(&Matrix::zeros(3, 4));
        assert_eq!((w.rows, w.cols), (7, 4));
        assert_eq!((b.rows, b.cols), (1, 4));
        assert_eq!((d.rows, d.cols), (3, 7));
    }

    #[test]
    fn identity_gradient_is_input_transpose_times_delta() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut layer = Layer::new(1, 2, ActivationFunction::Identity, &mut rng);
        layer.feed_from(Matrix::row_vector(&[2.0, 3.0]));
        let (w, b, _) = layer.compute_gradients(&Matrix::row_vector(&[0.5]));
        assert_eq!(w.as_slice(), &[1.0, 1.5]);
        assert_eq!(b.as_slice(), &[0.5]);
    }
}
