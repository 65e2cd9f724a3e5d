use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::data::batch::LabeledBatch;
use crate::error::{Result, TitanicError};
use crate::inference::predictor::{Classifier, Predictor};
use crate::layers::dense::Layer;
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::spec::NetworkSpec;
use crate::train::{epoch_stats::EpochStats, loop_fn::train_loop, train_config::TrainConfig};

/// Sequential stack of dense layers trained with a single loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub loss: LossType,
}

impl Network {
    /// Builds a freshly initialized network from a validated spec.
    pub fn from_spec<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec.layers.iter()
            .map(|l| Layer::new(l.size, l.input_size, l.activation, rng))
            .collect();
        Ok(Network { layers, loss: spec.loss })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    /// Forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, input: Matrix) -> Matrix {
        let mut current = input;
        for layer in &mut self.layers {
            current = layer.feed_from(current);
        }
        current
    }

    /// Backward pass from ∂L/∂output; returns per-layer (weights, biases)
    /// gradients in layer order.
    pub fn backward(&self, output_delta: Matrix) -> Vec<(Matrix, Matrix)> {
        let mut grads = Vec::with_capacity(self.layers.len());
        let mut delta = output_delta;
        for layer in self.layers.iter().rev() {
            let (w_grad, b_grad, input_delta) = layer.compute_gradients(&delta);
            grads.push((w_grad, b_grad));
            delta = input_delta;
        }
        grads.reverse();
        grads
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| TitanicError::io(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TitanicError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl Predictor for Network {
    fn num_classes(&self) -> usize {
        self.output_size()
    }

    fn predict(&self, inputs: &Matrix) -> Result<Matrix> {
        if inputs.cols != self.input_size() {
            return Err(TitanicError::shape(
                format!("{} input columns", self.input_size()),
                format!("{} input columns", inputs.cols),
            ));
        }
        Ok(self.layers.iter().fold(inputs.clone(), |acc, layer| layer.feed(&acc)))
    }
}

impl Classifier for Network {
    fn fit(&mut self, batches: &[LabeledBatch], config: &TrainConfig) -> Result<Vec<EpochStats>> {
        train_loop(self, batches, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use crate::activation::ActivationFunction;
    use crate::network::spec::LayerSpec;

    #[test]
    fn predict_yields_probability_rows() {
        let net = Network::from_spec(&NetworkSpec::titanic(), &mut StdRng::seed_from_u64(9)).unwrap();
        let batch = Matrix::from_rows(&[vec![0.5; 7], vec![0.0; 7], vec![1.0; 7]]).unwrap();
        let out = net.predict(&batch).unwrap();
        assert_eq!((out.rows, out.cols), (3, 2));
        for row in out.iter_rows() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn predict_rejects_wrong_width() {
        let net = Network::from_spec(&NetworkSpec::titanic(), &mut StdRng::seed_from_u64(9)).unwrap();
        let err = net.predict(&Matrix::zeros(1, 6)).unwrap_err();
        assert!(matches!(err, TitanicError::ShapeMismatch { .. }));
    }

    #[test]
    fn json_round_trip_keeps_predictions() {
        let net = Network::from_spec(&NetworkSpec::titanic(), &mut StdRng::seed_from_u64(4)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        net.save_json(&path).unwrap();
        let restored = Network::load_json(&path).unwrap();

        let batch = Matrix::row_vector(&[1.0, 1.0, 0.0, 0.0, 0.0, 0.014, 0.0]);
        let a = net.predict(&batch).unwrap();
        let b = restored.predict(&batch).unwrap();
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    fn batch_loss(net: &Network, inputs: &Matrix, labels: &[usize]) -> f64 {
        net.loss.loss(&net.predict(inputs).unwrap(), labels)
    }

    /// Central-difference estimate of dL/dθ for the parameter `nudge` moves.
    fn central_difference(
        net: &Network,
        inputs: &Matrix,
        labels: &[usize],
        nudge: impl Fn(&mut Network, f64),
    ) -> f64 {
        let h = 1e-6;
        let mut plus = net.clone();
        nudge(&mut plus, h);
        let mut minus = net.clone();
        nudge(&mut minus, -h);
        (batch_loss(&plus, inputs, labels) - batch_loss(&minus, inputs, labels)) / (2.0 * h)
    }

    /// Compares every backprop gradient, averaged over the batch the way the
    /// training loop does, against finite differences of the mean loss.
    fn assert_gradients_match(hidden: ActivationFunction, output: ActivationFunction, loss: LossType) {
        let spec = NetworkSpec {
            layers: vec![LayerSpec::new(4, 3, hidden), LayerSpec::new(3, 4, output)],
            loss,
        };
        let mut net = Network::from_spec(&spec, &mut StdRng::seed_from_u64(21)).unwrap();
        let inputs = Matrix::from_rows(&[
            vec![0.3, -0.7, 0.9],
            vec![-0.2, 0.4, 0.1],
            vec![0.8, 0.5, -0.6],
        ]).unwrap();
        let labels = [0, 2, 1];
        let n = labels.len() as f64;

        let out = net.forward(inputs.clone());
        let grads = net.backward(net.loss.derivative(&out, &labels));

        for (l, (w_grad, b_grad)) in grads.iter().enumerate() {
            for r in 0..w_grad.rows {
                for c in 0..w_grad.cols {
                    let numeric = central_difference(&net, &inputs, &labels, |m, h| {
                        let w = m.layers[l].weights.get(r, c);
                        m.layers[l].weights.set(r, c, w + h);
                    });
                    let analytic = w_grad.get(r, c) / n;
                    assert!(
                        (analytic - numeric).abs() < 1e-6,
                        "{hidden:?}/{output:?}/{loss:?} layer {l} w[{r}][{c}]: {analytic} vs {numeric}"
                    );
                }
            }
            for c in 0..b_grad.cols {
                let numeric = central_difference(&net, &inputs, &labels, |m, h| {
                    let b = m.layers[l].biases.get(0, c);
                    m.layers[l].biases.set(0, c, b + h);
                });
                let analytic = b_grad.get(0, c) / n;
                assert!(
                    (analytic - numeric).abs() < 1e-6,
                    "{hidden:?}/{output:?}/{loss:?} layer {l} b[{c}]: {analytic} vs {numeric}"
                );
            }
        }
    }

    #[test]
    fn softmax_cross_entropy_gradients_match_finite_differences() {
        assert_gradients_match(ActivationFunction::Tanh, ActivationFunction::Softmax, LossType::CrossEntropy);
    }

    #[test]
    fn sigmoid_mse_gradients_match_finite_differences() {
        assert_gradients_match(ActivationFunction::Tanh, ActivationFunction::Sigmoid, LossType::Mse);
    }

    #[test]
    fn identity_mse_gradients_match_finite_differences() {
        assert_gradients_match(ActivationFunction::Sigmoid, ActivationFunction::Identity, LossType::Mse);
    }
}
