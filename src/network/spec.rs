use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Result, TitanicError};
use crate::loss::loss_type::LossType;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`      : number of neurons in this layer
/// - `input_size`: output size of the previous layer, or the raw input
///                  dimension for the first layer
/// - `activation`: activation function applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> LayerSpec {
        LayerSpec { size, input_size, activation }
    }
}

/// Network architecture plus the loss it is trained with. Lives in the run
/// configuration, independent of any trained weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
}

impl NetworkSpec {
    /// 7 → 250 → 175 → 150 (ReLU) → 2 (Softmax), sparse cross-entropy.
    pub fn titanic() -> NetworkSpec {
        use ActivationFunction::{ReLU, Softmax};
        NetworkSpec {
            layers: vec![
                LayerSpec::new(250, 7, ReLU),
                LayerSpec::new(175, 250, ReLU),
                LayerSpec::new(150, 175, ReLU),
                LayerSpec::new(2, 150, Softmax),
            ],
            loss: LossType::CrossEntropy,
        }
    }

    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(|l| l.input_size)
    }

    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(|l| l.size)
    }

    /// Checks that the spec is non-empty and that each layer's input matches
    /// the previous layer's size.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(TitanicError::Config("network has no layers".into()));
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[1].input_size != pair[0].size {
                return Err(TitanicError::Config(format!(
                    "layer {} expects {} inputs but layer {} has {} neurons",
                    i + 1, pair[1].input_size, i, pair[0].size
                )));
            }
        }
        if let Some(zero) = self.layers.iter().position(|l| l.size == 0 || l.input_size == 0) {
            return Err(TitanicError::Config(format!("layer {zero} has a zero dimension")));
        }
        self.check_output_pairing()
    }

    /// The backward pass treats Softmax as a pass-through and relies on the
    /// cross-entropy gradient `p - y` for the combined Jacobian, so Softmax
    /// and cross-entropy only appear together, on the output layer.
    fn check_output_pairing(&self) -> Result<()> {
        let last = self.layers.len() - 1;
        if let Some(hidden) = self.layers[..last].iter()
            .position(|l| l.activation == ActivationFunction::Softmax)
        {
            return Err(TitanicError::Config(format!(
                "softmax is only supported on the output layer, found on layer {hidden}"
            )));
        }
        let softmax_output = self.layers[last].activation == ActivationFunction::Softmax;
        match (self.loss, softmax_output) {
            (LossType::CrossEntropy, false) => Err(TitanicError::Config(format!(
                "cross_entropy loss needs a softmax output layer, got {:?}",
                self.layers[last].activation
            ))),
            (LossType::Mse, true) => Err(TitanicError::Config(
                "mse loss cannot be paired with a softmax output layer".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for NetworkSpec {
    fn default() -> Self {
        NetworkSpec::titanic()
    }
}
