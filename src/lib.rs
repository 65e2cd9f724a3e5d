pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod inference;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Network, NetworkSpec, LayerSpec};
pub use loss::LossType;
pub use optim::{Adam, OptimizerKind, Sgd};
pub use train::{train_loop, EpochStats, TrainConfig};

pub use config::RunConfig;
pub use data::{encode, normalize, FeatureVector, PassengerRecord};
pub use error::{Result, TitanicError};
pub use eval::{AccuracyMode, ClassAccuracyReport};
pub use inference::{Classifier, InferenceDriver, Predictor, UNKNOWN_CLASS};
pub use pipeline::{run, run_with, RunSummary};
