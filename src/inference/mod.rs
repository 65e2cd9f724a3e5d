pub mod driver;
pub mod predictor;

pub use driver::{InferenceDriver, UNKNOWN_CLASS};
pub use predictor::{Classifier, Predictor};
