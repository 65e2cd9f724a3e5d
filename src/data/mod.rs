pub mod batch;
pub mod csv;
pub mod features;
pub mod passenger;

pub use batch::{LabeledBatch, LabeledSample};
pub use features::{encode, normalize, FeatureVector, FEATURE_COUNT};
pub use passenger::{PassengerRecord, Port, Sex};
