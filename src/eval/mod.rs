pub mod accuracy;
pub mod report;

pub use accuracy::{argmax, AccuracyMode, ConfusionMatrix};
pub use report::{class_name, evaluate, ClassAccuracy, ClassAccuracyReport, SURVIVAL_CLASSES};
