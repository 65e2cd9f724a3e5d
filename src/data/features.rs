//! Passenger → fixed-width numeric feature vector.
//!
//! Every feature is rescaled with fixed bounds taken from the training data.
//! Results are not clamped: a fare above the observed maximum encodes above 1.

use crate::data::passenger::{PassengerRecord, Port, Sex};

/// Width of every encoded passenger.
pub const FEATURE_COUNT: usize = 7;

/// Stand-in for a missing age; it sits at the lower age bound so it encodes to 0.
pub const MISSING_AGE: f64 = -1.0;

pub const CLASS_BOUNDS: (f64, f64) = (1.0, 3.0);
pub const SEX_BOUNDS: (f64, f64) = (0.0, 1.0);
pub const AGE_BOUNDS: (f64, f64) = (MISSING_AGE, 80.0);
pub const SIBLINGS_SPOUSES_BOUNDS: (f64, f64) = (0.0, 8.0);
pub const PARENTS_CHILDREN_BOUNDS: (f64, f64) = (0.0, 6.0);
/// Upper bound is the largest fare in the training set, not a hard limit.
pub const FARE_BOUNDS: (f64, f64) = (0.0, 512.3292);
pub const EMBARKED_BOUNDS: (f64, f64) = (0.0, 2.0);

/// Encoded passenger in fixed order: class, sex, age, siblings/spouses,
/// parents/children, fare, embarkation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// `(value - min) / (max - min)`, or `value` unchanged when either bound is
/// absent (the label column passes through this way).
pub fn normalize(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    match (min, max) {
        (Some(min), Some(max)) => (value - min) / (max - min),
        _ => value,
    }
}

fn scaled(value: f64, (min, max): (f64, f64)) -> f64 {
    normalize(value, Some(min), Some(max))
}

/// Encodes one passenger. Pure; the same function serves training,
/// evaluation and inference rows.
pub fn encode(record: &PassengerRecord) -> FeatureVector {
    let sex = match record.sex {
        Sex::Male => 1.0,
        Sex::Female => 0.0,
    };
    let embarked = match record.embarked {
        Port::Southampton => 0.0,
        Port::Cherbourg => 1.0,
        Port::Other => 2.0,
    };

    FeatureVector([
        scaled(f64::from(record.class), CLASS_BOUNDS),
        scaled(sex, SEX_BOUNDS),
        scaled(record.age.unwrap_or(MISSING_AGE), AGE_BOUNDS),
        scaled(f64::from(record.siblings_spouses), SIBLINGS_SPOUSES_BOUNDS),
        scaled(f64::from(record.parents_children), PARENTS_CHILDREN_BOUNDS),
        scaled(record.fare, FARE_BOUNDS),
        scaled(embarked, EMBARKED_BOUNDS),
    ])
}
