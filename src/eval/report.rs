use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::data::batch::{feature_matrix, LabeledSample};
use crate::error::{Result, TitanicError};
use crate::eval::accuracy::{class_accuracies, AccuracyMode};
use crate::inference::predictor::Predictor;

/// Dead and alive.
pub const SURVIVAL_CLASSES: usize = 2;

/// Display name of a survival class.
pub fn class_name(index: usize) -> &'static str {
    match index {
        0 => "Dead",
        1 => "Alive",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ClassAccuracy {
    pub training: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<f64>,
}

/// Per-class accuracies keyed by class name, kept in class order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassAccuracyReport {
    entries: Vec<(String, ClassAccuracy)>,
}

impl ClassAccuracyReport {
    pub fn from_training(accuracies: &[f64]) -> ClassAccuracyReport {
        let entries = accuracies.iter()
            .enumerate()
            .map(|(i, &training)| {
                (class_name(i).to_string(), ClassAccuracy { training, validation: None })
            })
            .collect();
        ClassAccuracyReport { entries }
    }

    /// Attaches validation accuracies, class by class.
    pub fn merge_validation(&mut self, accuracies: &[f64]) -> Result<()> {
        if accuracies.len() != self.entries.len() {
            return Err(TitanicError::shape(
                format!("{} classes", self.entries.len()),
                format!("{} classes", accuracies.len()),
            ));
        }
        for ((_, entry), &acc) in self.entries.iter_mut().zip(accuracies) {
            entry.validation = Some(acc);
        }
        Ok(())
    }

    pub fn get(&self, class: &str) -> Option<&ClassAccuracy> {
        self.entries.iter().find(|(name, _)| name == class).map(|(_, acc)| acc)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassAccuracy)> {
        self.entries.iter().map(|(name, acc)| (name.as_str(), acc))
    }
}

impl Serialize for ClassAccuracyReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, acc) in &self.entries {
            map.serialize_entry(name, acc)?;
        }
        map.end()
    }
}

/// Scores `predictor` on the whole training set and, when given, the
/// validation set. Each set is predicted as a single batch.
pub fn evaluate<P: Predictor + ?Sized>(
    predictor: &P,
    training: &[LabeledSample],
    validation: Option<&[LabeledSample]>,
    mode: AccuracyMode,
) -> Result<ClassAccuracyReport> {
    let mut report = ClassAccuracyReport::from_training(&score(predictor, training, mode)?);
    if let Some(validation) = validation {
        report.merge_validation(&score(predictor, validation, mode)?)?;
    }
    Ok(report)
}

fn score<P: Predictor + ?Sized>(
    predictor: &P,
    samples: &[LabeledSample],
    mode: AccuracyMode,
) -> Result<Vec<f64>> {
    let labels = samples.iter()
        .enumerate()
        .map(|(i, s)| s.label.ok_or(TitanicError::Unlabeled { sample: i }))
        .collect::<Result<Vec<_>>>()?;
    let outputs = predictor.predict(&feature_matrix(samples))?;
    class_accuracies(&outputs, &labels, mode)
}
