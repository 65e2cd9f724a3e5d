//! Per-class accuracy of a batch of class-probability rows.
//!
//! Two ways to attribute samples to their true class:
//!
//! - **Contiguous blocks**: the batch is assumed to hold `num_classes`
//!   equal-size blocks, block `c` containing only class `c`. The accuracy of
//!   class `c` is the mean probability the model gave to `c` inside block
//!   `c`. The layout is checked, never assumed silently.
//! - **Label keyed**: a confusion matrix built from each sample's arg-max
//!   prediction and its known label. No layout requirement.

use serde::{Serialize, Deserialize};

use crate::error::{Result, TitanicError};
use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyMode {
    #[default]
    LabelKeyed,
    ContiguousBlocks,
}

/// Index of the largest probability, compared with a strict `>` starting
/// from 0, so ties go to the first index. `None` when nothing is above 0
/// (all zeros, all NaN, or empty).
pub fn argmax(probabilities: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut max = 0.0;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > max {
            max = p;
            best = Some(i);
        }
    }
    best
}

/// Mean probability assigned to `class` within its block of a flattened
/// `samples × num_classes` output.
///
/// Starts at `class * n * num_classes + class` and walks `n` rows with stride
/// `num_classes`, where `n = samples / num_classes`.
pub fn block_class_accuracy(values: &[f64], num_classes: usize, class: usize) -> Result<f64> {
    if num_classes == 0 || values.len() % num_classes != 0 {
        return Err(TitanicError::shape(
            format!("a multiple of {num_classes} output values"),
            values.len(),
        ));
    }
    if class >= num_classes {
        return Err(TitanicError::InvalidLabel { label: class, num_classes });
    }
    let samples = values.len() / num_classes;
    if samples % num_classes != 0 {
        return Err(TitanicError::UnevenBlocks { samples, num_classes });
    }
    let block = samples / num_classes;
    if block == 0 {
        return Err(TitanicError::EmptyClassBlock { class });
    }

    let start = class * block * num_classes + class;
    let total: f64 = values[start..]
        .iter()
        .step_by(num_classes)
        .take(block)
        .sum();
    Ok(total / block as f64)
}

/// Verifies that `labels` form `num_classes` equal contiguous blocks in
/// class order.
pub fn check_contiguous_blocks(labels: &[usize], num_classes: usize) -> Result<()> {
    if num_classes == 0 || labels.len() % num_classes != 0 {
        return Err(TitanicError::UnevenBlocks { samples: labels.len(), num_classes });
    }
    let block = labels.len() / num_classes;
    if block == 0 {
        return Err(TitanicError::EmptyClassBlock { class: 0 });
    }
    match labels.iter().enumerate().find(|&(i, &label)| label != i / block) {
        Some((row, _)) => Err(TitanicError::UnsortedBlocks { row }),
        None => Ok(()),
    }
}

/// `counts[truth][predicted]`, plus per-class tallies of rows for which no
/// class scored above zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub num_classes: usize,
    pub counts: Vec<Vec<usize>>,
    pub unpredicted: Vec<usize>,
}

impl ConfusionMatrix {
    pub fn from_outputs(outputs: &Matrix, labels: &[usize]) -> Result<ConfusionMatrix> {
        if outputs.rows != labels.len() {
            return Err(TitanicError::shape(
                format!("{} output rows", labels.len()),
                format!("{} output rows", outputs.rows),
            ));
        }
        let num_classes = outputs.cols;
        let mut counts = vec![vec![0usize; num_classes]; num_classes];
        let mut unpredicted = vec![0usize; num_classes];

        for (row, &truth) in outputs.iter_rows().zip(labels.iter()) {
            if truth >= num_classes {
                return Err(TitanicError::InvalidLabel { label: truth, num_classes });
            }
            match argmax(row) {
                Some(predicted) => counts[truth][predicted] += 1,
                None => unpredicted[truth] += 1,
            }
        }

        Ok(ConfusionMatrix { num_classes, counts, unpredicted })
    }

    /// Samples whose true class is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum::<usize>() + self.unpredicted[class]
    }

    /// Fraction of `class` samples predicted as `class`.
    pub fn class_accuracy(&self, class: usize) -> Result<f64> {
        if class >= self.num_classes {
            return Err(TitanicError::InvalidLabel { label: class, num_classes: self.num_classes });
        }
        let support = self.support(class);
        if support == 0 {
            return Err(TitanicError::EmptyClassBlock { class });
        }
        Ok(self.counts[class][class] as f64 / support as f64)
    }
}

/// Accuracy of every class, in class order.
pub fn class_accuracies(outputs: &Matrix, labels: &[usize], mode: AccuracyMode) -> Result<Vec<f64>> {
    let num_classes = outputs.cols;
    match mode {
        AccuracyMode::LabelKeyed => {
            let matrix = ConfusionMatrix::from_outputs(outputs, labels)?;
            (0..num_classes).map(|c| matrix.class_accuracy(c)).collect()
        }
        AccuracyMode::ContiguousBlocks => {
            if outputs.rows != labels.len() {
                return Err(TitanicError::shape(
                    format!("{} output rows", labels.len()),
                    format!("{} output rows", outputs.rows),
                ));
            }
            check_contiguous_blocks(labels, num_classes)?;
            (0..num_classes)
                .map(|c| block_class_accuracy(outputs.as_slice(), num_classes, c))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two blocks of three: rows 0..3 are class 0, rows 3..6 class 1.
    fn blocks(p0: [f64; 3], p1: [f64; 3]) -> Matrix {
        let rows: Vec<Vec<f64>> = p0.iter().map(|&p| vec![p, 1.0 - p])
            .chain(p1.iter().map(|&p| vec![1.0 - p, p]))
            .collect();
        Matrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn argmax_is_strict_and_first_wins() {
        assert_eq!(argmax(&[0.2, 0.8]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
        assert_eq!(argmax(&[0.0, 0.0]), None);
        assert_eq!(argmax(&[f64::NAN, f64::NAN]), None);
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn perfect_and_hopeless_blocks() {
        let out = blocks([1.0; 3], [0.0; 3]);
        assert_eq!(block_class_accuracy(out.as_slice(), 2, 0).unwrap(), 1.0);
        assert_eq!(block_class_accuracy(out.as_slice(), 2, 1).unwrap(), 0.0);
    }

    #[test]
    fn block_walk_averages_diagonal_probabilities() {
        let out = blocks([0.9, 0.6, 0.3], [0.8, 0.8, 0.2]);
        let a0 = block_class_accuracy(out.as_slice(), 2, 0).unwrap();
        let a1 = block_class_accuracy(out.as_slice(), 2, 1).unwrap();
        assert!((a0 - 0.6).abs() < 1e-12);
        assert!((a1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn empty_block_fails_loudly() {
        let err = block_class_accuracy(&[], 2, 0).unwrap_err();
        assert!(matches!(err, TitanicError::EmptyClassBlock { class: 0 }));
    }

    #[test]
    fn uneven_blocks_are_rejected() {
        let out = Matrix::from_rows(&[vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let err = block_class_accuracy(out.as_slice(), 2, 0).unwrap_err();
        assert!(matches!(err, TitanicError::UnevenBlocks { samples: 3, num_classes: 2 }));
    }

    #[test]
    fn unsorted_labels_are_rejected_in_block_mode() {
        let out = blocks([1.0; 3], [1.0; 3]);
        let err = class_accuracies(&out, &[0, 1, 0, 0, 1, 1], AccuracyMode::ContiguousBlocks).unwrap_err();
        assert!(matches!(err, TitanicError::UnsortedBlocks { row: 1 }));
    }

    #[test]
    fn label_keyed_counts_hits_per_class() {
        let out = Matrix::from_rows(&[
            vec![0.9, 0.1],
            vec![0.2, 0.8],
            vec![0.4, 0.6],
            vec![0.3, 0.7],
            vec![0.0, 0.0],
        ]).unwrap();
        let labels = [0, 0, 1, 1, 1];
        let matrix = ConfusionMatrix::from_outputs(&out, &labels).unwrap();
        assert_eq!(matrix.counts, vec![vec![1, 1], vec![0, 2]]);
        assert_eq!(matrix.unpredicted, vec![0, 1]);

        let acc = class_accuracies(&out, &labels, AccuracyMode::LabelKeyed).unwrap();
        assert_eq!(acc[0], 0.5);
        assert!((acc[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn label_keyed_needs_every_class() {
        let out = Matrix::from_rows(&[vec![0.9, 0.1]]).unwrap();
        let err = class_accuracies(&out, &[0], AccuracyMode::LabelKeyed).unwrap_err();
        assert!(matches!(err, TitanicError::EmptyClassBlock { class: 1 }));
    }

    #[test]
    fn modes_agree_on_sorted_hard_predictions() {
        let out = blocks([1.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let labels = [0, 0, 0, 1, 1, 1];
        let keyed = class_accuracies(&out, &labels, AccuracyMode::LabelKeyed).unwrap();
        let block = class_accuracies(&out, &labels, AccuracyMode::ContiguousBlocks).unwrap();
        assert_eq!(keyed, block);
    }
}
