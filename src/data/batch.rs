use crate::data::features::{FeatureVector, FEATURE_COUNT};
use crate::error::{Result, TitanicError};
use crate::math::matrix::Matrix;

/// One encoded passenger with its class label when the file has one.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub label: Option<usize>,
}

/// Consecutive samples stacked row-wise, labels in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBatch {
    pub inputs: Matrix,
    pub labels: Vec<usize>,
}

impl LabeledBatch {
    /// Stacks `samples`; every one of them must be labelled. `offset` is the
    /// index of the first sample, used in the error.
    pub fn from_samples(samples: &[LabeledSample], offset: usize) -> Result<LabeledBatch> {
        let labels = samples.iter()
            .enumerate()
            .map(|(i, s)| s.label.ok_or(TitanicError::Unlabeled { sample: offset + i }))
            .collect::<Result<Vec<_>>>()?;
        Ok(LabeledBatch { inputs: feature_matrix(samples), labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Splits samples, in file order, into batches of `batch_size`. The last
/// batch holds the remainder.
pub fn batch_samples(samples: &[LabeledSample], batch_size: usize) -> Result<Vec<LabeledBatch>> {
    if batch_size == 0 {
        return Err(TitanicError::Config("batch_size must be at least 1".into()));
    }
    samples.chunks(batch_size)
        .enumerate()
        .map(|(i, chunk)| LabeledBatch::from_samples(chunk, i * batch_size))
        .collect()
}

/// All features as one `samples × 7` matrix.
pub fn feature_matrix(samples: &[LabeledSample]) -> Matrix {
    let data = samples.iter().flat_map(|s| s.features.0).collect();
    Matrix::from_vec(samples.len(), FEATURE_COUNT, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: Option<usize>) -> LabeledSample {
        LabeledSample { features: FeatureVector([0.5; FEATURE_COUNT]), label }
    }

    #[test]
    fn last_batch_holds_remainder() {
        let samples: Vec<_> = (0..7).map(|i| sample(Some(i % 2))).collect();
        let batches = batch_samples(&samples, 3).unwrap();
        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(batches[2].labels, vec![0]);
        assert_eq!((batches[0].inputs.rows, batches[0].inputs.cols), (3, FEATURE_COUNT));
    }

    #[test]
    fn unlabeled_sample_is_rejected_with_index() {
        let samples = vec![sample(Some(1)), sample(Some(0)), sample(None)];
        let err = batch_samples(&samples, 2).unwrap_err();
        assert!(matches!(err, TitanicError::Unlabeled { sample: 2 }));
    }

    #[test]
    fn zero_batch_size_is_a_config_error() {
        assert!(matches!(batch_samples(&[sample(Some(0))], 0), Err(TitanicError::Config(_))));
    }
}
