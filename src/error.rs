use std::path::PathBuf;

/// Every failure the pipeline can surface. Nothing is retried: the first
/// error aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum TitanicError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: required column '{column}' not found in header")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: row {row}: {reason}")]
    MalformedRow { path: PathBuf, row: usize, reason: String },

    #[error("{path}: row {row}: column '{column}' has invalid value '{value}'")]
    InvalidField {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("{path}: no data rows")]
    EmptyDataset { path: PathBuf },

    #[error("class {class} has no samples to evaluate")]
    EmptyClassBlock { class: usize },

    #[error("{samples} samples cannot be split into {num_classes} equal class blocks")]
    UnevenBlocks { samples: usize, num_classes: usize },

    #[error("labels are not laid out in contiguous class blocks (first violation at sample {row})")]
    UnsortedBlocks { row: usize },

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("sample {sample} has no label")]
    Unlabeled { sample: usize },

    #[error("label {label} is outside 0..{num_classes}")]
    InvalidLabel { label: usize, num_classes: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TitanicError>;

impl TitanicError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TitanicError::Io { path: path.into(), source }
    }

    pub fn shape(expected: impl ToString, actual: impl ToString) -> Self {
        TitanicError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
