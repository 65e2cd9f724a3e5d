use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::data::features::FEATURE_COUNT;
use crate::error::{Result, TitanicError};
use crate::eval::accuracy::AccuracyMode;
use crate::eval::report::SURVIVAL_CLASSES;
use crate::network::spec::NetworkSpec;
use crate::optim::OptimizerKind;
use crate::train::train_config::TrainConfig;

/// Looked up in the working directory; defaults apply when it is absent.
pub const CONFIG_FILE: &str = "titanic.json";

/// Everything a run needs. Every field is optional in the JSON file; missing
/// fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Labelled training file (named columns).
    pub train_path: PathBuf,
    /// Labelled hold-out file scored as "validation"; `null` skips it.
    pub validation_path: Option<PathBuf>,
    /// Positional file to predict.
    pub inference_path: PathBuf,
    /// Submission written here, replacing any previous file.
    pub output_path: PathBuf,
    /// Trained weights are saved here when set.
    pub model_path: Option<PathBuf>,
    pub epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
    /// Seeds weight init and shuffling for reproducible runs.
    pub seed: Option<u64>,
    pub optimizer: OptimizerKind,
    pub network: NetworkSpec,
    pub accuracy_mode: AccuracyMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            train_path: PathBuf::from("data/train.csv"),
            validation_path: Some(PathBuf::from("data/test.csv")),
            inference_path: PathBuf::from("data/fintest.csv"),
            output_path: PathBuf::from("fintestoutput.csv"),
            model_path: None,
            epochs: 200,
            batch_size: 100,
            shuffle: false,
            seed: None,
            optimizer: OptimizerKind::default(),
            network: NetworkSpec::titanic(),
            accuracy_mode: AccuracyMode::default(),
        }
    }
}

impl RunConfig {
    /// Deserializes a config from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TitanicError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<RunConfig> {
        let path = path.as_ref();
        if path.exists() {
            info!(path = %path.display(), "loading configuration");
            RunConfig::load_json(path)
        } else {
            info!(path = %path.display(), "no configuration file, using defaults");
            Ok(RunConfig::default())
        }
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| TitanicError::io(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        if self.network.input_size() != Some(FEATURE_COUNT) {
            return Err(TitanicError::Config(format!(
                "network input must be {FEATURE_COUNT} features, got {:?}",
                self.network.input_size()
            )));
        }
        if self.network.output_size() != Some(SURVIVAL_CLASSES) {
            return Err(TitanicError::Config(format!(
                "network output must be {SURVIVAL_CLASSES} classes, got {:?}",
                self.network.output_size()
            )));
        }
        if self.batch_size == 0 {
            return Err(TitanicError::Config("batch_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            epochs: self.epochs,
            optimizer: self.optimizer,
            shuffle: self.shuffle,
            seed: self.seed,
        }
    }
}
